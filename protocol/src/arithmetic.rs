// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Overflow-Aware `i64` Arithmetic
//!
//! Voting and staking power are tallied as `i64`. A validator set is capped
//! at [`crate::config::MAX_TOTAL_VOTING_POWER`] (`2^60`) precisely so these
//! sums stay well clear of `i64::MAX`, but the verifier's trust-fraction
//! scaling (`total * numerator`) multiplies user-supplied numerators against
//! that total, and a hostile or misconfigured numerator can still overflow.
//! These two helpers are the only places in the crate that do power
//! arithmetic without already knowing the result fits.

/// Add two `i64` power values, saturating at the integer bounds instead of
/// wrapping or panicking.
///
/// Used when accumulating a running power tally where an overflow should be
/// clamped rather than corrupt the sum silently — the caller is expected to
/// compare the clamped result against a cap afterward (see
/// [`crate::validator::ValidatorSet`]'s total-power cache, which panics if
/// the clamped sum still exceeds `MAX_TOTAL_VOTING_POWER`).
pub fn safe_add_clip(a: i64, b: i64) -> i64 {
    match a.checked_add(b) {
        Some(sum) => sum,
        None if b > 0 => i64::MAX,
        None => i64::MIN,
    }
}

/// Multiply two `i64` values, returning the wrapped product and a flag
/// indicating whether the multiplication overflowed.
///
/// Unlike `safe_add_clip`, callers here (trust-fraction scaling in
/// [`crate::threshold`]) need to *reject* on overflow rather than clamp and
/// continue, so the wrapped value is returned purely for completeness —
/// every caller checks the flag first.
pub fn safe_mul(a: i64, b: i64) -> (i64, bool) {
    match a.checked_mul(b) {
        Some(product) => (product, false),
        None => (a.wrapping_mul(b), true),
    }
}
