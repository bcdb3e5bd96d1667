//! # Selection & Verification Constants
//!
//! Every magic number the voter selector and threshold verifier depend on
//! lives here. These values are consensus-critical: changing any of them
//! after genesis produces a voter list (or a verify decision) that differs
//! from a node still running the old constant, i.e. a fork.

// ---------------------------------------------------------------------------
// Power bounds
// ---------------------------------------------------------------------------

/// Upper bound on total staking power (and, separately, total voting power)
/// a validator set or voter set may carry. `2^60` leaves three clear bits of
/// headroom below `i64::MAX` for the `i64*3`-style arithmetic the quorum and
/// trust-fraction checks do, without ever needing `i128` on the hot path.
pub const MAX_TOTAL_VOTING_POWER: i64 = 1 << 60;

/// Address length in bytes. Derived from a public key by truncating a wide
/// hash, the same truncate-don't-roll-your-own approach used everywhere else
/// a fixed-size identifier is carved out of a cryptographic digest.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Voter selection precision
// ---------------------------------------------------------------------------

/// Fixed-point precision used for win-point accumulation during non-duplicate
/// sampling. A freshly-elected voter starts with `win_point = PRECISION_FOR_SELECTION`;
/// every later round a seated voter's win point grows by a fraction of this
/// scale. Kept as `i64` because it only ever multiplies into a `BigInt`
/// intermediate, never the other way around.
pub const PRECISION_FOR_SELECTION: i64 = 1000;

/// Second fixed-point correction factor applied when collapsing a voter's
/// big-integer win-point share back down to an `i64` voting power. Distinct
/// from `PRECISION_FOR_SELECTION` on purpose — they cancel at different
/// points in the derivation and conflating them is the easiest way to get a
/// silently-wrong voting power out of this module.
pub const PRECISION_CORRECTION: i64 = 1000;

// ---------------------------------------------------------------------------
// VoterParams defaults
// ---------------------------------------------------------------------------

/// Below this validator-set size, sampling is skipped entirely and every
/// nonzero-stake validator becomes a voter. Zero disables the short-circuit
/// by default — every chain that wants it turns it on explicitly via
/// `VoterParams`.
pub const DEFAULT_VOTER_ELECTION_THRESHOLD: u32 = 0;

/// Default tolerable Byzantine percentage used to size the early-termination
/// check in `elect_voters_non_dup`. 20% is conservative relative to the
/// theoretical 33% safety ceiling, giving some margin before the "could an
/// adversary reach a third of voting power" check starts to bind.
pub const DEFAULT_MAX_TOLERABLE_BYZANTINE_PERCENTAGE: u8 = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_total_voting_power_leaves_headroom_below_i64_max() {
        // Quorum checks multiply total voting power by small numerators
        // (trust_level.num, or 2 for the two-thirds modes). If this constant
        // crept up near i64::MAX, those multiplies would overflow silently.
        assert!(MAX_TOTAL_VOTING_POWER.checked_mul(3).is_some());
        assert!(MAX_TOTAL_VOTING_POWER < i64::MAX);
    }

    #[test]
    fn precision_constants_are_positive() {
        assert!(PRECISION_FOR_SELECTION > 0);
        assert!(PRECISION_CORRECTION > 0);
    }

    #[test]
    fn default_byzantine_percentage_is_in_range() {
        assert!(DEFAULT_MAX_TOLERABLE_BYZANTINE_PERCENTAGE >= 1);
        assert!(DEFAULT_MAX_TOLERABLE_BYZANTINE_PERCENTAGE <= 33);
    }

    #[test]
    fn address_length_matches_20_bytes() {
        assert_eq!(ADDRESS_LENGTH, 20);
    }
}
