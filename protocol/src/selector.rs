// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VoterSelector — deterministic weighted sampling without duplication
//!
//! [`select_voters`] draws a voter subset from a validator set given a VRF
//! proof hash. Every honest node computing this against the same
//! `(validator_set, proof_hash, params)` triple must get the byte-identical
//! result — that determinism is the entire point of pinning the PRNG and
//! the win-point arithmetic below instead of leaving them "an
//! implementation detail."
//!
//! The draw makes selection probability proportional to staking power; the
//! win-point/voting-power reassignment in [`elect_voters_non_dup`]
//! equalizes influence afterward so concentrating stake yields
//! sub-proportional voting power, and the termination rule stops sampling
//! once a configured Byzantine percentage provably can't reach a third of
//! voting power.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::{debug, trace};

use crate::arithmetic::safe_add_clip;
use crate::config::{PRECISION_CORRECTION, PRECISION_FOR_SELECTION};
use crate::error::{SelectionError, VoterSetError};
use crate::validator::{Validator, ValidatorSet};
use crate::voter_params::VoterParams;
use crate::voter_set::VoterSet;

/// 64-bit LCG multiplier (Knuth's MMIX constant). Part of the wire-visible
/// protocol: any two honest nodes computing `select_voters` over the same
/// inputs must consume the same draw sequence, so this constant cannot
/// change without forking every chain built on it.
const LCG_MULTIPLIER: u64 = 6364136223846793005;
/// 64-bit LCG increment, paired with [`LCG_MULTIPLIER`].
const LCG_INCREMENT: u64 = 1442695040888963407;

/// Advance the LCG state by one step.
fn lcg_step(seed: &mut u64) -> u64 {
    *seed = seed.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
    *seed
}

/// Draw a uniform value in `[0, bound)` from the given mutable seed,
/// advancing it in the process. Uses rejection sampling over the LCG
/// output to avoid the modulo bias a plain `lcg_step(seed) % bound` would
/// introduce.
///
/// `bound == 0` returns `0` without consuming the seed — callers never
/// hit this in practice since the selector only calls this with
/// `losers_power`, which is always positive while the sampling loop runs.
pub fn uniform_u64(seed: &mut u64, bound: u64) -> u64 {
    if bound == 0 {
        return 0;
    }
    let limit = u64::MAX - (u64::MAX % bound);
    loop {
        let candidate = lcg_step(seed);
        if candidate < limit {
            return candidate % bound;
        }
    }
}

/// Derive the sampler's initial PRNG state from a VRF proof hash: the
/// first 8 bytes (right-zero-padded if shorter), read little-endian.
fn derive_seed(proof_hash: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = proof_hash.len().min(8);
    buf[..n].copy_from_slice(&proof_hash[..n]);
    u64::from_le_bytes(buf)
}

/// `ceil(total * percentage / 100)`, computed in `i128` to avoid overflow
/// before narrowing back — `total` can be up to `2^60` and `percentage` up
/// to 33, comfortably inside `i128`.
fn tolerable_byzantine_power(total_staking_power: i64, percentage: u8) -> i64 {
    let numerator = total_staking_power as i128 * percentage as i128;
    ((numerator + 99) / 100) as i64
}

/// `select_voters(validator_set, proof_hash, params)`: given the same three
/// inputs, always returns a byte-identical [`VoterSet`] — same members in
/// the same address-sorted order with identical `voting_power` values.
///
/// Short-circuits to "everyone with nonzero stake votes with
/// `voting_power = staking_power`" when `proof_hash` is empty or the
/// validator set is at or below `params.voter_election_threshold`;
/// otherwise runs [`elect_voters_non_dup`].
pub fn select_voters(
    validator_set: &ValidatorSet,
    proof_hash: &[u8],
    params: &VoterParams,
) -> Result<VoterSet, SelectionError> {
    if validator_set.size() == 0 {
        return Err(SelectionError::EmptyValidatorSet);
    }

    if proof_hash.is_empty() || validator_set.size() <= params.voter_election_threshold as usize {
        debug!(
            reason = if proof_hash.is_empty() { "empty_proof_hash" } else { "below_threshold" },
            "selecting all validators without sampling"
        );
        return short_circuit(validator_set.validators());
    }

    elect_voters_non_dup(validator_set, proof_hash, params)
}

fn short_circuit(validators: &[Validator]) -> Result<VoterSet, SelectionError> {
    let selected: Vec<Validator> = validators
        .iter()
        .filter(|v| v.staking_power > 0)
        .map(|v| v.with_voting_power(v.staking_power))
        .collect();

    voter_set_from_selection(selected)
}

fn voter_set_from_selection(selected: Vec<Validator>) -> Result<VoterSet, SelectionError> {
    match VoterSet::new(selected) {
        Ok(voter_set) => Ok(voter_set),
        Err(VoterSetError::NilVoterSet) => Err(SelectionError::NoEligibleVoters),
        Err(VoterSetError::InvalidValidator) => Err(SelectionError::NoEligibleVoters),
    }
}

/// A candidate mid-sampling: the validator plus its accumulated win point.
struct ElectedVoter {
    validator: Validator,
    win_point: BigInt,
    voting_power: i64,
}

/// The non-short-circuit sampling path: deterministic weighted draw
/// without duplication, with a win-point reassignment that equalizes
/// influence and a Byzantine-bound termination rule.
fn elect_voters_non_dup(
    validator_set: &ValidatorSet,
    proof_hash: &[u8],
    params: &VoterParams,
) -> Result<VoterSet, SelectionError> {
    let mut seed = derive_seed(proof_hash);
    let total_staking_power = validator_set.total_staking_power();

    // Step 2: candidates sorted by staking_power descending, tie-broken by
    // address ascending. Zero-power validators sort to the tail naturally.
    let mut candidates: Vec<Validator> = validator_set.validators().to_vec();
    candidates.sort_by(|a, b| {
        b.staking_power
            .cmp(&a.staking_power)
            .then_with(|| a.address.cmp(&b.address))
    });

    let total_candidates = candidates.len();
    let zero_count = candidates.iter().filter(|v| v.staking_power == 0).count();
    if zero_count == total_candidates {
        return Err(SelectionError::NoEligibleVoters);
    }

    // Step 3.
    let tolerable_byzantine_power =
        tolerable_byzantine_power(total_staking_power, params.max_tolerable_byzantine_percentage);

    let mut voters: Vec<ElectedVoter> = Vec::new();
    let mut losers_power = total_staking_power;
    let precision = BigInt::from(PRECISION_FOR_SELECTION);
    let precision_correction = BigInt::from(PRECISION_CORRECTION);

    loop {
        if voters.len() + zero_count == total_candidates {
            break;
        }

        // Step 5a: win-point accumulation runs *before* the draw, including
        // a no-op first iteration over an empty `voters` list. Preserving
        // this ordering keeps the PRNG consumption sequence identical to
        // the reference implementation.
        for voter in voters.iter_mut() {
            let stake = BigInt::from(voter.validator.staking_power);
            let denominator = BigInt::from(losers_power) + &stake;
            let delta = (&stake * &precision) / &denominator;
            voter.win_point += delta;
        }

        // Step 5b: draw one winner from the active window.
        let active_len = total_candidates - voters.len() - zero_count;
        let threshold = uniform_u64(&mut seed, losers_power as u64);
        let mut cumulative: i64 = 0;
        let mut winner_index = None;
        for (i, candidate) in candidates[..active_len].iter().enumerate() {
            cumulative = safe_add_clip(cumulative, candidate.staking_power);
            if (cumulative as u64) > threshold {
                winner_index = Some(i);
                break;
            }
        }
        let winner_index = winner_index
            .expect("uniform draw over the active candidate window must always find a winner");
        let winner = candidates.remove(winner_index);
        trace!(address = %hex::encode(winner.address), threshold, "elected voter");

        // Step 5c.
        losers_power = safe_add_clip(losers_power, -winner.staking_power);
        voters.push(ElectedVoter {
            validator: winner,
            win_point: precision.clone(),
            voting_power: 0,
        });

        // Step 5d: recompute every voter's voting power from scratch using
        // big-integer intermediates; only the final value narrows to i64.
        let total_win_point: BigInt = voters.iter().map(|v| v.win_point.clone()).sum();
        let total_stake_bigint = BigInt::from(total_staking_power);
        for voter in voters.iter_mut() {
            let mut value = voter.win_point.clone() * &precision;
            value /= &total_win_point;
            value *= &total_stake_bigint;
            value /= &precision_correction;
            voter.voting_power = value
                .to_i64()
                .expect("derived voting power must fit in i64 after narrowing");
        }
        let total_voting_power: i64 = voters
            .iter()
            .fold(0, |acc, v| safe_add_clip(acc, v.voting_power));

        // Step 5e: termination check.
        if should_stop_sampling(&voters, tolerable_byzantine_power, total_voting_power) {
            break;
        }
    }

    debug!(
        elected = voters.len(),
        candidates = total_candidates,
        "voter sampling complete"
    );

    let selected: Vec<Validator> = voters
        .into_iter()
        .map(|v| v.validator.with_voting_power(v.voting_power))
        .collect();

    voter_set_from_selection(selected)
}

/// Sort the current voters by `voting_power / staking_power` descending
/// (tie-broken by address ascending), accumulate `(stake, voting_power)`
/// pairs until the running stake first reaches or exceeds `tolerable_byzantine_power`,
/// and compare the accumulated voting power against a third of the total.
/// Returns `true` once an adversary holding the tolerable power provably
/// cannot reach a third of voting power.
fn should_stop_sampling(
    voters: &[ElectedVoter],
    tolerable_byzantine_power: i64,
    total_voting_power: i64,
) -> bool {
    let mut ranked: Vec<&ElectedVoter> = voters.iter().collect();
    ranked.sort_by(|a, b| {
        // a.voting_power/a.staking_power > b.voting_power/b.staking_power
        // via cross multiplication to avoid floating point.
        let lhs = a.voting_power as i128 * b.validator.staking_power as i128;
        let rhs = b.voting_power as i128 * a.validator.staking_power as i128;
        rhs.cmp(&lhs).then_with(|| a.validator.address.cmp(&b.validator.address))
    });

    let mut running_stake: i64 = 0;
    let mut top_f_voting_power: i64 = 0;
    for voter in ranked {
        running_stake = safe_add_clip(running_stake, voter.validator.staking_power);
        top_f_voting_power = safe_add_clip(top_f_voting_power, voter.voting_power);
        if running_stake >= tolerable_byzantine_power {
            break;
        }
    }

    (top_f_voting_power as i128) * 3 < total_voting_power as i128
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Ed25519Keypair;
    use crate::voter_params::{default_voter_params, VoterParams};

    fn validator_with_stake(staking_power: i64) -> Validator {
        let keypair = Ed25519Keypair::generate();
        Validator::new(Box::new(keypair.public_key()), staking_power)
    }

    #[test]
    fn uniform_u64_stays_within_bound() {
        let mut seed = 0xDEADBEEFu64;
        for _ in 0..1000 {
            let draw = uniform_u64(&mut seed, 17);
            assert!(draw < 17);
        }
    }

    #[test]
    fn uniform_u64_is_deterministic_for_same_seed() {
        let mut seed_a = 42u64;
        let mut seed_b = 42u64;
        for _ in 0..50 {
            assert_eq!(uniform_u64(&mut seed_a, 1000), uniform_u64(&mut seed_b, 1000));
        }
    }

    #[test]
    fn uniform_u64_zero_bound_returns_zero() {
        let mut seed = 1u64;
        assert_eq!(uniform_u64(&mut seed, 0), 0);
    }

    #[test]
    fn derive_seed_right_pads_short_hashes() {
        assert_eq!(derive_seed(&[1, 2, 3]), u64::from_le_bytes([1, 2, 3, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn derive_seed_matches_scenario_s2_vector() {
        // proof_hash = [1,2,...,8] => seed = 0x0807060504030201
        let seed = derive_seed(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(seed, 0x0807060504030201);
    }

    #[test]
    fn tolerable_byzantine_power_rounds_up() {
        assert_eq!(tolerable_byzantine_power(101, 20), 21);
        assert_eq!(tolerable_byzantine_power(100, 20), 20);
    }

    // Scenario S1: four validators, staking_power 100 each, empty proof
    // hash, threshold 10 — selector returns all four unchanged.
    #[test]
    fn scenario_s1_short_circuit_selects_everyone() {
        let validators: Vec<Validator> = (0..4).map(|_| validator_with_stake(100)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(10, 20);

        let voters = select_voters(&set, &[], &params).unwrap();

        assert_eq!(voters.size(), 4);
        assert_eq!(voters.total_voting_power(), 400);
        for voter in voters.voters() {
            assert_eq!(voter.voting_power, 100);
        }
        let addresses: Vec<_> = voters.voters().iter().map(|v| v.address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
    }

    #[test]
    fn short_circuit_triggers_when_set_size_equals_threshold() {
        let validators: Vec<Validator> = (0..5).map(|_| validator_with_stake(10)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(5, 20);
        let voters = select_voters(&set, &[1, 2, 3, 4], &params).unwrap();
        assert_eq!(voters.size(), 5);
    }

    #[test]
    fn short_circuit_elides_zero_stake_validators() {
        let mut validators: Vec<Validator> = (0..3).map(|_| validator_with_stake(10)).collect();
        validators.push(validator_with_stake(0));
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(10, 20);
        let voters = select_voters(&set, &[], &params).unwrap();
        assert_eq!(voters.size(), 3);
    }

    // Scenario S2: ten equal-stake validators, sampling runs; result must
    // be a proper subset whose total voting power never exceeds the
    // original total, and two independent runs agree exactly.
    #[test]
    fn scenario_s2_sampling_is_deterministic_and_bounded() {
        let validators: Vec<Validator> = (0..10).map(|_| validator_with_stake(10)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(5, 20);
        let proof_hash = [1u8, 2, 3, 4, 5, 6, 7, 8];

        let first = select_voters(&set, &proof_hash, &params).unwrap();
        let second = select_voters(&set, &proof_hash, &params).unwrap();

        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.total_voting_power(), second.total_voting_power());
        assert!(first.size() <= 10);
        assert!(first.total_voting_power() <= 100);

        let addresses: Vec<_> = first.voters().iter().map(|v| v.address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
    }

    #[test]
    fn sampling_never_selects_zero_stake_validators() {
        let mut validators: Vec<Validator> = (0..20).map(|_| validator_with_stake(5)).collect();
        validators.push(validator_with_stake(0));
        validators.push(validator_with_stake(0));
        let set = ValidatorSet::new(validators).unwrap();
        let params = default_voter_params();
        let voters = select_voters(&set, &[9, 9, 9, 9, 9, 9, 9, 9], &params).unwrap();
        for voter in voters.voters() {
            assert!(voter.staking_power > 0);
        }
    }

    #[test]
    fn sampling_respects_max_total_voting_power_cap() {
        let validators: Vec<Validator> = (0..30).map(|_| validator_with_stake(1_000_000)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(3, 20);
        let voters = select_voters(&set, &[7, 7, 7, 7, 7, 7, 7, 7], &params).unwrap();
        assert!(voters.total_voting_power() <= 30_000_000);
    }

    #[test]
    fn different_proof_hashes_can_change_the_outcome() {
        let validators: Vec<Validator> = (0..15).map(|_| validator_with_stake(10)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(3, 20);

        let a = select_voters(&set, &[1, 1, 1, 1, 1, 1, 1, 1], &params).unwrap();
        let b = select_voters(&set, &[2, 2, 2, 2, 2, 2, 2, 2], &params).unwrap();
        // Not asserting inequality (they could coincidentally match) — just
        // that both are internally well-formed and deterministic.
        assert_eq!(a.hash(), a.hash());
        assert_eq!(b.hash(), b.hash());
    }

    #[test]
    fn empty_validator_set_is_rejected_before_construction() {
        // ValidatorSet::new already rejects empty input, so select_voters's
        // own EmptyValidatorSet guard is defense in depth; exercise it via
        // a hand-built zero-size check path is not reachable through the
        // public API, so this test documents the invariant instead.
        assert!(ValidatorSet::new(vec![]).is_err());
    }

    #[test]
    fn all_zero_stake_validators_yield_no_eligible_voters() {
        let validators: Vec<Validator> = (0..3).map(|_| validator_with_stake(0)).collect();
        let set = ValidatorSet::new(validators).unwrap();
        let params = VoterParams::new(10, 20);
        let err = select_voters(&set, &[], &params).unwrap_err();
        assert_eq!(err, SelectionError::NoEligibleVoters);
    }
}
