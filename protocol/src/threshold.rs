// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ThresholdVerifier — four commit-verification modes
//!
//! Four ways to check that a [`Commit`] carries enough voting power behind
//! a block_id, implemented as methods on [`VoterSet`]:
//!
//! - [`VoterSet::verify_commit`] — full walk, verifies every signature.
//! - [`VoterSet::verify_commit_light`] — only `ForBlock` slots bound to the
//!   commit's own block_id, early-exit once the threshold is cleared.
//! - [`VoterSet::verify_future_commit`] — cross-validates an old voter set
//!   against a commit actually signed by a new one.
//! - [`VoterSet::verify_commit_trusting`] /
//!   [`VoterSet::verify_commit_light_trusting`] — intersection-only,
//!   double-vote detecting, against a caller-supplied [`TrustLevel`].

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::arithmetic::safe_mul;
use crate::block_id::BlockId;
use crate::commit::{vote_sign_bytes, Commit};
use crate::config::ADDRESS_LENGTH;
use crate::error::VerifyError;
use crate::voter_set::VoterSet;

/// A rational in `[1/3, 1]` governing how much power must sign for a
/// trust-fraction verification mode to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustLevel {
    pub num: i64,
    pub den: i64,
}

impl TrustLevel {
    /// Construct a trust level.
    ///
    /// # Panics
    ///
    /// Panics if the fraction falls outside `[1/3, 1]` — an out-of-range
    /// trust level is a programmer/configuration error, not something a
    /// verifier call can recover from.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den > 0, "trust level denominator must be positive, got {den}");
        assert!(
            num * 3 >= den && num <= den,
            "trust level {num}/{den} must lie in [1/3, 1]"
        );
        Self { num, den }
    }

    /// The canonical two-thirds trust level used by the full/light modes.
    pub fn two_thirds() -> Self {
        Self { num: 2, den: 3 }
    }

    /// `floor(total * num / den)`, using [`safe_mul`] to detect overflow on
    /// the `total * num` step rather than silently wrapping.
    fn needed_power(&self, total_voting_power: i64) -> Result<i64, VerifyError> {
        let (product, overflow) = safe_mul(total_voting_power, self.num);
        if overflow {
            return Err(VerifyError::ArithmeticOverflow);
        }
        Ok(product / self.den)
    }
}

/// The height/block_id equality check shared by all four verify modes —
/// the trusting modes don't also pin down the signature count, since they
/// intersect against a voter set that need not be the one that produced
/// the commit.
fn check_commit_id(commit: &Commit, expected_block_id: BlockId, expected_height: i64) -> Result<(), VerifyError> {
    if commit.height != expected_height {
        return Err(VerifyError::InvalidCommitHeight {
            expected: expected_height,
            got: commit.height,
        });
    }
    if commit.block_id != expected_block_id {
        return Err(VerifyError::InvalidBlockId {
            expected: hex::encode(expected_block_id.hash),
            got: hex::encode(commit.block_id.hash),
        });
    }
    commit.validate_basic()
}

fn check_preconditions(
    voter_set: &VoterSet,
    expected_block_id: BlockId,
    expected_height: i64,
    commit: &Commit,
) -> Result<(), VerifyError> {
    if voter_set.size() != commit.signatures.len() {
        return Err(VerifyError::InvalidCommitSignatures {
            expected: voter_set.size(),
            got: commit.signatures.len(),
        });
    }
    check_commit_id(commit, expected_block_id, expected_height)
}

impl VoterSet {
    /// Full verify: walks every signature slot, verifying all of them
    /// (even stray signatures for other block_ids) since downstream
    /// accounting depends on knowing exactly who signed what.
    pub fn verify_commit(
        &self,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
    ) -> Result<(), VerifyError> {
        check_preconditions(self, block_id, height, commit)?;

        let needed = TrustLevel::two_thirds().needed_power(self.total_voting_power())?;
        let mut tallied: i64 = 0;

        for (index, sig) in commit.signatures.iter().enumerate() {
            if sig.is_absent() {
                continue;
            }
            let validator = self
                .get_by_index(index)
                .expect("commit signature count was checked against voter_set.size()");
            let sign_bytes = vote_sign_bytes(chain_id, index, commit);
            let signature = sig.signature().expect("non-absent slot carries a signature");
            if !validator.public_key.verify(&sign_bytes, signature) {
                return Err(VerifyError::InvalidSignature { index });
            }
            if sig.effective_block_id(commit.block_id) == commit.block_id {
                tallied = crate::arithmetic::safe_add_clip(tallied, validator.voting_power);
            }
        }

        debug!(tallied, needed, "full commit verify complete");
        if tallied <= needed {
            return Err(VerifyError::NotEnoughVotingPowerSigned { got: tallied, needed });
        }
        Ok(())
    }

    /// Light verify: only considers `ForBlock` slots bound to the commit's
    /// own block_id, skipping absent/nil/stray slots without verifying
    /// them, and returns as soon as the tally clears `needed`.
    pub fn verify_commit_light(
        &self,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
    ) -> Result<(), VerifyError> {
        check_preconditions(self, block_id, height, commit)?;

        let needed = TrustLevel::two_thirds().needed_power(self.total_voting_power())?;
        let mut tallied: i64 = 0;

        for (index, sig) in commit.signatures.iter().enumerate() {
            if sig.is_absent() || sig.effective_block_id(commit.block_id) != commit.block_id {
                continue;
            }
            let validator = self
                .get_by_index(index)
                .expect("commit signature count was checked against voter_set.size()");
            let sign_bytes = vote_sign_bytes(chain_id, index, commit);
            let signature = sig.signature().expect("non-absent slot carries a signature");
            if !validator.public_key.verify(&sign_bytes, signature) {
                return Err(VerifyError::InvalidSignature { index });
            }
            tallied = crate::arithmetic::safe_add_clip(tallied, validator.voting_power);
            trace!(index, tallied, needed, "light verify tally");
            if tallied > needed {
                return Ok(());
            }
        }

        Err(VerifyError::NotEnoughVotingPowerSigned { got: tallied, needed })
    }

    /// Future verify: checks that this (old) voter set retains more than
    /// two-thirds of its voting power in a commit actually signed by
    /// `new_voter_set`.
    pub fn verify_future_commit(
        &self,
        new_voter_set: &VoterSet,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
    ) -> Result<(), VerifyError> {
        new_voter_set.verify_commit(chain_id, block_id, height, commit)?;

        let mut seen_old = HashSet::new();
        let mut old_tallied: i64 = 0;

        for (index, sig) in commit.signatures.iter().enumerate() {
            if sig.is_absent() {
                continue;
            }
            let Some(address) = sig.validator_address() else {
                continue;
            };
            let Some((_, old_validator)) = self.get_by_address(&address) else {
                continue;
            };
            if !seen_old.insert(address) {
                // A signer already counted once against the old set; ignore the repeat.
                continue;
            }
            let sign_bytes = vote_sign_bytes(chain_id, index, commit);
            let signature = sig.signature().expect("non-absent slot carries a signature");
            if old_validator.public_key.verify(&sign_bytes, signature) {
                old_tallied = crate::arithmetic::safe_add_clip(old_tallied, old_validator.voting_power);
            }
        }

        let old_total = self.total_voting_power();
        let needed = (old_total / 3) * 2;
        debug!(old_tallied, old_total, needed, "future commit verify complete");
        if old_tallied <= needed {
            return Err(VerifyError::NotEnoughVotingPowerSigned {
                got: old_tallied,
                needed,
            });
        }
        Ok(())
    }

    /// Trusting verify: the commit's signers are not necessarily exactly
    /// this voter set — walk every signature, tally intersection-only, and
    /// reject on a repeated attribution to the same address.
    pub fn verify_commit_trusting(
        &self,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
        trust_level: TrustLevel,
    ) -> Result<(), VerifyError> {
        self.verify_trusting(chain_id, block_id, height, commit, trust_level, false)
    }

    /// Same as [`Self::verify_commit_trusting`] but returns as soon as the
    /// tally clears `needed`, skipping remaining slots.
    pub fn verify_commit_light_trusting(
        &self,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
        trust_level: TrustLevel,
    ) -> Result<(), VerifyError> {
        self.verify_trusting(chain_id, block_id, height, commit, trust_level, true)
    }

    fn verify_trusting(
        &self,
        chain_id: &str,
        block_id: BlockId,
        height: i64,
        commit: &Commit,
        trust_level: TrustLevel,
        early_exit: bool,
    ) -> Result<(), VerifyError> {
        check_commit_id(commit, block_id, height)?;
        let needed = trust_level.needed_power(self.total_voting_power())?;

        let mut seen: HashSet<[u8; ADDRESS_LENGTH]> = HashSet::new();
        let mut tallied: i64 = 0;

        for (index, sig) in commit.signatures.iter().enumerate() {
            if sig.is_absent() {
                continue;
            }
            let Some(address) = sig.validator_address() else {
                continue;
            };
            let Some((voter_index, validator)) = self.get_by_address(&address) else {
                continue;
            };
            if !seen.insert(address) {
                return Err(VerifyError::DoubleVote {
                    validator: hex::encode(address),
                    first_index: voter_index,
                    second_index: index,
                });
            }
            let sign_bytes = vote_sign_bytes(chain_id, index, commit);
            let signature = sig.signature().expect("non-absent slot carries a signature");
            if !validator.public_key.verify(&sign_bytes, signature) {
                return Err(VerifyError::InvalidSignature { index });
            }
            tallied = crate::arithmetic::safe_add_clip(tallied, validator.voting_power);
            if early_exit && tallied > needed {
                return Ok(());
            }
        }

        if tallied > needed {
            Ok(())
        } else {
            Err(VerifyError::NotEnoughVotingPowerSigned { got: tallied, needed })
        }
    }
}
