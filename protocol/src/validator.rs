// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Validator / ValidatorSet
//!
//! `Validator` is the immutable descriptor of a weighted signer.
//! `ValidatorSet` is the address-sorted collection the selector samples
//! from — the input side of the pipeline, never mutated after
//! construction.

use tracing::debug;

use crate::arithmetic::safe_add_clip;
use crate::config::{ADDRESS_LENGTH, MAX_TOTAL_VOTING_POWER};
use crate::crypto::keys::PublicKey;
use crate::error::ValidatorSetError;

/// A weighted signing participant with a stable address.
///
/// `address` is a deterministic function of `public_key` (see
/// [`PublicKey::address`]) rather than stored independently, so two
/// `Validator`s with the same public key always compare equal in address
/// without needing to trust whoever constructed them.
pub struct Validator {
    pub address: [u8; ADDRESS_LENGTH],
    pub public_key: Box<dyn PublicKey>,
    pub staking_power: i64,
    pub voting_power: i64,
    pub proposer_priority: i64,
}

impl Validator {
    /// Construct a validator from a public key and staking power.
    /// `voting_power` starts equal to `staking_power`; the selector
    /// overwrites it for sampled voters. `proposer_priority` starts at 0.
    pub fn new(public_key: Box<dyn PublicKey>, staking_power: i64) -> Self {
        let address = public_key.address();
        Self {
            address,
            public_key,
            staking_power,
            voting_power: staking_power,
            proposer_priority: 0,
        }
    }

    /// Clone this validator with a different `voting_power`. Used by the
    /// selector to assign sampled voting power without touching
    /// `staking_power` or `proposer_priority`.
    pub fn with_voting_power(&self, voting_power: i64) -> Self {
        Self {
            address: self.address,
            public_key: self.public_key.clone_boxed(),
            staking_power: self.staking_power,
            voting_power,
            proposer_priority: self.proposer_priority,
        }
    }
}

impl Clone for Validator {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            public_key: self.public_key.clone_boxed(),
            staking_power: self.staking_power,
            voting_power: self.voting_power,
            proposer_priority: self.proposer_priority,
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("address", &hex::encode(self.address))
            .field("staking_power", &self.staking_power)
            .field("voting_power", &self.voting_power)
            .field("proposer_priority", &self.proposer_priority)
            .finish()
    }
}

/// An ordered, address-sorted set of validators with a cached total
/// staking power. The input to [`crate::selector::select_voters`].
#[derive(Debug)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    total_staking_power: i64,
}

impl ValidatorSet {
    /// Build a `ValidatorSet` from a list of validators, sorting by address
    /// and rejecting duplicates.
    ///
    /// # Panics
    ///
    /// Panics if the recomputed total staking power exceeds
    /// [`MAX_TOTAL_VOTING_POWER`] — a malformed set, not a runtime
    /// condition a caller can usefully recover from.
    pub fn new(mut validators: Vec<Validator>) -> Result<Self, ValidatorSetError> {
        if validators.is_empty() {
            return Err(ValidatorSetError::EmptySet);
        }

        validators.sort_by(|a, b| a.address.cmp(&b.address));
        for window in validators.windows(2) {
            if window[0].address == window[1].address {
                return Err(ValidatorSetError::DuplicateAddress);
            }
        }

        let total_staking_power = Self::compute_total_power(&validators, validators.len())?;
        debug!(
            validator_count = validators.len(),
            total_staking_power, "constructed validator set"
        );

        Ok(Self {
            validators,
            total_staking_power,
        })
    }

    fn compute_total_power(
        validators: &[Validator],
        count: usize,
    ) -> Result<i64, ValidatorSetError> {
        let mut total: i64 = 0;
        for validator in validators {
            total = safe_add_clip(total, validator.staking_power);
            if total > MAX_TOTAL_VOTING_POWER {
                panic!(
                    "validator set total staking power {total} exceeds MAX_TOTAL_VOTING_POWER {MAX_TOTAL_VOTING_POWER}"
                );
            }
            if validator.staking_power > MAX_TOTAL_VOTING_POWER {
                return Err(ValidatorSetError::StakingPowerTooLarge {
                    power: validator.staking_power,
                    count,
                    cap: MAX_TOTAL_VOTING_POWER,
                });
            }
        }
        Ok(total)
    }

    pub fn total_staking_power(&self) -> i64 {
        self.total_staking_power
    }

    pub fn size(&self) -> usize {
        self.validators.len()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn get_by_address(&self, address: &[u8]) -> Option<(usize, &Validator)> {
        self.validators
            .iter()
            .position(|v| v.address == address)
            .map(|idx| (idx, &self.validators[idx]))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Validator> {
        self.validators.get(index)
    }
}
