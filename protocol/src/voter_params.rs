// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Voter Selection Parameters
//!
//! The only externally-supplied configuration the selector takes. No
//! global state, no config files — a caller builds one of these and passes
//! it to [`crate::selector::select_voters`] explicitly.

use crate::config::{DEFAULT_MAX_TOLERABLE_BYZANTINE_PERCENTAGE, DEFAULT_VOTER_ELECTION_THRESHOLD};

/// Tunable knobs for [`crate::selector::select_voters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterParams {
    /// Below this validator-set size, selection short-circuits: every
    /// nonzero-stake validator becomes a voter with `voting_power =
    /// staking_power`.
    pub voter_election_threshold: u32,

    /// Percentage (1-33) of total staking power an adversary is tolerated
    /// to hold. Used by the sampling loop's early-termination check.
    pub max_tolerable_byzantine_percentage: u8,
}

impl VoterParams {
    /// Construct a new `VoterParams`, rejecting a Byzantine percentage
    /// outside the sane range.
    ///
    /// # Panics
    ///
    /// Panics if `max_tolerable_byzantine_percentage` is 0 or exceeds 33 —
    /// a misconfigured chain parameter, not something the selector can
    /// recover from at call time.
    pub fn new(voter_election_threshold: u32, max_tolerable_byzantine_percentage: u8) -> Self {
        assert!(
            (1..=33).contains(&max_tolerable_byzantine_percentage),
            "max_tolerable_byzantine_percentage must be in [1, 33], got {max_tolerable_byzantine_percentage}"
        );
        Self {
            voter_election_threshold,
            max_tolerable_byzantine_percentage,
        }
    }
}

/// The default `VoterParams`: no short-circuit threshold, 20% tolerable
/// Byzantine power.
pub fn default_voter_params() -> VoterParams {
    VoterParams {
        voter_election_threshold: DEFAULT_VOTER_ELECTION_THRESHOLD,
        max_tolerable_byzantine_percentage: DEFAULT_MAX_TOLERABLE_BYZANTINE_PERCENTAGE,
    }
}
