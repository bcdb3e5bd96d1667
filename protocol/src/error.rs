// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Error Taxonomy
//!
//! Every fallible surface in this crate returns one of the typed errors
//! below — never a bare `String`. Programmer-contract violations (an
//! out-of-range trust level, a validator set whose total power exceeds
//! [`crate::config::MAX_TOTAL_VOTING_POWER`], a sampling round that can't
//! find a winner) are not represented here at all: those are bugs, and bugs
//! panic rather than round-trip through `Result`.

use thiserror::Error;

/// Errors raised while constructing or querying a [`crate::validator::ValidatorSet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorSetError {
    #[error("duplicate validator address in set")]
    DuplicateAddress,

    #[error("validator set is empty")]
    EmptySet,

    #[error("validator staking power {power} exceeds the per-validator cap of {cap} for a set of {count}")]
    StakingPowerTooLarge { power: i64, count: usize, cap: i64 },
}

/// Errors surfaced at the VoterSet/Commit serialization boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoterSetError {
    #[error("voter set is nil or empty")]
    NilVoterSet,

    #[error("invalid validator encoding")]
    InvalidValidator,
}

/// Errors raised while selecting a voter set from a validator set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("validator set is empty; cannot select voters")]
    EmptyValidatorSet,

    #[error("no validator in the set has nonzero staking power; cannot elect any voter")]
    NoEligibleVoters,
}

/// Errors raised while verifying a commit against a [`crate::voter_set::VoterSet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("invalid commit signatures: expected {expected}, got {got}")]
    InvalidCommitSignatures { expected: usize, got: usize },

    #[error("invalid commit height: expected {expected}, got {got}")]
    InvalidCommitHeight { expected: i64, got: i64 },

    #[error("invalid block ID: expected {expected}, got {got}")]
    InvalidBlockId { expected: String, got: String },

    #[error("invalid signature at index {index}")]
    InvalidSignature { index: usize },

    #[error("double vote from validator {validator} (first seen at index {first_index}, again at {second_index})")]
    DoubleVote {
        validator: String,
        first_index: usize,
        second_index: usize,
    },

    #[error("not enough voting power signed: got {got}, needed {needed}")]
    NotEnoughVotingPowerSigned { got: i64, needed: i64 },

    #[error("arithmetic overflow computing voting power needed")]
    ArithmeticOverflow,

    #[error(transparent)]
    VoterSet(#[from] VoterSetError),
}
