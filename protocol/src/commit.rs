// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Commit / Signature Model
//!
//! A [`Commit`] is the aggregate of per-voter signatures for one block at
//! one height. `signatures[i]` corresponds positionally to the *i*-th
//! member of the [`crate::voter_set::VoterSet`] that commit is verified
//! against.

use chrono::{DateTime, Utc};

use crate::block_id::BlockId;
use crate::config::ADDRESS_LENGTH;
use crate::encoding::write_varint_u64;
use crate::error::VerifyError;

/// One voter's signature slot within a [`Commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommitSig {
    /// The voter did not submit a signature.
    Absent,
    /// The voter signed, but for the nil block (participation without
    /// endorsing any specific block).
    Nil {
        validator_address: [u8; ADDRESS_LENGTH],
        timestamp: DateTime<Utc>,
        signature: Vec<u8>,
    },
    /// The voter signed for a specific block, which may or may not be
    /// `commit.block_id` (a "stray" signature is still verified, just not
    /// tallied).
    ForBlock {
        validator_address: [u8; ADDRESS_LENGTH],
        timestamp: DateTime<Utc>,
        block_id: BlockId,
        signature: Vec<u8>,
    },
}

impl CommitSig {
    pub fn absent() -> Self {
        CommitSig::Absent
    }

    pub fn for_block(
        validator_address: [u8; ADDRESS_LENGTH],
        timestamp: DateTime<Utc>,
        block_id: BlockId,
        signature: Vec<u8>,
    ) -> Self {
        CommitSig::ForBlock {
            validator_address,
            timestamp,
            block_id,
            signature,
        }
    }

    pub fn nil(
        validator_address: [u8; ADDRESS_LENGTH],
        timestamp: DateTime<Utc>,
        signature: Vec<u8>,
    ) -> Self {
        CommitSig::Nil {
            validator_address,
            timestamp,
            signature,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CommitSig::Absent)
    }

    /// The block ID this slot's signature is attributed to. `Absent` and
    /// `Nil` slots substitute `default` (typically [`BlockId::nil`]).
    pub fn effective_block_id(&self, default: BlockId) -> BlockId {
        match self {
            CommitSig::ForBlock { block_id, .. } => *block_id,
            CommitSig::Absent | CommitSig::Nil { .. } => default,
        }
    }

    pub fn validator_address(&self) -> Option<[u8; ADDRESS_LENGTH]> {
        match self {
            CommitSig::Absent => None,
            CommitSig::Nil { validator_address, .. }
            | CommitSig::ForBlock { validator_address, .. } => Some(*validator_address),
        }
    }

    pub fn signature(&self) -> Option<&[u8]> {
        match self {
            CommitSig::Absent => None,
            CommitSig::Nil { signature, .. } | CommitSig::ForBlock { signature, .. } => {
                Some(signature)
            }
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            CommitSig::Absent => None,
            CommitSig::Nil { timestamp, .. } | CommitSig::ForBlock { timestamp, .. } => {
                Some(*timestamp)
            }
        }
    }
}

/// The aggregate of per-voter signatures for a specific block at a
/// specific height.
#[derive(Debug, Clone)]
pub struct Commit {
    pub height: i64,
    pub round: i32,
    pub block_id: BlockId,
    pub signatures: Vec<CommitSig>,
}

impl Commit {
    pub fn new(height: i64, round: i32, block_id: BlockId, signatures: Vec<CommitSig>) -> Self {
        Self {
            height,
            round,
            block_id,
            signatures,
        }
    }

    /// Structural validation shared by every [`crate::threshold`] mode: the
    /// commit's own `block_id` must not be nil, and every `ForBlock`
    /// signature must carry non-empty signature bytes.
    pub fn validate_basic(&self) -> Result<(), VerifyError> {
        if self.block_id.is_nil() {
            return Err(VerifyError::InvalidBlockId {
                expected: "non-nil".to_string(),
                got: "nil".to_string(),
            });
        }
        for (index, sig) in self.signatures.iter().enumerate() {
            if let Some(signature) = sig.signature() {
                if signature.is_empty() {
                    return Err(VerifyError::InvalidSignature { index });
                }
            }
        }
        Ok(())
    }
}

/// The precommit vote-type tag used in [`vote_sign_bytes`], matching the
/// Tendermint-family vote-signing schema this crate's sign-bytes format is
/// pinned against.
const VOTE_TYPE_PRECOMMIT: u8 = 0x02;

/// Deterministic length-prefixed encoding of `(vote_type, height, round,
/// block_id_with_part_header, timestamp, chain_id)` — what a voter's
/// signature at `commit.signatures[idx]` actually covers.
pub fn vote_sign_bytes(chain_id: &str, idx: usize, commit: &Commit) -> Vec<u8> {
    let sig = &commit.signatures[idx];
    let block_id = sig.effective_block_id(commit.block_id);
    let timestamp = sig.timestamp().unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap());

    let mut out = Vec::new();
    out.push(VOTE_TYPE_PRECOMMIT);
    write_varint_u64(&mut out, commit.height as u64);
    write_varint_u64(&mut out, commit.round as u64);

    let block_id_bytes = block_id.to_bytes();
    write_varint_u64(&mut out, block_id_bytes.len() as u64);
    out.extend_from_slice(&block_id_bytes);

    write_varint_u64(&mut out, timestamp.timestamp_nanos_opt().unwrap_or(0) as u64);

    let chain_id_bytes = chain_id.as_bytes();
    write_varint_u64(&mut out, chain_id_bytes.len() as u64);
    out.extend_from_slice(chain_id_bytes);

    out
}
