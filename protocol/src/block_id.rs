// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # BlockId
//!
//! The block identity a commit is anchored to. Equality is field-wise;
//! nothing here is hashed or derived — `hash` and `part_set_header.hash`
//! are opaque 32-byte values produced by the Merkle-hash collaborator this
//! crate treats as external (see [`crate::crypto::hash::merkle_root`] for
//! the concrete default it happens to use elsewhere in this crate).

use crate::encoding::write_varint_u64;

/// Identifies one of the parts a block is split into for transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: [u8; 32],
}

impl PartSetHeader {
    pub fn new(total: u32, hash: [u8; 32]) -> Self {
        Self { total, hash }
    }
}

/// A block's identity: its content hash plus the part-set header used to
/// reassemble it from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockId {
    pub hash: [u8; 32],
    pub part_set_header: PartSetHeader,
}

impl BlockId {
    pub fn new(hash: [u8; 32], part_set_header: PartSetHeader) -> Self {
        Self { hash, part_set_header }
    }

    /// The zero `BlockId`, used as the nil/no-block sentinel.
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::nil()
    }

    /// Pinned wire encoding: `hash(32) || part_set_header.total(varint) ||
    /// part_set_header.hash(32)`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32 + 4 + 32);
        out.extend_from_slice(&self.hash);
        write_varint_u64(&mut out, self.part_set_header.total as u64);
        out.extend_from_slice(&self.part_set_header.hash);
        out
    }
}
