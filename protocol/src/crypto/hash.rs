//! # Hashing Utilities
//!
//! The voter selection and commit verification core hashes three kinds of
//! things: validator records (for [`crate::voter_set::VoterSet::hash`]),
//! VRF proof bytes (the sampling seed), and vote sign-bytes (what a
//! signature actually covers). All three use plain SHA-256 — the same
//! choice Tendermint-family consensus engines make for `tmhash`, and the
//! one every verifier on the other side of a signature needs to agree on
//! without argument.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use nova_protocol::crypto::hash::sha256;
///
/// let hash = sha256(b"NOVA protocol");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Same as [`sha256`] but avoids the heap allocation for callers that want
/// a fixed-size type (every hot path in `selector` and `voter_set` does).
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// Hash multiple byte slices together without a concatenation buffer.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute a domain-separated hash: `SHA-256(domain || 0x00 || data)`.
///
/// Domain separation prevents a hash computed for one purpose (say, a vote
/// sign-byte hash) from colliding with a hash computed for another (a
/// validator-set hash) even when the raw bytes happen to coincide. The
/// domain tag and data are fed to the hasher separately with a NUL
/// separator so no domain string is a prefix of another plus data.
pub fn domain_separated_hash(domain: &str, data: &[u8]) -> [u8; 32] {
    sha256_multi(&[domain.as_bytes(), &[0u8], data])
}

/// Compute a Merkle root over 32-byte leaves using the Bitcoin/Tendermint
/// convention: pairwise SHA-256, duplicating the trailing leaf when a level
/// has an odd count.
///
/// Returns all-zero for an empty leaf set (the "empty tree" sentinel) and
/// `SHA-256(leaf || leaf)` for a single leaf, so the root is always the
/// output of a hash rather than a raw leaf value.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut current_level: Vec<[u8; 32]> = leaves.to_vec();

    if current_level.len() == 1 {
        return sha256_multi(&[current_level[0].as_slice(), current_level[0].as_slice()]);
    }

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for chunk in current_level.chunks(2) {
            let left = &chunk[0];
            let right = if chunk.len() == 2 { &chunk[1] } else { &chunk[0] };
            next_level.push(sha256_multi(&[left.as_slice(), right.as_slice()]));
        }

        current_level = next_level;
    }

    current_level[0]
}
