// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VoterSet
//!
//! The sampled, address-sorted output of [`crate::selector::select_voters`]:
//! every member carries a `voting_power` that may differ from its
//! `staking_power`, and zero-power validators never appear here. Once
//! built, a `VoterSet` is immutable and cheaply shareable by reference —
//! [`ThresholdVerifier`](crate::threshold) modes only ever read it.

use tracing::debug;

use crate::arithmetic::safe_add_clip;
use crate::config::{ADDRESS_LENGTH, MAX_TOTAL_VOTING_POWER};
use crate::crypto::hash::merkle_root;
use crate::crypto::keys::{Ed25519PublicKey, PublicKey};
use crate::encoding::{read_varint_i64, read_varint_u64, write_varint_i64, write_varint_u64};
use crate::error::VoterSetError;
use crate::validator::Validator;

const SCHEME_ED25519: u8 = 0;
#[cfg(feature = "secp256k1")]
const SCHEME_SECP256K1: u8 = 1;

/// An address-sorted set of sampled voters with a cached total voting
/// power. The input to every [`crate::threshold`] verification mode.
#[derive(Debug)]
pub struct VoterSet {
    voters: Vec<Validator>,
    total_voting_power: i64,
}

impl VoterSet {
    /// Build a `VoterSet` from already-sampled validators (each already
    /// carrying its assigned `voting_power`). Sorts by address and drops
    /// any validator whose `voting_power` is not strictly positive —
    /// callers (the selector's short-circuit and sampling paths both) are
    /// expected to have already filtered these, but this is the single
    /// choke point that enforces the invariant regardless of caller.
    ///
    /// # Panics
    ///
    /// Panics if the recomputed total voting power exceeds
    /// [`MAX_TOTAL_VOTING_POWER`].
    pub fn new(validators: Vec<Validator>) -> Result<Self, VoterSetError> {
        let mut voters: Vec<Validator> = validators
            .into_iter()
            .filter(|v| v.voting_power > 0)
            .collect();

        if voters.is_empty() {
            return Err(VoterSetError::NilVoterSet);
        }

        voters.sort_by(|a, b| a.address.cmp(&b.address));

        let mut total: i64 = 0;
        for voter in &voters {
            total = safe_add_clip(total, voter.voting_power);
            if total > MAX_TOTAL_VOTING_POWER {
                panic!(
                    "voter set total voting power {total} exceeds MAX_TOTAL_VOTING_POWER {MAX_TOTAL_VOTING_POWER}"
                );
            }
        }

        debug!(voter_count = voters.len(), total_voting_power = total, "constructed voter set");

        Ok(Self {
            voters,
            total_voting_power: total,
        })
    }

    pub fn total_voting_power(&self) -> i64 {
        self.total_voting_power
    }

    pub fn size(&self) -> usize {
        self.voters.len()
    }

    pub fn voters(&self) -> &[Validator] {
        &self.voters
    }

    pub fn get_by_address(&self, address: &[u8]) -> Option<(usize, &Validator)> {
        self.voters
            .iter()
            .position(|v| v.address == address)
            .map(|idx| (idx, &self.voters[idx]))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Validator> {
        self.voters.get(index)
    }

    /// Encode a single validator per the pinned wire format: `address(20) ||
    /// scheme_tag(1) || pubkey_len(varint) || pubkey || staking_power(varint)
    /// || voting_power(varint) || proposer_priority(zigzag-varint)`.
    fn encode_validator(validator: &Validator) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&validator.address);

        let scheme_tag = match validator.public_key.scheme() {
            "ed25519" => SCHEME_ED25519,
            #[cfg(feature = "secp256k1")]
            "secp256k1" => SCHEME_SECP256K1,
            other => panic!("unknown public key scheme: {other}"),
        };
        out.push(scheme_tag);

        let pubkey_bytes = validator.public_key.to_bytes();
        write_varint_u64(&mut out, pubkey_bytes.len() as u64);
        out.extend_from_slice(&pubkey_bytes);

        write_varint_u64(&mut out, validator.staking_power as u64);
        write_varint_u64(&mut out, validator.voting_power as u64);
        write_varint_i64(&mut out, validator.proposer_priority);

        out
    }

    fn decode_validator(buf: &[u8]) -> Result<(Validator, usize), VoterSetError> {
        if buf.len() < ADDRESS_LENGTH + 1 {
            return Err(VoterSetError::InvalidValidator);
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&buf[..ADDRESS_LENGTH]);
        let mut pos = ADDRESS_LENGTH;

        let scheme_tag = buf[pos];
        pos += 1;

        let (pubkey_len, consumed) =
            read_varint_u64(&buf[pos..]).ok_or(VoterSetError::InvalidValidator)?;
        pos += consumed;
        let pubkey_len = pubkey_len as usize;
        if buf.len() < pos + pubkey_len {
            return Err(VoterSetError::InvalidValidator);
        }
        let pubkey_bytes = &buf[pos..pos + pubkey_len];
        pos += pubkey_len;

        let public_key: Box<dyn PublicKey> = match scheme_tag {
            SCHEME_ED25519 => Box::new(
                Ed25519PublicKey::try_from_slice(pubkey_bytes)
                    .map_err(|_| VoterSetError::InvalidValidator)?,
            ),
            #[cfg(feature = "secp256k1")]
            SCHEME_SECP256K1 => Box::new(
                crate::crypto::secp256k1::Secp256k1PublicKey::try_from_slice(pubkey_bytes)
                    .map_err(|_| VoterSetError::InvalidValidator)?,
            ),
            _ => return Err(VoterSetError::InvalidValidator),
        };

        let (staking_power, consumed) =
            read_varint_u64(&buf[pos..]).ok_or(VoterSetError::InvalidValidator)?;
        pos += consumed;
        let (voting_power, consumed) =
            read_varint_u64(&buf[pos..]).ok_or(VoterSetError::InvalidValidator)?;
        pos += consumed;
        let (proposer_priority, consumed) =
            read_varint_i64(&buf[pos..]).ok_or(VoterSetError::InvalidValidator)?;
        pos += consumed;

        if public_key.address() != address {
            return Err(VoterSetError::InvalidValidator);
        }

        let validator = Validator {
            address,
            public_key,
            staking_power: staking_power as i64,
            voting_power: voting_power as i64,
            proposer_priority,
        };
        Ok((validator, pos))
    }

    /// Serialize per the pinned wire format: length-prefixed array of
    /// validator encodings, followed by the cached total voting power.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint_u64(&mut out, self.voters.len() as u64);
        for voter in &self.voters {
            let encoded = Self::encode_validator(voter);
            write_varint_u64(&mut out, encoded.len() as u64);
            out.extend_from_slice(&encoded);
        }
        write_varint_i64(&mut out, self.total_voting_power);
        out
    }

    /// Deserialize a `VoterSet` from [`Self::to_bytes`]'s output.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, VoterSetError> {
        let mut pos = 0;
        let (count, consumed) =
            read_varint_u64(&buf[pos..]).ok_or(VoterSetError::NilVoterSet)?;
        pos += consumed;

        let mut voters = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (entry_len, consumed) =
                read_varint_u64(&buf[pos..]).ok_or(VoterSetError::InvalidValidator)?;
            pos += consumed;
            let entry_len = entry_len as usize;
            if buf.len() < pos + entry_len {
                return Err(VoterSetError::InvalidValidator);
            }
            let (validator, decoded) = Self::decode_validator(&buf[pos..pos + entry_len])?;
            if decoded != entry_len {
                return Err(VoterSetError::InvalidValidator);
            }
            pos += entry_len;
            voters.push(validator);
        }

        let (total_voting_power, _) =
            read_varint_i64(&buf[pos..]).ok_or(VoterSetError::NilVoterSet)?;

        if voters.is_empty() {
            return Err(VoterSetError::NilVoterSet);
        }

        let rebuilt_total: i64 = voters.iter().fold(0, |acc, v| safe_add_clip(acc, v.voting_power));
        if rebuilt_total != total_voting_power {
            return Err(VoterSetError::InvalidValidator);
        }

        Ok(Self {
            voters,
            total_voting_power,
        })
    }

    /// The Merkle root over each voter's encoded bytes, in address order.
    /// Uses the crate's own SHA-256-based [`merkle_root`] as the concrete
    /// default for the otherwise-opaque Merkle-hash collaborator.
    pub fn hash(&self) -> [u8; 32] {
        let leaves: Vec<[u8; 32]> = self
            .voters
            .iter()
            .map(|v| {
                use crate::crypto::hash::sha256_array;
                sha256_array(&Self::encode_validator(v))
            })
            .collect();
        merkle_root(&leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Ed25519Keypair;

    fn voter(staking_power: i64, voting_power: i64) -> Validator {
        let keypair = Ed25519Keypair::generate();
        let mut v = Validator::new(Box::new(keypair.public_key()), staking_power);
        v.voting_power = voting_power;
        v
    }

    #[test]
    fn new_filters_zero_voting_power() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 0), voter(30, 30)]).unwrap();
        assert_eq!(set.size(), 2);
    }

    #[test]
    fn new_sorts_by_address() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20), voter(30, 30)]).unwrap();
        let addresses: Vec<_> = set.voters().iter().map(|v| v.address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
    }

    #[test]
    fn empty_after_filtering_is_nil_voter_set_error() {
        assert_eq!(
            VoterSet::new(vec![voter(10, 0)]).unwrap_err(),
            VoterSetError::NilVoterSet
        );
    }

    #[test]
    fn total_voting_power_is_the_sum() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20), voter(30, 30)]).unwrap();
        assert_eq!(set.total_voting_power(), 60);
    }

    #[test]
    fn round_trip_bytes_preserves_total_voting_power() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20)]).unwrap();
        let bytes = set.to_bytes();
        let restored = VoterSet::from_bytes(&bytes).unwrap();
        assert_eq!(restored.total_voting_power(), set.total_voting_power());
        assert_eq!(restored.size(), set.size());
        for (a, b) in set.voters().iter().zip(restored.voters().iter()) {
            assert_eq!(a.address, b.address);
            assert_eq!(a.staking_power, b.staking_power);
            assert_eq!(a.voting_power, b.voting_power);
            assert_eq!(a.proposer_priority, b.proposer_priority);
        }
    }

    #[test]
    fn round_trip_preserves_hash() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20), voter(5, 5)]).unwrap();
        let bytes = set.to_bytes();
        let restored = VoterSet::from_bytes(&bytes).unwrap();
        assert_eq!(set.hash(), restored.hash());
    }

    #[test]
    fn hash_changes_when_a_voter_changes() {
        let set_a = VoterSet::new(vec![voter(10, 10), voter(20, 20)]).unwrap();
        let set_b = VoterSet::new(vec![voter(10, 10), voter(99, 99)]).unwrap();
        assert_ne!(set_a.hash(), set_b.hash());
    }

    #[test]
    fn hash_is_deterministic() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20)]).unwrap();
        assert_eq!(set.hash(), set.hash());
    }

    #[test]
    fn get_by_address_and_index_agree() {
        let set = VoterSet::new(vec![voter(10, 10), voter(20, 20)]).unwrap();
        let (idx, by_addr) = set.get_by_address(&set.voters()[0].address).unwrap();
        let by_idx = set.get_by_index(idx).unwrap();
        assert_eq!(by_addr.address, by_idx.address);
    }

    #[test]
    fn from_bytes_rejects_truncated_input() {
        assert!(VoterSet::from_bytes(&[0x01]).is_err());
    }
}
