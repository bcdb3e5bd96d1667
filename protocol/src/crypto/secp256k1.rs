//! # secp256k1 Public Keys (optional)
//!
//! Gated behind the `secp256k1` feature. Most chains built on this core use
//! Ed25519 validators; this implementation exists for deployments that
//! bridge to ECDSA-based ecosystems and need their validator keys to match.

use k256::ecdsa::signature::Verifier as _;
use k256::ecdsa::{Signature as EcdsaSignature, VerifyingKey};
use std::fmt;

use super::keys::{KeyError, PublicKey};

/// A secp256k1 (ECDSA) public key, SEC1-compressed (33 bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    bytes: [u8; 33],
}

impl Secp256k1PublicKey {
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 33 {
            return Err(KeyError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(slice).map_err(|_| KeyError::InvalidPublicKey)?;
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(slice);
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.bytes
    }
}

impl PublicKey for Secp256k1PublicKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(&self.bytes) else {
            return false;
        };
        let Ok(sig) = EcdsaSignature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify(message, &sig).is_ok()
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    fn scheme(&self) -> &'static str {
        "secp256k1"
    }

    fn clone_boxed(&self) -> Box<dyn PublicKey> {
        Box::new(self.clone())
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(&self.bytes[..8]))
    }
}
