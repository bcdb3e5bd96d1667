//! # Key Management
//!
//! The [`PublicKey`] trait is the abstraction everything else in this crate
//! verifies against — [`crate::validator::Validator`] stores a `Box<dyn
//! PublicKey>`, so a validator set can mix Ed25519 and (with the
//! `secp256k1` feature) secp256k1 signers without the selector or verifier
//! caring which.
//!
//! Ed25519 is the canonical, always-available implementation.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - We use OS-level RNG (`OsRng`) for key generation.
//! - Key bytes are never logged.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;
use crate::crypto::hash::sha256_array;

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid curve point")]
    InvalidPublicKey,
}

/// A validator identity's public half: something that can verify signatures
/// and derive the address it is known by.
///
/// Implemented by [`Ed25519PublicKey`] and, behind the `secp256k1` feature,
/// `Secp256k1PublicKey`. A [`crate::validator::Validator`] stores one of
/// these as `Box<dyn PublicKey>` rather than a concrete type, so the
/// selector and threshold verifier work uniformly across key schemes.
pub trait PublicKey: fmt::Debug + Send + Sync {
    /// Verify `signature` over `message`. Must return `false` rather than
    /// error on malformed signature bytes — the caller only ever wants a
    /// yes/no answer.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;

    /// Canonical wire encoding of this public key.
    fn to_bytes(&self) -> Vec<u8>;

    /// The address this key is known by: the first [`ADDRESS_LENGTH`] bytes
    /// of `SHA-256(to_bytes())`.
    fn address(&self) -> [u8; ADDRESS_LENGTH] {
        let digest = sha256_array(&self.to_bytes());
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        address
    }

    /// A short tag identifying the key scheme, used in the pinned wire
    /// encoding so a decoder knows which concrete type to reconstruct.
    fn scheme(&self) -> &'static str;

    /// Clone this key into a new boxed trait object.
    ///
    /// `Box<dyn PublicKey>` can't derive `Clone` directly (the trait isn't
    /// object-safe with `Self: Sized` methods), so each implementation
    /// provides its own boxed clone; [`crate::validator::Validator`] uses
    /// this to clone validators without knowing the concrete key type.
    fn clone_boxed(&self) -> Box<dyn PublicKey>;
}

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// An Ed25519 public key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519PublicKey {
    bytes: [u8; 32],
}

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        // Reject degenerate points (low-order points and the like) up front
        // rather than letting them fail verification silently later.
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl PublicKey for Ed25519PublicKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    fn scheme(&self) -> &'static str {
        "ed25519"
    }

    fn clone_boxed(&self) -> Box<dyn PublicKey> {
        Box::new(self.clone())
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// An Ed25519 signing keypair. Used by tests and fixtures to produce votes
/// and commits to verify; the production signer lives outside this crate.
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn from_bytes(secret_key_bytes: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        Ok(Self::from_seed(secret_key_bytes))
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign `message`, returning the raw 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair(pub={})", self.public_key().to_hex())
    }
}
