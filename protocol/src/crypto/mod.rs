//! # Cryptographic Primitives
//!
//! - [`keys`] — the [`keys::PublicKey`] trait and the canonical Ed25519
//!   implementation every validator set supports.
//! - [`secp256k1`] — an optional second key scheme, behind the
//!   `secp256k1` feature.
//! - [`signatures`] — free-function verification helpers over `PublicKey`.
//! - [`hash`] — SHA-256 hashing, domain separation, and Merkle roots.

pub mod hash;
pub mod keys;
#[cfg(feature = "secp256k1")]
pub mod secp256k1;
pub mod signatures;

pub use hash::{merkle_root, sha256, sha256_array};
pub use keys::{Ed25519Keypair, Ed25519PublicKey, KeyError, PublicKey};
pub use signatures::{batch_verify, verify};
