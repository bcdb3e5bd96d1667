//! # Signature Verification Helpers
//!
//! Thin wrappers over [`crate::crypto::keys::PublicKey::verify`]. Kept as
//! free functions (rather than folded into the trait) so call sites that
//! work with raw wire bytes don't need to reconstruct a typed key first.

use thiserror::Error;

use super::keys::PublicKey;

/// Errors during signature operations.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,
}

/// Verify a signature against a public key and message.
///
/// Returns `true` if the signature is valid, `false` otherwise — no
/// distinction is made between "bad signature" and "malformed bytes",
/// since callers only ever act on the boolean.
pub fn verify(public_key: &dyn PublicKey, message: &[u8], signature: &[u8]) -> bool {
    public_key.verify(message, signature)
}

/// Batch-verify multiple (public_key, message, signature) triples.
///
/// All must be valid for this to return `Ok`. This is the sequential
/// reference implementation; the threshold verifier in [`crate::threshold`]
/// calls this per-signature rather than as a single batch so it can report
/// which index failed.
pub fn batch_verify(
    items: &[(&dyn PublicKey, &[u8], &[u8])],
) -> Result<(), SignatureError> {
    for (public_key, message, signature) in items {
        if !public_key.verify(message, signature) {
            return Err(SignatureError::VerificationFailed);
        }
    }
    Ok(())
}
