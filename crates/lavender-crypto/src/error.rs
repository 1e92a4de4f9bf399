//! Error types for key handling and message sealing.

use thiserror::Error;

/// Errors produced by the cryptographic primitives.
///
/// None of these carry key material or plaintext, so they are safe to log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key bytes have the wrong length
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Base64 input could not be decoded
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Peer public key is a low-order point; the agreement carries no secret
    #[error("non-contributory key agreement")]
    NonContributory,

    /// Ciphertext blob does not follow the wire format
    #[error("malformed ciphertext blob: {reason}")]
    MalformedBlob {
        /// What was wrong with the blob
        reason: String,
    },

    /// AEAD authentication failed (wrong key or tampered data)
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for the failure
        reason: String,
    },
}
