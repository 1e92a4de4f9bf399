//! Error types for the client collaborators and procedures.
//!
//! None of these variants carry key material or plaintext.

use lavender_crypto::{CryptoError, KeyEpoch};
use thiserror::Error;

use crate::message::{MessageId, ProfileId};

/// Errors from secure local key storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    /// Storage backend failed (keychain locked, I/O error, ...)
    #[error("key storage unavailable: {0}")]
    Unavailable(String),

    /// Stored key could not be decoded
    #[error("stored {} key for {owner} is corrupt: {source}", .epoch.as_str())]
    Corrupt {
        /// Profile the key belongs to
        owner: ProfileId,
        /// Epoch of the key
        epoch: KeyEpoch,
        /// Decoding failure
        source: CryptoError,
    },

    /// A legacy key is already stored; legacy keys are never regenerated
    #[error("legacy key for {0} already exists")]
    LegacyKeyImmutable(ProfileId),
}

/// Errors from the remote profile directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Network or backend failure
    #[error("profile directory unavailable: {0}")]
    Unavailable(String),

    /// Profile record does not exist
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),

    /// `encryption_public_key` is present but not a valid key
    #[error("invalid public key on profile {profile}: {source}")]
    InvalidPublicKey {
        /// Profile whose field is invalid
        profile: ProfileId,
        /// Decoding failure
        source: CryptoError,
    },
}

/// Errors resolving the viewer's role in a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// Viewer is neither sender nor receiver. Access control upstream should
    /// make this unreachable.
    #[error("profile {viewer} is not a participant of message {message}")]
    NotAParticipant {
        /// Viewing profile
        viewer: ProfileId,
        /// Message being viewed
        message: MessageId,
    },
}

/// Errors surfaced by client procedures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Key storage failure
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// Profile directory failure
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Cryptographic failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Role resolution failure
    #[error(transparent)]
    Role(#[from] RoleError),
}
