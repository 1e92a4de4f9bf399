//! Client
//!
//! Client-side encryption procedures for Lavender chat: provisioning a
//! profile's key pair, composing outgoing messages, and turning stored
//! message content back into something a chat screen can show.
//!
//! # Architecture
//!
//! The pure decision procedure lives in [`negotiate`]: given stored content,
//! the viewer's key material and the counterparty's public key, it walks the
//! fallback chain and returns a [`Negotiation`]. Everything that touches
//! storage or the network is behind a collaborator trait so tests can
//! substitute deterministic fakes:
//!
//! - [`KeyStore`]: secure on-device storage for private keys
//! - [`ProfileDirectory`]: remote profile records holding public keys
//! - [`Environment`]: source of randomness
//!
//! # Components
//!
//! - [`KeyProvisioner`]: Generates, stores and publishes a profile's keys
//! - [`Composer`]: Seals outgoing content, or falls back to plaintext
//! - [`Decryptor`]: Async wrapper around [`negotiate`] that loads keys
//! - [`resolve_counterparty`]: Picks whose public key the viewer combines with
//!
//! # Failure Model
//!
//! Reading never fails from the caller's point of view. [`Decryptor::reveal`]
//! yields plaintext, decrypted text, or [`Reveal::Undecryptable`], which is
//! rendered as a fixed localized placeholder. Missing keys, wrong keys and
//! corrupt blobs are indistinguishable to the end user.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composer;
mod directory;
mod env;
mod error;
mod key_store;
mod locale;
mod message;
mod negotiator;
mod provisioning;
mod roles;

pub use composer::{Composer, OutgoingContent};
pub use directory::{MemoryDirectory, ProfileDirectory, ProfileRecord};
pub use env::{Environment, SeededEnv, SystemEnv};
pub use error::{ClientError, DirectoryError, KeyStoreError, RoleError};
pub use key_store::{KeyStore, MemoryKeyStore};
pub use lavender_crypto::{KeyEpoch, KeyPair, PrivateKey, PublicKey};
pub use locale::Locale;
pub use message::{ContentType, MessageId, ProfileId, StoredMessage};
pub use negotiator::{
    Attempt, DecryptError, Decryptor, FAILURE_SENTINEL, Negotiation, Reveal, ViewerKeys, attempt,
    negotiate,
};
pub use provisioning::{KeyProvisioner, Provisioned};
pub use roles::{Counterparty, Role, resolve_counterparty};
