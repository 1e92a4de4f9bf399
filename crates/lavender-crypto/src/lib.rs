//! Lavender Cryptographic Primitives
//!
//! Cryptographic building blocks for Lavender chat. Pure functions with
//! deterministic outputs. Callers provide random bytes (key generation,
//! nonces) so every operation can be reproduced in tests.
//!
//! # Key Lifecycle
//!
//! Each profile owns one X25519 key pair. The private half stays in secure
//! on-device storage, the public half is published on the profile record.
//! A message between two profiles is sealed under a symmetric key derived
//! from one side's private key and the other side's public key.
//!
//! ```text
//! Own Private Key + Peer Public Key
//!        │
//!        ▼
//! X25519 Agreement (commutative)
//!        │
//!        ▼
//! Epoch KDF → Shared Secret   (Current: HKDF-SHA256, Legacy: SHA-256)
//!        │
//!        ▼
//! AEAD Encryption → "nonce:ciphertext" blob
//! ```
//!
//! # Key Epochs
//!
//! The derivation from agreement to shared secret changed once in the
//! product's history. [`KeyEpoch::Current`] is used for every new message.
//! [`KeyEpoch::Legacy`] is kept so blobs sealed before the change can still be
//! opened; it must never be used to seal new content outside migration
//! tooling.
//!
//! # Security
//!
//! Authenticity:
//! - XChaCha20-Poly1305 AEAD provides tamper-proof encryption
//! - Failed authentication tag -> reject message
//!
//! Key Hygiene:
//! - Private keys and shared secrets are zeroized on drop
//! - `Debug` output never includes secret bytes
//! - Non-contributory agreements (low-order peer points) are rejected

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod derivation;
mod error;
mod keys;
pub mod wire;

pub use cipher::{NONCE_SIZE, SealedMessage, encrypt_for, open, seal};
pub use derivation::{KeyEpoch, SharedSecret, derive_shared_secret};
pub use error::CryptoError;
pub use keys::{KEY_SIZE, KeyPair, PrivateKey, PublicKey};
pub use wire::looks_like_ciphertext;
