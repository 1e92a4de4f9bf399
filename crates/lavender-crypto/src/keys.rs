//! X25519 key material.
//!
//! Keys travel as base64 strings: the public key is the value of a profile's
//! `encryption_public_key` field, the private key is what secure storage
//! holds.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use x25519_dalek::StaticSecret;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;

/// Size of both private and public X25519 keys
pub const KEY_SIZE: usize = 32;

/// Private half of a profile's key pair.
///
/// Owned by the device that generated it. Zeroized on drop and never
/// printed by `Debug`.
#[derive(Clone)]
pub struct PrivateKey {
    bytes: [u8; KEY_SIZE],
}

impl PrivateKey {
    /// Wrap raw scalar bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Wrap a byte slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self { bytes: to_key_array(bytes)? })
    }

    /// Decode from the base64 form kept in secure storage.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = Zeroizing::new(decode_base64(encoded)?);
        Self::from_slice(&decoded)
    }

    /// Encode for secure storage. The returned string is zeroized on drop.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(self.bytes))
    }

    /// Raw scalar bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Public key matching this private key.
    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(self.bytes);
        PublicKey::from_bytes(x25519_dalek::PublicKey::from(&secret).to_bytes())
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public half of a profile's key pair. Readable by anyone who can read the
/// profile.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; KEY_SIZE],
}

impl PublicKey {
    /// Wrap raw point bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Wrap a byte slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self { bytes: to_key_array(bytes)? })
    }

    /// Decode the profile field representation.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_slice(&decode_base64(encoded)?)
    }

    /// Encode for the profile field.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }

    /// Raw point bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

/// A profile's key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Published on the profile record
    pub public: PublicKey,
    /// Kept in secure local storage
    pub private: PrivateKey,
}

impl KeyPair {
    /// Build a key pair from 32 caller-provided random bytes.
    ///
    /// Caller MUST provide cryptographically secure random bytes in
    /// production. X25519 clamping is applied during agreement, so any 32
    /// bytes are a valid scalar.
    pub fn from_random_bytes(random: [u8; KEY_SIZE]) -> Self {
        Self::from_private(PrivateKey::from_bytes(random))
    }

    /// Rebuild the key pair from a stored private key.
    pub fn from_private(private: PrivateKey) -> Self {
        Self { public: private.public_key(), private }
    }
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD.decode(encoded.trim()).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

fn to_key_array(bytes: &[u8]) -> Result<[u8; KEY_SIZE], CryptoError> {
    <[u8; KEY_SIZE]>::try_from(bytes)
        .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() })
}
