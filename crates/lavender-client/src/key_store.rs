//! Secure local storage for private keys.
//!
//! Every profile may hold one key per [`KeyEpoch`]. Either may be absent:
//! a profile enrolled after the migration has no legacy key, and a profile
//! that never finished encryption setup has neither. Absence is an expected
//! state, reported as `Ok(None)`.

use std::collections::HashMap;

use lavender_crypto::{KeyEpoch, PrivateKey};
use parking_lot::RwLock;

use crate::{error::KeyStoreError, message::ProfileId};

/// Secure on-device storage of private keys.
///
/// # Invariants
///
/// - Private keys never leave the store except to derive shared secrets
/// - A stored legacy key is never replaced
pub trait KeyStore: Send + Sync {
    /// Load the private key of `owner` for `epoch`.
    fn private_key(
        &self,
        owner: ProfileId,
        epoch: KeyEpoch,
    ) -> Result<Option<PrivateKey>, KeyStoreError>;

    /// Store the private key of `owner` for `epoch`.
    ///
    /// # Errors
    ///
    /// - `LegacyKeyImmutable` if `epoch` is legacy and a key already exists
    fn store_private_key(
        &self,
        owner: ProfileId,
        epoch: KeyEpoch,
        key: &PrivateKey,
    ) -> Result<(), KeyStoreError>;

    /// Current-epoch private key of `owner`.
    fn current_private_key(&self, owner: ProfileId) -> Result<Option<PrivateKey>, KeyStoreError> {
        self.private_key(owner, KeyEpoch::Current)
    }

    /// Legacy-epoch private key of `owner`, present only for pre-migration
    /// accounts.
    fn legacy_private_key(&self, owner: ProfileId) -> Result<Option<PrivateKey>, KeyStoreError> {
        self.private_key(owner, KeyEpoch::Legacy)
    }
}

/// In-process key store.
///
/// Backs tests and tools. Can be switched unavailable to exercise the
/// degraded paths of callers.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<(ProfileId, KeyEpoch), PrivateKey>>,
    unavailable: RwLock<bool>,
}

impl MemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a key in its base64 storage form.
    ///
    /// # Errors
    ///
    /// - `Corrupt` if `encoded` is not a valid private key
    /// - Whatever [`KeyStore::store_private_key`] returns
    pub fn insert_encoded(
        &self,
        owner: ProfileId,
        epoch: KeyEpoch,
        encoded: &str,
    ) -> Result<(), KeyStoreError> {
        let key = PrivateKey::from_base64(encoded)
            .map_err(|source| KeyStoreError::Corrupt { owner, epoch, source })?;
        self.store_private_key(owner, epoch, &key)
    }

    /// Make every subsequent call fail with `Unavailable` (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Number of stored keys across all profiles and epochs.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    fn check_available(&self) -> Result<(), KeyStoreError> {
        if *self.unavailable.read() {
            return Err(KeyStoreError::Unavailable("secure storage locked".to_string()));
        }
        Ok(())
    }
}

impl KeyStore for MemoryKeyStore {
    fn private_key(
        &self,
        owner: ProfileId,
        epoch: KeyEpoch,
    ) -> Result<Option<PrivateKey>, KeyStoreError> {
        self.check_available()?;
        Ok(self.keys.read().get(&(owner, epoch)).cloned())
    }

    fn store_private_key(
        &self,
        owner: ProfileId,
        epoch: KeyEpoch,
        key: &PrivateKey,
    ) -> Result<(), KeyStoreError> {
        self.check_available()?;

        let mut keys = self.keys.write();
        if epoch == KeyEpoch::Legacy && keys.contains_key(&(owner, epoch)) {
            return Err(KeyStoreError::LegacyKeyImmutable(owner));
        }
        keys.insert((owner, epoch), key.clone());
        Ok(())
    }
}
