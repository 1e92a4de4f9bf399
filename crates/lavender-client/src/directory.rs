//! Remote profile directory.
//!
//! The only field read here is a profile's `encryption_public_key`. Reads may
//! suspend on the network; no timeout is applied at this layer.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use lavender_crypto::PublicKey;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{error::DirectoryError, message::ProfileId};

/// Remote store of profile records.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch the public key published on `profile`.
    ///
    /// Returns `Ok(None)` when the profile has no key yet.
    ///
    /// # Errors
    ///
    /// - `Unavailable` on network failure
    /// - `InvalidPublicKey` if the stored field does not decode
    async fn fetch_public_key(
        &self,
        profile: ProfileId,
    ) -> Result<Option<PublicKey>, DirectoryError>;

    /// Publish `key` as the public key of `profile`.
    async fn publish_public_key(
        &self,
        profile: ProfileId,
        key: &PublicKey,
    ) -> Result<(), DirectoryError>;
}

/// The slice of a profile row this crate reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Profile identifier
    pub id: ProfileId,
    /// Base64 X25519 public key, absent until provisioning completes
    #[serde(default)]
    pub encryption_public_key: Option<String>,
}

impl ProfileRecord {
    /// Decode the record's public key.
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey` if the field is present but not a valid key
    pub fn public_key(&self) -> Result<Option<PublicKey>, DirectoryError> {
        self.encryption_public_key
            .as_deref()
            .map(PublicKey::from_base64)
            .transpose()
            .map_err(|source| DirectoryError::InvalidPublicKey { profile: self.id, source })
    }
}

/// In-process profile directory.
///
/// Counts fetches and can be switched offline, which is how tests observe
/// remote traffic and simulate network failure.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: RwLock<HashMap<ProfileId, ProfileRecord>>,
    offline: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile record.
    pub fn upsert(&self, record: ProfileRecord) {
        self.records.write().insert(record.id, record);
    }

    /// Current record for `profile`.
    pub fn record(&self, profile: ProfileId) -> Option<ProfileRecord> {
        self.records.read().get(&profile).cloned()
    }

    /// Make every subsequent call fail with `Unavailable` (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `fetch_public_key` calls served so far, including failed
    /// ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), DirectoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("network unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileDirectory for MemoryDirectory {
    async fn fetch_public_key(
        &self,
        profile: ProfileId,
    ) -> Result<Option<PublicKey>, DirectoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let records = self.records.read();
        let record = records.get(&profile).ok_or(DirectoryError::ProfileNotFound(profile))?;
        record.public_key()
    }

    async fn publish_public_key(
        &self,
        profile: ProfileId,
        key: &PublicKey,
    ) -> Result<(), DirectoryError> {
        self.check_online()?;

        self.records
            .write()
            .entry(profile)
            .or_insert_with(|| ProfileRecord { id: profile, encryption_public_key: None })
            .encryption_public_key = Some(key.to_base64());
        Ok(())
    }
}
