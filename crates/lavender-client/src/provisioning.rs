//! Key provisioning at profile creation.
//!
//! The private key is written to secure storage before the public key is
//! published. If publishing fails the local key survives and the next call
//! re-publishes it instead of generating a new pair, so a profile never ends
//! up advertising a key whose private half was lost.

use std::sync::Arc;

use lavender_crypto::{KEY_SIZE, KeyEpoch, KeyPair, PrivateKey, PublicKey};

use crate::{
    directory::ProfileDirectory, env::Environment, error::ClientError, key_store::KeyStore,
    message::ProfileId,
};

/// Result of [`KeyProvisioner::provision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// A new key pair was generated and published
    Generated(PublicKey),
    /// An existing local key was found; its public key was re-published
    Existing(PublicKey),
}

impl Provisioned {
    /// The published public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Generated(key) | Self::Existing(key) => *key,
        }
    }
}

/// Generates, stores and publishes a profile's key pair.
pub struct KeyProvisioner<E: Environment> {
    env: E,
    keys: Arc<dyn KeyStore>,
    directory: Arc<dyn ProfileDirectory>,
}

impl<E: Environment> KeyProvisioner<E> {
    /// Create a provisioner over the given collaborators.
    pub fn new(env: E, keys: Arc<dyn KeyStore>, directory: Arc<dyn ProfileDirectory>) -> Self {
        Self { env, keys, directory }
    }

    /// Ensure `profile` has a current key pair and that its public key is
    /// published.
    ///
    /// Idempotent: repeated calls keep the first generated key.
    ///
    /// # Errors
    ///
    /// - `KeyStore` if secure storage fails
    /// - `Directory` if publishing fails (the local key is kept)
    pub async fn provision(&self, profile: ProfileId) -> Result<Provisioned, ClientError> {
        if let Some(existing) = self.keys.current_private_key(profile)? {
            let public = existing.public_key();
            self.directory.publish_public_key(profile, &public).await?;
            tracing::debug!(%profile, "re-published existing public key");
            return Ok(Provisioned::Existing(public));
        }

        let pair = KeyPair::from_random_bytes(self.env.random_array::<KEY_SIZE>());
        self.keys.store_private_key(profile, KeyEpoch::Current, &pair.private)?;
        self.directory.publish_public_key(profile, &pair.public).await?;

        tracing::info!(%profile, "provisioned encryption key pair");
        Ok(Provisioned::Generated(pair.public))
    }

    /// Import the key a pre-migration account used before the derivation
    /// change. Only ever done once per profile.
    ///
    /// # Errors
    ///
    /// - `KeyStore(LegacyKeyImmutable)` if a legacy key is already stored
    pub fn import_legacy_key(
        &self,
        profile: ProfileId,
        key: &PrivateKey,
    ) -> Result<(), ClientError> {
        self.keys.store_private_key(profile, KeyEpoch::Legacy, key)?;
        tracing::info!(%profile, "imported legacy private key");
        Ok(())
    }
}
