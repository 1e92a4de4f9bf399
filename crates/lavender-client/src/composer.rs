//! Outgoing message composition.
//!
//! New messages are always sealed under [`KeyEpoch::Current`]. When either
//! side's key material is missing the message is stored as plaintext, which
//! readers recognize by its segment count.

use std::sync::Arc;

use lavender_crypto::{KeyEpoch, NONCE_SIZE, encrypt_for, looks_like_ciphertext};

use crate::{
    directory::ProfileDirectory,
    env::Environment,
    error::{ClientError, DirectoryError},
    key_store::KeyStore,
    message::ProfileId,
};

/// Content to store for an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingContent {
    /// Sealed blob
    Encrypted(String),
    /// Plaintext stored because key exchange was not possible
    PlaintextFallback(String),
}

impl OutgoingContent {
    /// The string to store in the message row.
    pub fn as_stored(&self) -> &str {
        match self {
            Self::Encrypted(blob) => blob,
            Self::PlaintextFallback(text) => text,
        }
    }

    /// Consume into the string to store.
    pub fn into_stored(self) -> String {
        match self {
            Self::Encrypted(blob) | Self::PlaintextFallback(blob) => blob,
        }
    }

    /// Whether the content was sealed.
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

/// Seals outgoing messages for their recipient.
///
/// Generic over `E` so nonces come from a seeded RNG in tests.
pub struct Composer<E: Environment> {
    env: E,
    keys: Arc<dyn KeyStore>,
    directory: Arc<dyn ProfileDirectory>,
}

impl<E: Environment> Composer<E> {
    /// Create a composer over the given collaborators.
    pub fn new(env: E, keys: Arc<dyn KeyStore>, directory: Arc<dyn ProfileDirectory>) -> Self {
        Self { env, keys, directory }
    }

    /// Produce the content to store for `plaintext` sent by `sender` to
    /// `receiver`.
    ///
    /// Uses the sender's private key and the receiver's public key. Falls back
    /// to plaintext if either is absent, including when the receiver has no
    /// profile record at all.
    ///
    /// # Errors
    ///
    /// - `KeyStore` if secure storage cannot be read
    /// - `Directory` if the directory is unreachable or holds an invalid key
    /// - `Crypto` if the receiver's published key is unusable
    pub async fn compose(
        &self,
        sender: ProfileId,
        receiver: ProfileId,
        plaintext: &str,
    ) -> Result<OutgoingContent, ClientError> {
        let Some(sender_private) = self.keys.current_private_key(sender)? else {
            tracing::warn!(%sender, "sender has no private key, storing plaintext");
            return Ok(self.fallback(plaintext));
        };

        let receiver_public = match self.directory.fetch_public_key(receiver).await {
            Ok(Some(key)) => key,
            Ok(None) | Err(DirectoryError::ProfileNotFound(_)) => {
                tracing::warn!(%receiver, "receiver has no public key, storing plaintext");
                return Ok(self.fallback(plaintext));
            },
            Err(err) => return Err(err.into()),
        };

        let nonce: [u8; NONCE_SIZE] = self.env.random_array();
        let blob =
            encrypt_for(KeyEpoch::Current, plaintext, &sender_private, &receiver_public, nonce)?;
        Ok(OutgoingContent::Encrypted(blob))
    }

    fn fallback(&self, plaintext: &str) -> OutgoingContent {
        if looks_like_ciphertext(plaintext) {
            // Readers will treat this as a blob and show the placeholder
            tracing::warn!("plaintext fallback contains the blob delimiter");
        }
        OutgoingContent::PlaintextFallback(plaintext.to_string())
    }
}
