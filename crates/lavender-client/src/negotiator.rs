//! Decryption with backward-compatible key fallback.
//!
//! Every stored message is re-read on every render. The procedure holds no
//! state between calls and never writes anything back, so the same content
//! and key material always produce the same result.
//!
//! ```text
//! DETECT_FORMAT ──plaintext──────────────────────────────► Plaintext
//!       │
//!       ▼
//! ATTEMPT_CURRENT ──ok──────────────────────────────────► Decrypted
//!       │ no key / failed
//!       ▼
//! ATTEMPT_LEGACY ──ok───────────────────────────────────► Decrypted
//!       │ no key / failed
//!       ▼
//! Undecryptable (rendered as the localized placeholder)
//! ```
//!
//! Each tier combines the viewer's private key for that epoch with the
//! counterparty's published public key. A failed tier is recorded and the
//! next one is tried; errors never escape [`negotiate`].

use std::sync::Arc;

use lavender_crypto::{
    CryptoError, KeyEpoch, PrivateKey, PublicKey, SealedMessage, derive_shared_secret,
    looks_like_ciphertext, open,
};
use thiserror::Error;

use crate::{
    directory::ProfileDirectory,
    error::ClientError,
    key_store::KeyStore,
    locale::Locale,
    message::{ProfileId, StoredMessage},
    roles::resolve_counterparty,
};

/// Output an older cryptography library returned instead of failing.
///
/// Decrypting to exactly this text is treated as a failed attempt.
pub const FAILURE_SENTINEL: &str = "[Unable to decrypt message]";

/// Why a single decryption tier failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// Viewer holds no private key for this epoch; the tier is skipped
    #[error("no {} private key", .0.as_str())]
    MissingPrivateKey(KeyEpoch),

    /// Counterparty has not published a public key
    #[error("counterparty has no public key")]
    MissingCounterpartyKey,

    /// Content passed format detection but is not a valid blob
    #[error(transparent)]
    Malformed(CryptoError),

    /// Agreement or authentication failed
    #[error(transparent)]
    Crypto(CryptoError),

    /// Decryption produced the legacy failure sentinel
    #[error("decryption produced the failure sentinel")]
    FailureSentinel,

    /// Decrypted bytes are not valid UTF-8
    #[error("decrypted content is not UTF-8")]
    InvalidUtf8,
}

/// What a chat screen should show for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reveal {
    /// Content was never encrypted; shown unchanged
    Plaintext(String),
    /// Content was decrypted
    Decrypted {
        /// Decrypted text
        text: String,
        /// Epoch whose key opened the blob
        epoch: KeyEpoch,
    },
    /// No available key opened the blob
    Undecryptable,
}

impl Reveal {
    /// Text to render, substituting the localized placeholder on failure.
    pub fn display(&self, locale: Locale) -> &str {
        match self {
            Self::Plaintext(text) | Self::Decrypted { text, .. } => text,
            Self::Undecryptable => locale.undecryptable_placeholder(),
        }
    }

    /// Owned variant of [`Reveal::display`].
    pub fn into_display(self, locale: Locale) -> String {
        match self {
            Self::Plaintext(text) | Self::Decrypted { text, .. } => text,
            Self::Undecryptable => locale.undecryptable_placeholder().to_string(),
        }
    }

    /// Whether this is the failure outcome.
    pub fn is_undecryptable(&self) -> bool {
        matches!(self, Self::Undecryptable)
    }
}

/// The viewer's private keys, one optional key per epoch.
#[derive(Debug, Clone, Default)]
pub struct ViewerKeys {
    /// Current-epoch key
    pub current: Option<PrivateKey>,
    /// Legacy-epoch key, only for pre-migration accounts
    pub legacy: Option<PrivateKey>,
}

impl ViewerKeys {
    /// Build from both optional keys.
    pub fn new(current: Option<PrivateKey>, legacy: Option<PrivateKey>) -> Self {
        Self { current, legacy }
    }

    /// Key for `epoch`, if held.
    pub fn get(&self, epoch: KeyEpoch) -> Option<&PrivateKey> {
        match epoch {
            KeyEpoch::Current => self.current.as_ref(),
            KeyEpoch::Legacy => self.legacy.as_ref(),
        }
    }

    /// Whether the viewer holds no key at all.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.legacy.is_none()
    }
}

/// Record of one tier of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Epoch of the tier
    pub epoch: KeyEpoch,
    /// `Ok` if this tier opened the blob
    pub result: Result<(), DecryptError>,
}

impl Attempt {
    /// Whether cryptographic work was done. Tiers without a viewer key are
    /// skipped.
    pub fn was_tried(&self) -> bool {
        !matches!(self.result, Err(DecryptError::MissingPrivateKey(_)))
    }
}

/// Outcome of [`negotiate`] with the tiers it went through, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    /// What to show
    pub reveal: Reveal,
    /// Tiers in the order they ran; empty for plaintext
    pub attempts: Vec<Attempt>,
}

/// Try to open `blob` with one epoch's key.
///
/// Succeeds only if the blob opens and the result is neither invalid UTF-8
/// nor the [`FAILURE_SENTINEL`].
pub fn attempt(
    epoch: KeyEpoch,
    blob: &str,
    private: Option<&PrivateKey>,
    counterparty: Option<&PublicKey>,
) -> Result<String, DecryptError> {
    let private = private.ok_or(DecryptError::MissingPrivateKey(epoch))?;
    let counterparty = counterparty.ok_or(DecryptError::MissingCounterpartyKey)?;

    let sealed = SealedMessage::parse(blob).map_err(DecryptError::Malformed)?;
    let secret =
        derive_shared_secret(epoch, private, counterparty).map_err(DecryptError::Crypto)?;
    let bytes = open(&sealed, &secret).map_err(DecryptError::Crypto)?;

    let text = String::from_utf8(bytes).map_err(|_| DecryptError::InvalidUtf8)?;
    if text == FAILURE_SENTINEL {
        return Err(DecryptError::FailureSentinel);
    }
    Ok(text)
}

/// Decide what to show for stored `content`.
///
/// Pure and total: plaintext passes through unchanged, candidate blobs are
/// tried with the current key, then the legacy key, and anything that no
/// tier opens becomes [`Reveal::Undecryptable`].
pub fn negotiate(
    content: &str,
    keys: &ViewerKeys,
    counterparty: Option<&PublicKey>,
) -> Negotiation {
    if !looks_like_ciphertext(content) {
        return Negotiation { reveal: Reveal::Plaintext(content.to_string()), attempts: Vec::new() };
    }

    let mut attempts = Vec::with_capacity(KeyEpoch::FALLBACK_ORDER.len());
    for epoch in KeyEpoch::FALLBACK_ORDER {
        match attempt(epoch, content, keys.get(epoch), counterparty) {
            Ok(text) => {
                tracing::trace!(epoch = epoch.as_str(), len = text.len(), "blob opened");
                attempts.push(Attempt { epoch, result: Ok(()) });
                return Negotiation { reveal: Reveal::Decrypted { text, epoch }, attempts };
            },
            Err(err) => {
                tracing::debug!(epoch = epoch.as_str(), error = %err, "decryption tier failed");
                attempts.push(Attempt { epoch, result: Err(err) });
            },
        }
    }

    Negotiation { reveal: Reveal::Undecryptable, attempts }
}

/// Loads key material for a viewer and runs [`negotiate`].
///
/// Suspends at most once per message: the counterparty public key fetch.
/// Nothing is cached, so key changes (an upgrade importing a legacy key,
/// a counterparty re-provisioning) take effect on the next render.
#[derive(Clone)]
pub struct Decryptor {
    keys: Arc<dyn KeyStore>,
    directory: Arc<dyn ProfileDirectory>,
}

impl Decryptor {
    /// Create a decryptor over the given collaborators.
    pub fn new(keys: Arc<dyn KeyStore>, directory: Arc<dyn ProfileDirectory>) -> Self {
        Self { keys, directory }
    }

    /// Load both of the viewer's private keys.
    pub fn viewer_keys(&self, viewer: ProfileId) -> Result<ViewerKeys, ClientError> {
        Ok(ViewerKeys::new(
            self.keys.current_private_key(viewer)?,
            self.keys.legacy_private_key(viewer)?,
        ))
    }

    /// Negotiate `message` for `viewer`, propagating collaborator failures.
    ///
    /// Plaintext content short-circuits before any key load or fetch. A
    /// viewer without keys skips the fetch, since no tier could succeed.
    ///
    /// # Errors
    ///
    /// - `Role` if the viewer is not a participant
    /// - `KeyStore` if secure storage cannot be read
    /// - `Directory` if the counterparty key fetch fails
    pub async fn try_reveal(
        &self,
        message: &StoredMessage,
        viewer: ProfileId,
    ) -> Result<Negotiation, ClientError> {
        let content = message.ciphertext_blob.as_str();
        if !looks_like_ciphertext(content) {
            return Ok(negotiate(content, &ViewerKeys::default(), None));
        }

        let counterparty = resolve_counterparty(message, viewer)?;
        let keys = self.viewer_keys(viewer)?;

        let public = if keys.is_empty() {
            tracing::warn!(%viewer, "viewer has no private keys, skipping key fetch");
            None
        } else {
            self.directory.fetch_public_key(counterparty.profile_id).await?
        };

        Ok(negotiate(content, &keys, public.as_ref()))
    }

    /// Decide what to show for `message`. Never fails: every error becomes
    /// [`Reveal::Undecryptable`].
    pub async fn reveal(&self, message: &StoredMessage, viewer: ProfileId) -> Reveal {
        match self.try_reveal(message, viewer).await {
            Ok(negotiation) => negotiation.reveal,
            Err(err) => {
                tracing::warn!(message_id = %message.id, error = %err, "message not revealed");
                Reveal::Undecryptable
            },
        }
    }
}
