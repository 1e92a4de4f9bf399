//! Commands behind the `lavender` binary.
//!
//! Each command returns the text to print, so the same code paths are
//! exercised by tests without spawning a process. Randomness comes from an
//! [`Environment`] for the same reason.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use lavender_client::{
    Environment, KeyEpoch, KeyPair, Locale, Negotiation, PrivateKey, PublicKey, ViewerKeys,
    negotiate,
};
use lavender_crypto::{CryptoError, KEY_SIZE, encrypt_for};
use thiserror::Error;

/// Errors reported to the command-line user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A key argument did not decode
    #[error("invalid {which} key: {source}")]
    InvalidKey {
        /// Which argument was rejected
        which: &'static str,
        /// Decoding failure
        source: CryptoError,
    },

    /// Sealing failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Generate a key pair and format both halves as base64.
pub fn keygen<E: Environment>(env: &E) -> String {
    let pair = KeyPair::from_random_bytes(env.random_array::<KEY_SIZE>());
    format!("private: {}\npublic:  {}", pair.private.to_base64().as_str(), pair.public.to_base64())
}

/// Seal `text` from the holder of `private` to `recipient`.
///
/// # Errors
///
/// - `InvalidKey` if either key does not decode
/// - `Crypto` if the recipient key is a low-order point
pub fn seal<E: Environment>(
    env: &E,
    epoch: KeyEpoch,
    private: &str,
    recipient: &str,
    text: &str,
) -> Result<String, CliError> {
    let private = parse_private("private", private)?;
    let recipient = parse_public("recipient", recipient)?;
    Ok(encrypt_for(epoch, text, &private, &recipient, env.random_array())?)
}

/// Key material for [`open`], still base64 encoded.
#[derive(Debug, Clone, Copy)]
pub struct OpenKeys<'a> {
    /// Viewer's current private key
    pub private: &'a str,
    /// Viewer's legacy private key, if the account has one
    pub legacy_private: Option<&'a str>,
    /// Counterparty's published public key
    pub counterparty: &'a str,
}

/// Run the fallback chain over `content` as a chat screen would.
///
/// # Errors
///
/// - `InvalidKey` if any key argument does not decode
pub fn open(keys: OpenKeys<'_>, content: &str) -> Result<Negotiation, CliError> {
    let viewer = ViewerKeys::new(
        Some(parse_private("private", keys.private)?),
        keys.legacy_private.map(|key| parse_private("legacy private", key)).transpose()?,
    );
    let counterparty = parse_public("counterparty", keys.counterparty)?;

    Ok(negotiate(content, &viewer, Some(&counterparty)))
}

/// Render a negotiation outcome for the terminal.
pub fn render(negotiation: &Negotiation, locale: Locale) -> String {
    negotiation.reveal.display(locale).to_string()
}

fn parse_private(which: &'static str, encoded: &str) -> Result<PrivateKey, CliError> {
    PrivateKey::from_base64(encoded).map_err(|source| CliError::InvalidKey { which, source })
}

fn parse_public(which: &'static str, encoded: &str) -> Result<PublicKey, CliError> {
    PublicKey::from_base64(encoded).map_err(|source| CliError::InvalidKey { which, source })
}
