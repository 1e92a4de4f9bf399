//! Message sealing using `XChaCha20-Poly1305`
//!
//! All functions are pure - random bytes must be provided by the caller.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};

use crate::{
    derivation::{KeyEpoch, SharedSecret, derive_shared_secret},
    error::CryptoError,
    keys::{PrivateKey, PublicKey},
};

/// Size of the `XChaCha20` nonce (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub(crate) const POLY1305_TAG_SIZE: usize = 16;

/// A sealed message: nonce plus ciphertext with its authentication tag.
///
/// Serialized to the single delimited string stored in place of message
/// content, see [`crate::wire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// The 24-byte `XChaCha20` nonce
    pub nonce: [u8; NONCE_SIZE],
    /// The ciphertext including 16-byte Poly1305 tag
    pub ciphertext: Vec<u8>,
}

impl SealedMessage {
    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(POLY1305_TAG_SIZE)
    }
}

/// Seal `plaintext` under `secret`.
///
/// # Security
///
/// - A nonce must never repeat under the same secret. With 24-byte random
///   nonces collisions are negligible.
/// - Caller MUST provide cryptographically secure random bytes in production
pub fn seal(plaintext: &[u8], secret: &SharedSecret, nonce: [u8; NONCE_SIZE]) -> SealedMessage {
    let cipher = XChaCha20Poly1305::new(secret.key().into());

    let Ok(ciphertext) = cipher.encrypt(&XNonce::from(nonce), plaintext) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    SealedMessage { nonce, ciphertext }
}

/// Open a sealed message.
///
/// # Errors
///
/// - `DecryptionFailed`: If authentication tag or key is incorrect (tamper)
pub fn open(sealed: &SealedMessage, secret: &SharedSecret) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(secret.key().into());

    cipher
        .decrypt(&XNonce::from(sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed { reason: "authentication failed".to_string() })
}

/// Encrypt `plaintext` from sender to recipient and produce the stored blob.
///
/// Derives the secret from the sender's private key and the recipient's
/// public key, which is the mirror of what the recipient will combine when
/// reading.
///
/// # Errors
///
/// - `NonContributory`: recipient public key is a low-order point
pub fn encrypt_for(
    epoch: KeyEpoch,
    plaintext: &str,
    sender_private: &PrivateKey,
    recipient_public: &PublicKey,
    nonce: [u8; NONCE_SIZE],
) -> Result<String, CryptoError> {
    let secret = derive_shared_secret(epoch, sender_private, recipient_public)?;
    Ok(seal(plaintext.as_bytes(), &secret, nonce).encode())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::keys::{KEY_SIZE, KeyPair};

    fn secret(a: u8, b: u8) -> SharedSecret {
        let alice = KeyPair::from_random_bytes([a; KEY_SIZE]);
        let bob = KeyPair::from_random_bytes([b; KEY_SIZE]);
        derive_shared_secret(KeyEpoch::Current, &alice.private, &bob.public).unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let secret = secret(1, 2);
        let sealed = seal(b"Hello, World!", &secret, [0xAB; NONCE_SIZE]);

        assert_eq!(open(&sealed, &secret).unwrap(), b"Hello, World!");
    }

    #[test]
    fn empty_message_roundtrip() {
        let secret = secret(1, 2);
        let sealed = seal(b"", &secret, [0x00; NONCE_SIZE]);

        assert_eq!(sealed.ciphertext.len(), POLY1305_TAG_SIZE);
        assert_eq!(open(&sealed, &secret).unwrap(), b"");
    }

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        let secret = secret(1, 2);
        let plaintext = b"test message";
        let sealed = seal(plaintext, &secret, [0x00; NONCE_SIZE]);

        assert_eq!(sealed.ciphertext.len(), plaintext.len() + POLY1305_TAG_SIZE);
        assert_eq!(sealed.plaintext_len(), plaintext.len());
    }

    #[test]
    fn different_nonces_produce_different_ciphertexts() {
        let secret = secret(1, 2);

        let first = seal(b"test", &secret, [0x00; NONCE_SIZE]);
        let second = seal(b"test", &secret, [0xFF; NONCE_SIZE]);

        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn wrong_secret_fails() {
        let sealed = seal(b"secret message", &secret(1, 2), [0x00; NONCE_SIZE]);

        let result = open(&sealed, &secret(1, 3));
        assert!(matches!(
            result,
            Err(CryptoError::DecryptionFailed { reason }) if reason.contains("authentication")
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let secret = secret(1, 2);
        let mut sealed = seal(b"original message", &secret, [0x00; NONCE_SIZE]);
        sealed.ciphertext[0] ^= 0xFF;

        assert!(open(&sealed, &secret).is_err());
    }

    #[test]
    fn tampered_nonce_fails() {
        let secret = secret(1, 2);
        let mut sealed = seal(b"original message", &secret, [0x00; NONCE_SIZE]);
        sealed.nonce[5] ^= 0x01;

        assert!(open(&sealed, &secret).is_err());
    }

    #[test]
    fn encrypt_for_opens_on_the_recipient_side() {
        let sender = KeyPair::from_random_bytes([4; KEY_SIZE]);
        let recipient = KeyPair::from_random_bytes([5; KEY_SIZE]);

        let blob = encrypt_for(
            KeyEpoch::Current,
            "hello",
            &sender.private,
            &recipient.public,
            [0x11; NONCE_SIZE],
        )
        .unwrap();

        let sealed = SealedMessage::parse(&blob).unwrap();
        let secret =
            derive_shared_secret(KeyEpoch::Current, &recipient.private, &sender.public).unwrap();
        assert_eq!(open(&sealed, &secret).unwrap(), b"hello");
    }
}
