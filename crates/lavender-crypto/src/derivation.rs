//! Shared-secret derivation for both key epochs.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use x25519_dalek::StaticSecret;
use zeroize::Zeroize;

use crate::{
    error::CryptoError,
    keys::{KEY_SIZE, PrivateKey, PublicKey},
};

/// HKDF info label for the current epoch
const CURRENT_LABEL: &[u8] = b"lavenderMessageV2";

/// Hash prefix for the legacy epoch
const LEGACY_LABEL: &[u8] = b"lavenderMessageV1";

/// Key-derivation epoch.
///
/// The agreement itself is identical in both epochs; only the function
/// turning the raw agreement into a symmetric key differs. A blob sealed
/// under one epoch cannot be opened with a secret derived under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEpoch {
    /// Used for every new message
    Current,
    /// Retained only to open messages sealed before the migration
    Legacy,
}

impl KeyEpoch {
    /// Epochs in the order a reader should try them.
    pub const FALLBACK_ORDER: [Self; 2] = [Self::Current, Self::Legacy];

    /// Short lowercase name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}

/// Symmetric key shared by the two participants of a conversation.
pub struct SharedSecret {
    key: [u8; 32],
}

impl SharedSecret {
    /// 32-byte symmetric key for XChaCha20-Poly1305 AEAD.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the shared secret between `private` and `public` under `epoch`.
///
/// Commutative: Alice's private key with Bob's public key yields the same
/// secret as Bob's private key with Alice's public key. Combining any other
/// pair silently yields a different secret, never an error, so callers must
/// pick the pair exactly.
///
/// # Errors
///
/// - `NonContributory`: `public` is a low-order point
pub fn derive_shared_secret(
    epoch: KeyEpoch,
    private: &PrivateKey,
    public: &PublicKey,
) -> Result<SharedSecret, CryptoError> {
    let secret = StaticSecret::from(*private.as_bytes());
    let agreement = secret.diffie_hellman(&x25519_dalek::PublicKey::from(*public.as_bytes()));
    if !agreement.was_contributory() {
        return Err(CryptoError::NonContributory);
    }

    let key = match epoch {
        KeyEpoch::Current => {
            let hkdf = Hkdf::<Sha256>::new(None, agreement.as_bytes());
            let mut okm = [0u8; KEY_SIZE];
            let Ok(()) = hkdf.expand(CURRENT_LABEL, &mut okm) else {
                unreachable!("32 bytes is a valid HKDF-SHA256 output length");
            };
            okm
        },
        KeyEpoch::Legacy => {
            let mut hasher = Sha256::new();
            hasher.update(LEGACY_LABEL);
            hasher.update(agreement.as_bytes());
            hasher.finalize().into()
        },
    };

    Ok(SharedSecret { key })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    fn pair(byte: u8) -> KeyPair {
        KeyPair::from_random_bytes([byte; KEY_SIZE])
    }

    #[test]
    fn agreement_is_commutative_in_both_epochs() {
        let alice = pair(1);
        let bob = pair(2);

        for epoch in KeyEpoch::FALLBACK_ORDER {
            let ab = derive_shared_secret(epoch, &alice.private, &bob.public).unwrap();
            let ba = derive_shared_secret(epoch, &bob.private, &alice.public).unwrap();
            assert_eq!(ab.key(), ba.key(), "{} epoch must be commutative", epoch.as_str());
        }
    }

    #[test]
    fn epochs_produce_different_secrets() {
        let alice = pair(1);
        let bob = pair(2);

        let current = derive_shared_secret(KeyEpoch::Current, &alice.private, &bob.public).unwrap();
        let legacy = derive_shared_secret(KeyEpoch::Legacy, &alice.private, &bob.public).unwrap();

        assert_ne!(current.key(), legacy.key());
    }

    #[test]
    fn wrong_pairing_produces_different_secret() {
        let alice = pair(1);
        let bob = pair(2);
        let carol = pair(3);

        let right = derive_shared_secret(KeyEpoch::Current, &alice.private, &bob.public).unwrap();
        let wrong = derive_shared_secret(KeyEpoch::Current, &alice.private, &carol.public).unwrap();

        assert_ne!(right.key(), wrong.key());
    }

    #[test]
    fn derivation_is_deterministic() {
        let alice = pair(9);
        let bob = pair(10);

        let first = derive_shared_secret(KeyEpoch::Legacy, &alice.private, &bob.public).unwrap();
        let second = derive_shared_secret(KeyEpoch::Legacy, &alice.private, &bob.public).unwrap();

        assert_eq!(first.key(), second.key());
    }

    #[test]
    fn low_order_point_is_rejected() {
        // The identity point (all zeros) forces an all-zero agreement
        let alice = pair(1);
        let identity = PublicKey::from_bytes([0u8; KEY_SIZE]);

        let result = derive_shared_secret(KeyEpoch::Current, &alice.private, &identity);
        assert!(matches!(result, Err(CryptoError::NonContributory)));
    }
}
