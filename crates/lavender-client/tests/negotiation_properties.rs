//! Property tests for the fallback negotiator.

#![allow(clippy::unwrap_used)]

use lavender_client::{KeyEpoch, KeyPair, Reveal, ViewerKeys, negotiate};
use lavender_crypto::{KEY_SIZE, NONCE_SIZE, encrypt_for};
use proptest::prelude::*;

fn pair(seed: [u8; KEY_SIZE]) -> KeyPair {
    KeyPair::from_random_bytes(seed)
}

proptest! {
    #[test]
    fn content_without_delimiter_is_shown_verbatim(content in "[^:]*") {
        let keys = ViewerKeys::new(Some(pair([1; KEY_SIZE]).private), None);
        let negotiation = negotiate(&content, &keys, Some(&pair([2; KEY_SIZE]).public));

        prop_assert_eq!(negotiation.reveal, Reveal::Plaintext(content));
        prop_assert!(negotiation.attempts.is_empty());
    }

    #[test]
    fn negotiation_is_idempotent(
        text in ".{0,64}",
        sender in any::<[u8; KEY_SIZE]>(),
        receiver in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        legacy in any::<bool>(),
    ) {
        let sender = pair(sender);
        let receiver = pair(receiver);
        let epoch = if legacy { KeyEpoch::Legacy } else { KeyEpoch::Current };
        let blob = encrypt_for(epoch, &text, &sender.private, &receiver.public, nonce);
        prop_assume!(blob.is_ok());
        let blob = blob.unwrap();

        let keys = ViewerKeys::new(Some(receiver.private.clone()), Some(receiver.private.clone()));
        let first = negotiate(&blob, &keys, Some(&sender.public));
        let second = negotiate(&blob, &keys, Some(&sender.public));

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.reveal, Reveal::Decrypted { text, epoch });
    }

    #[test]
    fn arbitrary_candidates_never_panic(content in ".*:.*", key in any::<[u8; KEY_SIZE]>()) {
        let viewer = pair(key);
        let keys = ViewerKeys::new(Some(viewer.private.clone()), Some(viewer.private));
        let negotiation = negotiate(&content, &keys, Some(&viewer.public));

        prop_assert_eq!(negotiation.attempts.len(), KeyEpoch::FALLBACK_ORDER.len());
    }
}
