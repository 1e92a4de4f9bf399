//! Property-based tests for key agreement, sealing and the blob format.
//!
//! These verify that invariants hold for arbitrary keys and payloads:
//! - Both participants derive the same secret regardless of role
//! - A blob sealed under one epoch only opens under that epoch
//! - Content without the delimiter is never a candidate blob
//! - Parsing never panics on arbitrary input

#![allow(clippy::unwrap_used)]

use lavender_crypto::{
    KEY_SIZE, KeyEpoch, KeyPair, NONCE_SIZE, SealedMessage, derive_shared_secret, encrypt_for,
    looks_like_ciphertext, open,
};
use proptest::prelude::*;

fn epoch_strategy() -> impl Strategy<Value = KeyEpoch> {
    prop_oneof![Just(KeyEpoch::Current), Just(KeyEpoch::Legacy)]
}

fn open_blob(epoch: KeyEpoch, blob: &str, reader: &KeyPair, writer: &KeyPair) -> Option<String> {
    let sealed = SealedMessage::parse(blob).ok()?;
    let secret = derive_shared_secret(epoch, &reader.private, &writer.public).ok()?;
    let bytes = open(&sealed, &secret).ok()?;
    String::from_utf8(bytes).ok()
}

proptest! {
    #[test]
    fn prop_both_roles_recover_plaintext(
        sender_seed in any::<[u8; KEY_SIZE]>(),
        recipient_seed in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        epoch in epoch_strategy(),
        plaintext in ".{0,256}",
    ) {
        let sender = KeyPair::from_random_bytes(sender_seed);
        let recipient = KeyPair::from_random_bytes(recipient_seed);

        let blob = encrypt_for(epoch, &plaintext, &sender.private, &recipient.public, nonce).unwrap();

        // Recipient: own private + sender public
        prop_assert_eq!(open_blob(epoch, &blob, &recipient, &sender), Some(plaintext.clone()));
        // Sender re-reading its own message: own private + recipient public
        prop_assert_eq!(open_blob(epoch, &blob, &sender, &recipient), Some(plaintext));
    }

    #[test]
    fn prop_epochs_do_not_cross(
        sender_seed in any::<[u8; KEY_SIZE]>(),
        recipient_seed in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in ".{0,64}",
    ) {
        let sender = KeyPair::from_random_bytes(sender_seed);
        let recipient = KeyPair::from_random_bytes(recipient_seed);

        let blob = encrypt_for(KeyEpoch::Legacy, &plaintext, &sender.private, &recipient.public, nonce)
            .unwrap();

        prop_assert_eq!(open_blob(KeyEpoch::Current, &blob, &recipient, &sender), None);
        prop_assert_eq!(open_blob(KeyEpoch::Legacy, &blob, &recipient, &sender), Some(plaintext));
    }

    #[test]
    fn prop_sealed_blobs_are_candidates(
        seed in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in ".{0,64}",
    ) {
        let pair = KeyPair::from_random_bytes(seed);
        let peer = KeyPair::from_random_bytes([0x42; KEY_SIZE]);
        let blob = encrypt_for(KeyEpoch::Current, &plaintext, &pair.private, &peer.public, nonce).unwrap();

        prop_assert!(looks_like_ciphertext(&blob));
    }

    #[test]
    fn prop_content_without_delimiter_is_plaintext(content in "[^:]{0,128}") {
        prop_assert!(!looks_like_ciphertext(&content));
    }

    #[test]
    fn prop_parse_never_panics(content in ".{0,256}") {
        let _ = SealedMessage::parse(&content);
    }
}
