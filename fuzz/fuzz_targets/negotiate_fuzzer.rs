//! Fuzz target for the decryption fallback chain
//!
//! # Strategy
//!
//! - Arbitrary content against arbitrary viewer keys
//! - Either tier's key absent
//! - Genuine blobs sealed under either epoch
//!
//! # Invariants
//!
//! - Negotiation NEVER panics
//! - Plaintext produces no attempts
//! - Candidates try every tier until one opens
//! - Repeating a negotiation gives the same outcome
//! - A genuine blob opens when the viewer holds the matching key

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lavender_client::{negotiate, KeyEpoch, KeyPair, Reveal, ViewerKeys};
use lavender_crypto::{encrypt_for, looks_like_ciphertext, NONCE_SIZE};

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    content: Content,
    current: Option<[u8; 32]>,
    legacy: Option<[u8; 32]>,
    counterparty: [u8; 32],
}

#[derive(Debug, Clone, Arbitrary)]
enum Content {
    Raw(String),
    Sealed { plaintext: String, legacy: bool, nonce: [u8; NONCE_SIZE] },
}

fuzz_target!(|scenario: Scenario| {
    let counterparty = KeyPair::from_random_bytes(scenario.counterparty);
    let current = scenario.current.map(KeyPair::from_random_bytes);
    let legacy = scenario.legacy.map(KeyPair::from_random_bytes);
    let keys = ViewerKeys::new(
        current.as_ref().map(|pair| pair.private.clone()),
        legacy.as_ref().map(|pair| pair.private.clone()),
    );

    let (content, expected) = match scenario.content {
        Content::Raw(content) => (content, None),
        Content::Sealed { plaintext, legacy: use_legacy, nonce } => {
            let (epoch, viewer) = if use_legacy {
                (KeyEpoch::Legacy, legacy.as_ref())
            } else {
                (KeyEpoch::Current, current.as_ref())
            };
            let Some(viewer) = viewer else {
                return;
            };
            let Ok(blob) = encrypt_for(epoch, &plaintext, &counterparty.private, &viewer.public, nonce)
            else {
                return;
            };
            (blob, Some(plaintext))
        },
    };

    let negotiation = negotiate(&content, &keys, Some(&counterparty.public));

    // INVARIANT: plaintext never reaches a tier
    if !looks_like_ciphertext(&content) {
        assert!(negotiation.attempts.is_empty());
        assert_eq!(negotiation.reveal, Reveal::Plaintext(content.clone()));
    }

    // INVARIANT: undecryptable means every tier ran
    if negotiation.reveal == Reveal::Undecryptable {
        assert_eq!(negotiation.attempts.len(), KeyEpoch::FALLBACK_ORDER.len());
    }

    // INVARIANT: deterministic
    assert_eq!(negotiate(&content, &keys, Some(&counterparty.public)), negotiation);

    // INVARIANT: genuine blobs open, unless they decrypt to the legacy sentinel
    if let Some(plaintext) = expected {
        match negotiation.reveal {
            Reveal::Decrypted { text, .. } => assert_eq!(text, plaintext),
            other => assert_eq!(plaintext, lavender_client::FAILURE_SENTINEL, "{other:?}"),
        }
    }
});
