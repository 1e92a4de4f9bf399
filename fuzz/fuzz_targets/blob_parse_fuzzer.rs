//! Fuzz target for stored-content classification and blob parsing
//!
//! # Strategy
//!
//! - Arbitrary UTF-8 content, with and without delimiters
//! - Valid blobs with a single corrupted byte
//! - Extra segments appended to valid blobs
//!
//! # Invariants
//!
//! - Classification and parsing NEVER panic
//! - Content without a delimiter is never a candidate
//! - Anything that parses re-encodes to the same string
//! - Corrupted blobs never open

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lavender_crypto::{
    derive_shared_secret, encrypt_for, looks_like_ciphertext, open, KeyEpoch, KeyPair,
    SealedMessage, NONCE_SIZE,
};

#[derive(Debug, Clone, Arbitrary)]
enum Input {
    /// Any stored content
    Content(String),
    /// Valid blob with one byte flipped
    Corrupted { plaintext: String, index: usize, flip: u8 },
    /// Valid blob with extra segments
    ExtraSegments { plaintext: String, suffix: String },
}

fn blob(plaintext: &str) -> (String, KeyPair, KeyPair) {
    let alice = KeyPair::from_random_bytes([1; 32]);
    let bob = KeyPair::from_random_bytes([2; 32]);
    let blob = encrypt_for(KeyEpoch::Current, plaintext, &alice.private, &bob.public, [3; NONCE_SIZE])
        .expect("fixed keys are contributory");
    (blob, alice, bob)
}

fuzz_target!(|input: Input| {
    match input {
        Input::Content(content) => {
            let candidate = looks_like_ciphertext(&content);

            // INVARIANT: no delimiter means plaintext
            if !content.contains(':') {
                assert!(!candidate, "content without a delimiter must be plaintext");
            }

            // INVARIANT: parsed blobs re-encode identically
            if let Ok(sealed) = SealedMessage::parse(&content) {
                assert!(candidate, "parseable content must be a candidate");
                assert_eq!(sealed.encode(), content);
            }
        },

        Input::Corrupted { plaintext, index, flip } => {
            let (blob, alice, bob) = blob(&plaintext);
            let mut bytes = blob.into_bytes();
            let index = index % bytes.len();
            bytes[index] ^= flip.max(1);

            let Ok(corrupted) = String::from_utf8(bytes) else {
                return;
            };
            let Ok(sealed) = SealedMessage::parse(&corrupted) else {
                return;
            };
            let secret = derive_shared_secret(KeyEpoch::Current, &bob.private, &alice.public)
                .expect("fixed keys are contributory");

            // INVARIANT: tampering is detected unless it decodes to the same bytes
            if let Ok(opened) = open(&sealed, &secret) {
                assert_eq!(opened, plaintext.as_bytes(), "tampered blob opened to different text");
            }
        },

        Input::ExtraSegments { plaintext, suffix } => {
            let (blob, _, _) = blob(&plaintext);
            let extended = format!("{blob}:{suffix}");

            // INVARIANT: more than two segments is a candidate that never parses
            assert!(looks_like_ciphertext(&extended));
            assert!(SealedMessage::parse(&extended).is_err());
        },
    }
});
