//! Ciphertext blob wire format.
//!
//! A sealed message is stored as one string in place of the message content:
//!
//! ```text
//! base64(nonce) ":" base64(ciphertext || tag)
//! ```
//!
//! The standard base64 alphabet never contains the delimiter, so a valid
//! blob always has exactly two segments.
//!
//! Readers cannot rely on every stored string being a blob. Messages from
//! before encryption existed, and messages sent while key exchange was
//! unavailable, are stored as plaintext. [`looks_like_ciphertext`] separates
//! the two by segment count alone. The heuristic is loose: a plaintext
//! that contains the delimiter is classified as a candidate blob, fails to
//! open, and is shown as undecryptable.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    cipher::{NONCE_SIZE, POLY1305_TAG_SIZE, SealedMessage},
    error::CryptoError,
};

/// Segment delimiter
pub const DELIMITER: char = ':';

/// Fewer segments than this means the content is plaintext
pub const MIN_SEGMENTS: usize = 2;

/// Classify stored content as a candidate ciphertext blob.
///
/// Not a cryptographic check: `true` only means decryption is worth
/// attempting. Never panics, any input is accepted.
pub fn looks_like_ciphertext(content: &str) -> bool {
    content.split(DELIMITER).nth(MIN_SEGMENTS - 1).is_some()
}

impl SealedMessage {
    /// Encode to the stored blob form.
    pub fn encode(&self) -> String {
        let mut out = STANDARD.encode(self.nonce);
        out.push(DELIMITER);
        out.push_str(&STANDARD.encode(&self.ciphertext));
        out
    }

    /// Parse a stored blob.
    ///
    /// # Errors
    ///
    /// - `MalformedBlob`: wrong segment count, bad base64, wrong nonce size,
    ///   or ciphertext shorter than an authentication tag
    pub fn parse(blob: &str) -> Result<Self, CryptoError> {
        let mut segments = blob.split(DELIMITER);
        let (Some(nonce), Some(ciphertext), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(malformed(format!(
                "expected {MIN_SEGMENTS} segments, got {}",
                blob.split(DELIMITER).count()
            )));
        };

        let nonce = decode_segment("nonce", nonce)?;
        let nonce = <[u8; NONCE_SIZE]>::try_from(nonce.as_slice()).map_err(|_| {
            malformed(format!("nonce must be {NONCE_SIZE} bytes, got {}", nonce.len()))
        })?;

        let ciphertext = decode_segment("ciphertext", ciphertext)?;
        if ciphertext.len() < POLY1305_TAG_SIZE {
            return Err(malformed(format!(
                "ciphertext shorter than {POLY1305_TAG_SIZE}-byte tag: {} bytes",
                ciphertext.len()
            )));
        }

        Ok(Self { nonce, ciphertext })
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD.decode(segment).map_err(|e| malformed(format!("{name} segment: {e}")))
}

fn malformed(reason: String) -> CryptoError {
    CryptoError::MalformedBlob { reason }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_segments_is_plaintext() {
        assert!(!looks_like_ciphertext(""));
        assert!(!looks_like_ciphertext("hello"));
        assert!(!looks_like_ciphertext("see you tonight 🌙"));
    }

    #[test]
    fn two_or_more_segments_is_candidate() {
        assert!(looks_like_ciphertext("a:b"));
        assert!(looks_like_ciphertext(":"));
        assert!(looks_like_ciphertext("a:b:c"));
    }

    #[test]
    fn plaintext_with_delimiter_is_misclassified() {
        // Accepted risk of the segment heuristic
        assert!(looks_like_ciphertext("meet at 10:30"));
    }

    #[test]
    fn encode_parse_roundtrip() {
        let sealed = SealedMessage { nonce: [7; NONCE_SIZE], ciphertext: vec![9; 40] };
        let blob = sealed.encode();

        assert_eq!(blob.matches(DELIMITER).count(), 1);
        assert_eq!(SealedMessage::parse(&blob).unwrap(), sealed);
    }

    #[test]
    fn three_segments_is_malformed() {
        let result = SealedMessage::parse("AAAA:BBBB:CCCC");
        assert!(matches!(
            result,
            Err(CryptoError::MalformedBlob { reason }) if reason.contains("got 3")
        ));
    }

    #[test]
    fn single_segment_is_malformed() {
        assert!(matches!(SealedMessage::parse("AAAA"), Err(CryptoError::MalformedBlob { .. })));
    }

    #[test]
    fn bad_base64_is_malformed() {
        assert!(matches!(
            SealedMessage::parse("not-base64!:also not"),
            Err(CryptoError::MalformedBlob { .. })
        ));
    }

    #[test]
    fn short_nonce_is_malformed() {
        let blob = format!("{}:{}", STANDARD.encode([0u8; 12]), STANDARD.encode([0u8; 32]));
        assert!(matches!(
            SealedMessage::parse(&blob),
            Err(CryptoError::MalformedBlob { reason }) if reason.contains("nonce")
        ));
    }

    #[test]
    fn ciphertext_shorter_than_tag_is_malformed() {
        let blob = format!("{}:{}", STANDARD.encode([0u8; NONCE_SIZE]), STANDARD.encode([0u8; 4]));
        assert!(matches!(
            SealedMessage::parse(&blob),
            Err(CryptoError::MalformedBlob { reason }) if reason.contains("tag")
        ));
    }
}
