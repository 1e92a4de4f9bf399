//! Message and profile identifiers, and the stored message row.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub Uuid);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Kind of content a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Chat text
    #[default]
    Text,
    /// Reference to an uploaded image
    Image,
    /// Reference to an uploaded voice note
    Voice,
    /// Generated by the product (match created, etc.)
    System,
}

/// A chat message as stored by the backend.
///
/// Immutable once sent: deletion removes the row rather than mutating it.
/// `ciphertext_blob` holds either a sealed blob or, for messages from before
/// encryption or sent in fallback mode, the plaintext itself. Decrypted text
/// is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Message identifier
    pub id: MessageId,
    /// Profile that sent the message
    pub sender_profile_id: ProfileId,
    /// Profile the message was sent to
    pub receiver_profile_id: ProfileId,
    /// Kind of content
    #[serde(default)]
    pub content_type: ContentType,
    /// Sealed blob or plaintext
    #[serde(rename = "content")]
    pub ciphertext_blob: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_row() {
        let row = r#"{
            "id": "8c1f7f0e-5b0e-4a7c-9d5e-2f0a1b2c3d4e",
            "sender_profile_id": "00000000-0000-0000-0000-000000000001",
            "receiver_profile_id": "00000000-0000-0000-0000-000000000002",
            "content_type": "text",
            "content": "AAAA:BBBB"
        }"#;

        let message: StoredMessage = serde_json::from_str(row).unwrap();

        assert_eq!(message.sender_profile_id, ProfileId(Uuid::from_u128(1)));
        assert_eq!(message.receiver_profile_id, ProfileId(Uuid::from_u128(2)));
        assert_eq!(message.content_type, ContentType::Text);
        assert_eq!(message.ciphertext_blob, "AAAA:BBBB");
    }

    #[test]
    fn missing_content_type_defaults_to_text() {
        let row = r#"{
            "id": "8c1f7f0e-5b0e-4a7c-9d5e-2f0a1b2c3d4e",
            "sender_profile_id": "00000000-0000-0000-0000-000000000001",
            "receiver_profile_id": "00000000-0000-0000-0000-000000000002",
            "content": "hi"
        }"#;

        let message: StoredMessage = serde_json::from_str(row).unwrap();
        assert_eq!(message.content_type, ContentType::Text);
    }

    #[test]
    fn content_type_uses_snake_case() {
        assert_eq!(serde_json::to_string(&ContentType::Voice).unwrap(), "\"voice\"");
    }
}
