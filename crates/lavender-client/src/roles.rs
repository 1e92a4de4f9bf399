//! Role resolution for shared-secret derivation.
//!
//! The viewer always combines its own private key with the *other*
//! participant's public key. Picking the wrong public key does not fail, it
//! derives a different secret, so the choice is made here and nowhere else.

use crate::{
    error::RoleError,
    message::{ProfileId, StoredMessage},
};

/// The viewer's role in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Viewer sent the message
    Sender,
    /// Viewer received the message
    Receiver,
}

/// The participant whose public key the viewer must combine with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counterparty {
    /// Viewer's own role
    pub role: Role,
    /// The other participant
    pub profile_id: ProfileId,
}

/// Resolve whose public key `viewer` needs to read `message`.
///
/// - viewer is sender: receiver's public key
/// - viewer is receiver: sender's public key
///
/// A message to oneself resolves as sender, with oneself as counterparty.
///
/// # Errors
///
/// - `NotAParticipant` if the viewer is neither sender nor receiver
pub fn resolve_counterparty(
    message: &StoredMessage,
    viewer: ProfileId,
) -> Result<Counterparty, RoleError> {
    if viewer == message.sender_profile_id {
        Ok(Counterparty { role: Role::Sender, profile_id: message.receiver_profile_id })
    } else if viewer == message.receiver_profile_id {
        Ok(Counterparty { role: Role::Receiver, profile_id: message.sender_profile_id })
    } else {
        Err(RoleError::NotAParticipant { viewer, message: message.id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::message::{ContentType, MessageId};

    const ALICE: ProfileId = ProfileId(Uuid::from_u128(1));
    const BOB: ProfileId = ProfileId(Uuid::from_u128(2));
    const MALLORY: ProfileId = ProfileId(Uuid::from_u128(3));

    fn message(sender: ProfileId, receiver: ProfileId) -> StoredMessage {
        StoredMessage {
            id: MessageId(Uuid::from_u128(100)),
            sender_profile_id: sender,
            receiver_profile_id: receiver,
            content_type: ContentType::Text,
            ciphertext_blob: "AAAA:BBBB".to_string(),
        }
    }

    #[test]
    fn sender_combines_with_receiver() {
        let resolved = resolve_counterparty(&message(ALICE, BOB), ALICE).unwrap();
        assert_eq!(resolved, Counterparty { role: Role::Sender, profile_id: BOB });
    }

    #[test]
    fn receiver_combines_with_sender() {
        let resolved = resolve_counterparty(&message(ALICE, BOB), BOB).unwrap();
        assert_eq!(resolved, Counterparty { role: Role::Receiver, profile_id: ALICE });
    }

    #[test]
    fn outsider_is_rejected() {
        let msg = message(ALICE, BOB);
        let result = resolve_counterparty(&msg, MALLORY);
        assert_eq!(result, Err(RoleError::NotAParticipant { viewer: MALLORY, message: msg.id }));
    }

    #[test]
    fn note_to_self_resolves_as_sender() {
        let resolved = resolve_counterparty(&message(ALICE, ALICE), ALICE).unwrap();
        assert_eq!(resolved, Counterparty { role: Role::Sender, profile_id: ALICE });
    }
}
