//! Concurrent decryption for one open chat screen.
//!
//! Every submitted message gets its own task. Results come back in completion
//! order, which is unrelated to the order messages were submitted or appear
//! on screen; callers place each result by its [`MessageId`].
//!
//! ```text
//! submit ──► in flight ──completed──► next_rendered yields
//!               │   │
//!               │   └──timeout / panic──► next_rendered yields placeholder
//!               │
//!               └──cancel / cancel_all / drop──► discarded
//! ```

use std::collections::HashMap;

use lavender_client::{Decryptor, MessageId, ProfileId, Reveal, StoredMessage};
use tokio::task::{self, AbortHandle, JoinSet};

use crate::config::ChatConfig;

/// A message ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Which message this is
    pub message_id: MessageId,
    /// Outcome of the fallback chain
    pub reveal: Reveal,
    /// Text to show, with the placeholder already localized
    pub text: String,
}

/// Decrypts the messages of one chat screen on background tasks.
///
/// Dropping the decryptor aborts every outstanding task.
pub struct ChatDecryptor {
    decryptor: Decryptor,
    viewer: ProfileId,
    config: ChatConfig,
    tasks: JoinSet<Reveal>,
    in_flight: HashMap<MessageId, AbortHandle>,
    by_task: HashMap<task::Id, MessageId>,
}

impl ChatDecryptor {
    /// Create a decryptor for the screen `viewer` is looking at.
    pub fn new(decryptor: Decryptor, viewer: ProfileId, config: ChatConfig) -> Self {
        Self {
            decryptor,
            viewer,
            config,
            tasks: JoinSet::new(),
            in_flight: HashMap::new(),
            by_task: HashMap::new(),
        }
    }

    /// Profile whose keys are used.
    pub fn viewer(&self) -> ProfileId {
        self.viewer
    }

    /// Active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Number of messages still decrypting.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether `id` is still decrypting.
    pub fn is_in_flight(&self, id: MessageId) -> bool {
        self.in_flight.contains_key(&id)
    }

    /// Start revealing `message`.
    ///
    /// Returns `false` without spawning if the message is already in flight
    /// or `max_in_flight` is reached.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn submit(&mut self, message: StoredMessage) -> bool {
        let message_id = message.id;
        if self.in_flight.contains_key(&message_id) {
            tracing::trace!(%message_id, "already in flight");
            return false;
        }
        if self.in_flight.len() >= self.config.max_in_flight {
            tracing::warn!(%message_id, limit = self.config.max_in_flight, "too many messages in flight");
            return false;
        }

        let decryptor = self.decryptor.clone();
        let viewer = self.viewer;
        let limit = self.config.fetch_timeout;

        let handle = self.tasks.spawn(async move {
            let reveal = decryptor.reveal(&message, viewer);
            match limit {
                Some(limit) => tokio::time::timeout(limit, reveal).await.unwrap_or_else(|_| {
                    tracing::warn!(%message_id, ?limit, "reveal timed out");
                    Reveal::Undecryptable
                }),
                None => reveal.await,
            }
        });

        self.by_task.insert(handle.id(), message_id);
        self.in_flight.insert(message_id, handle);
        true
    }

    /// Stop revealing `id`. Its result will never be yielded.
    ///
    /// Returns `false` if `id` was not in flight.
    pub fn cancel(&mut self, id: MessageId) -> bool {
        let Some(handle) = self.in_flight.remove(&id) else {
            return false;
        };
        handle.abort();
        self.by_task.remove(&handle.id());
        tracing::debug!(message_id = %id, "reveal cancelled");
        true
    }

    /// Stop every outstanding reveal, e.g. when the screen is left.
    pub fn cancel_all(&mut self) {
        if !self.in_flight.is_empty() {
            tracing::debug!(count = self.in_flight.len(), "cancelling all reveals");
        }
        self.tasks.abort_all();
        self.in_flight.clear();
        self.by_task.clear();
    }

    /// Wait for the next message to finish.
    ///
    /// Returns `None` once nothing is in flight. A task that panicked yields
    /// [`Reveal::Undecryptable`] like any other failure.
    pub async fn next_rendered(&mut self) -> Option<RenderedMessage> {
        loop {
            let (task_id, reveal) = match self.tasks.join_next_with_id().await? {
                Ok((task_id, reveal)) => (task_id, reveal),
                Err(err) if err.is_cancelled() => {
                    self.by_task.remove(&err.id());
                    continue;
                },
                Err(err) => {
                    tracing::error!(error = %err, "reveal task panicked");
                    (err.id(), Reveal::Undecryptable)
                },
            };

            // Cancelled after it already finished
            let Some(message_id) = self.by_task.remove(&task_id) else {
                continue;
            };
            self.in_flight.remove(&message_id);

            let text = reveal.display(self.config.locale).to_string();
            return Some(RenderedMessage { message_id, reveal, text });
        }
    }

    /// Wait for every in-flight message, in completion order.
    pub async fn drain(&mut self) -> Vec<RenderedMessage> {
        let mut rendered = Vec::with_capacity(self.in_flight.len());
        while let Some(message) = self.next_rendered().await {
            rendered.push(message);
        }
        rendered
    }
}

impl Drop for ChatDecryptor {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
