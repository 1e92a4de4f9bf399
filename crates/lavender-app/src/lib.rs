//! Application layer for Lavender chat
//!
//! Drives decryption for a chat screen. Each visible message is revealed on
//! its own task so a slow key fetch for one message never holds up another,
//! and leaving the screen cancels whatever is still outstanding.
//!
//! # Components
//!
//! - [`ChatConfig`]: Locale, timeout and concurrency settings
//! - [`ChatDecryptor`]: Per-message task set yielding [`RenderedMessage`]s

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chat;
mod config;

pub use chat::{ChatDecryptor, RenderedMessage};
pub use config::ChatConfig;
