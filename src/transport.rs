//! Abstract transport boundary between the rendering engine and the chat
//! platform.
//!
//! The engine only ever speaks four verbs: edit, reply, delete, send-file.
//! Anything platform-specific (HTTP clients, rate limiting, parse modes)
//! lives behind this trait.

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of a single message on the remote chat surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageHandle(pub i64);

/// Identifier of the chat (channel, group, DM) that owns the messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatHandle(pub i64);

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures a transport call can surface to the synchronizer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The platform rejected an edit because the content did not change.
    /// The synchronizer detects no-ops before calling, so seeing this
    /// indicates a bug in the caller or a concurrent writer.
    #[error("message content not modified")]
    NotModified,
    /// The platform asked us to slow down.
    #[error("rate limited by the platform")]
    RateLimited,
    /// The request never reached the platform.
    #[error("network failure: {0}")]
    Network(String),
    /// The platform accepted the request and refused it.
    #[error("platform error: {0}")]
    Api(String),
}

/// The four primitives the engine needs from a chat platform.
///
/// All calls may fail; each failure must be distinguishable so the
/// synchronizer can tell a fatal anchor failure from a transient one.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Replace the text of an existing message.
    async fn edit(&self, handle: MessageHandle, text: &str) -> Result<(), TransportError>;

    /// Create a new message as a reply to `parent`, returning its handle.
    async fn reply(&self, parent: MessageHandle, text: &str)
        -> Result<MessageHandle, TransportError>;

    /// Remove a message from the chat surface.
    async fn delete(&self, handle: MessageHandle) -> Result<(), TransportError>;

    /// Upload `bytes` as a named attachment with a caption.
    async fn send_file(
        &self,
        chat: ChatHandle,
        bytes: &[u8],
        filename: &str,
        caption: &str,
    ) -> Result<MessageHandle, TransportError>;
}
