//! replychain — incremental message rendering for chat surfaces.
//!
//! Takes a growing block of text and keeps a bounded reply chain of
//! transport messages in sync with it: the anchor message holds the first
//! chunk, overflow chunks become replies, and repeated renders edit only
//! what changed.
//!
//! Architecture:
//! - `chunker` / `policy`: pure functions (segmentation, text-vs-file)
//! - `chain` / `sync`: per-anchor state and the reconciliation walk
//! - `file_renderer`: full-text attachment delivery with title fallback
//! - `transport`: the abstract edit/reply/delete/send-file boundary
//! - `renderer`: the policy-driven entry point tying it all together

pub mod chain;
pub mod chunker;
pub mod config;
pub mod error;
pub mod file_renderer;
pub mod policy;
pub mod renderer;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use chain::{Chain, ChainStore, ChildMessage};
pub use chunker::{chunk, SplitMode};
pub use config::RenderConfig;
pub use error::RenderError;
pub use file_renderer::{FileRenderer, NamingStrategy, TitleProvider};
pub use policy::{decide, RenderDecision, SendFileMode};
pub use renderer::{Delivery, Renderer};
pub use sync::{ChainSynchronizer, RenderOutcome};
pub use transport::{ChatHandle, MessageHandle, Transport, TransportError};
