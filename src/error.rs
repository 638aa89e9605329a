//! Errors a render call can surface to its caller.
//!
//! Only the anchor edit is fatal; everything else (truncated walks, failed
//! deletes, title-generation failures) is reported as outcome data or
//! recovered locally, so the error surface stays small.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The edit of the chain's anchor message failed. The chain state is
    /// left untouched; reconciling children against an ambiguous head
    /// would corrupt the chain.
    #[error("anchor edit failed: {0}")]
    Anchor(#[from] TransportError),
}
