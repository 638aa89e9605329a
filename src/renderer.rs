//! Ties the policy, the chain synchronizer, and the file renderer into a
//! single entry point for streaming callers.

use std::sync::Arc;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::file_renderer::{FileRenderer, NamingStrategy, TitleProvider};
use crate::policy::{decide, RenderDecision};
use crate::sync::{ChainSynchronizer, RenderOutcome};
use crate::transport::{ChatHandle, MessageHandle, Transport, TransportError};

/// Everything one `deliver` call produced.
#[derive(Debug)]
pub struct Delivery {
    pub decision: RenderDecision,
    /// Present when inline text was rendered.
    pub text: Option<RenderOutcome>,
    /// Present when a file upload was attempted; the upload itself may
    /// still have failed.
    pub file: Option<Result<MessageHandle, TransportError>>,
}

/// High-level renderer: apply the send/edit policy, then run the text
/// chain sync and/or the file upload it calls for.
pub struct Renderer<T: Transport> {
    sync: ChainSynchronizer<T>,
    files: FileRenderer<T>,
    config: RenderConfig,
}

impl<T: Transport> Renderer<T> {
    pub fn new(transport: Arc<T>, config: RenderConfig) -> Self {
        Self {
            sync: ChainSynchronizer::new(transport.clone(), config.clone()),
            files: FileRenderer::new(transport, NamingStrategy::Timestamp),
            config,
        }
    }

    pub fn with_naming(mut self, strategy: NamingStrategy) -> Self {
        self.files = self.files.with_strategy(strategy);
        self
    }

    pub fn with_title_provider(mut self, provider: Arc<dyn TitleProvider>) -> Self {
        self.files = self.files.with_title_provider(provider);
        self
    }

    /// Access the underlying synchronizer, e.g. for append-mode renders
    /// or chain teardown.
    pub fn chains(&self) -> &ChainSynchronizer<T> {
        &self.sync
    }

    /// Render `full_text` according to the configured policy. Blank text
    /// produces no transport calls at all; use [`clear`](Self::clear) to
    /// explicitly collapse a chain.
    pub async fn deliver(
        &self,
        chat: ChatHandle,
        anchor: MessageHandle,
        full_text: &str,
    ) -> Result<Delivery, RenderError> {
        let decision = decide(
            full_text,
            self.config.send_file_mode,
            self.config.file_length_threshold,
            self.config.file_only_threshold,
        );

        let mut delivery = Delivery {
            decision,
            text: None,
            file: None,
        };

        if decision.send_text {
            delivery.text = Some(self.sync.render(anchor, full_text).await?);
        }
        if decision.send_file {
            delivery.file = Some(self.files.render_file(chat, full_text).await);
        }
        Ok(delivery)
    }

    /// Collapse the chain for `anchor`: children deleted, anchor edited to
    /// the placeholder, state dropped.
    pub async fn clear(&self, anchor: MessageHandle) -> Result<RenderOutcome, RenderError> {
        self.sync.render(anchor, "").await
    }
}
