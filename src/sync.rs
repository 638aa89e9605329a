//! Reconciles a stored reply chain against a new version of the text with
//! the fewest transport calls.
//!
//! One render: chunk the text, fix up the anchor, then walk the overflow
//! positions editing, creating, or deleting children as needed. The walk
//! truncates on the first edit/reply failure and resumes on the caller's
//! next render; only a failing anchor edit aborts the call outright.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::chain::{Chain, ChainStore, ChildMessage};
use crate::chunker::{chunk, SplitMode};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::transport::{MessageHandle, Transport, TransportError};

/// What one render call did, including the partial-failure detail the
/// caller may want to assert on or log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Number of chunks the effective text produced.
    pub chunk_count: usize,
    /// Messages whose text was actually edited (anchor included).
    pub edits: usize,
    /// New overflow messages created.
    pub replies: usize,
    /// Positions whose displayed text already matched (no transport call).
    pub skipped: usize,
    /// Every delete attempted this call, with the failure if it had one.
    /// Delete failures are cosmetic and never truncate the walk.
    pub deletes: Vec<(MessageHandle, Option<TransportError>)>,
    /// True when an edit or reply failure truncated the walk; the chain
    /// keeps the old text for the untouched tail and the next render
    /// resumes from there.
    pub partial: bool,
    /// Children left displaying out-of-date text by a truncated walk.
    pub stale_children: usize,
    /// True when the render collapsed to zero chunks and the chain was
    /// dropped.
    pub cleared: bool,
}

/// Stateful engine that keeps remote reply chains in sync with growing
/// text. Generic over the transport so tests (and platforms) plug in
/// their own.
pub struct ChainSynchronizer<T: Transport> {
    transport: Arc<T>,
    store: ChainStore,
    config: RenderConfig,
}

impl<T: Transport> ChainSynchronizer<T> {
    pub fn new(transport: Arc<T>, config: RenderConfig) -> Self {
        Self {
            transport,
            store: ChainStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Number of live chains.
    pub fn chain_count(&self) -> usize {
        self.store.len()
    }

    /// Forget the chain for `anchor` without touching the remote messages.
    /// For owners tearing down a conversation.
    pub fn discard(&self, anchor: MessageHandle) -> bool {
        self.store.remove(anchor)
    }

    /// Render `full_text` onto the chain anchored at `anchor`, replacing
    /// whatever the chain showed before.
    pub async fn render(
        &self,
        anchor: MessageHandle,
        full_text: &str,
    ) -> Result<RenderOutcome, RenderError> {
        self.render_inner(anchor, full_text, false).await
    }

    /// Like [`render`](Self::render), but concatenates `addition` onto the
    /// previously rendered text (with the configured separator) instead of
    /// replacing it. Falls back to a plain render when there is no prior
    /// text.
    pub async fn render_append(
        &self,
        anchor: MessageHandle,
        addition: &str,
    ) -> Result<RenderOutcome, RenderError> {
        self.render_inner(anchor, addition, true).await
    }

    async fn render_inner(
        &self,
        anchor: MessageHandle,
        text: &str,
        append: bool,
    ) -> Result<RenderOutcome, RenderError> {
        // Held for the whole render: same-anchor calls serialize here,
        // different anchors proceed independently. Re-validate the slot
        // after winning the lock: a clear that held it first removes the
        // store entry, and mutating that orphaned chain would create
        // children no store entry tracks.
        let mut chain = loop {
            let slot = self.store.acquire(anchor);
            let guard = slot.clone().lock_owned().await;
            if self.store.is_current(anchor, &slot) {
                break guard;
            }
        };

        let effective = if append && !chain.last_rendered_text.is_empty() && !text.is_empty() {
            format!(
                "{}{}{}",
                chain.last_rendered_text, self.config.append_separator, text
            )
        } else {
            text.to_string()
        };

        let chunks = chunk(
            &effective,
            self.config.max_chunk_len,
            self.config.look_back_window,
            SplitMode::Stable,
        );

        if chunks.is_empty() {
            return Ok(self.clear(anchor, &mut chain).await);
        }

        let mut outcome = RenderOutcome {
            chunk_count: chunks.len(),
            ..RenderOutcome::default()
        };

        // Anchor first. A failure here aborts with the chain untouched;
        // reconciling children against an ambiguous head would corrupt
        // the chain.
        if chain.anchor_text == chunks[0] {
            debug!(anchor = %anchor, "anchor text unchanged, skipping edit");
            outcome.skipped += 1;
        } else {
            self.transport.edit(anchor, &chunks[0]).await?;
            chain.anchor_text = chunks[0].clone();
            outcome.edits += 1;
        }

        self.reconcile_children(anchor, &mut chain, &chunks[1..], &mut outcome)
            .await;

        chain.last_rendered_text = effective;
        Ok(outcome)
    }

    /// Walk the overflow positions. `overflow[i]` belongs to
    /// `chain.children[i]`; extra chunks grow the chain, extra children
    /// shrink it.
    async fn reconcile_children(
        &self,
        anchor: MessageHandle,
        chain: &mut Chain,
        overflow: &[String],
        outcome: &mut RenderOutcome,
    ) {
        let old = std::mem::take(&mut chain.children);
        let mut new_children: Vec<ChildMessage> = Vec::with_capacity(overflow.len());
        let mut last_handle = anchor;

        let positions = overflow.len().max(old.len());
        for i in 0..positions {
            match (overflow.get(i), old.get(i)) {
                (Some(text), Some(child)) => {
                    if child.text == *text {
                        outcome.skipped += 1;
                        new_children.push(child.clone());
                    } else {
                        match self.transport.edit(child.handle, text).await {
                            Ok(()) => {
                                outcome.edits += 1;
                                new_children.push(ChildMessage {
                                    handle: child.handle,
                                    text: text.clone(),
                                });
                            }
                            Err(e) => {
                                warn!(
                                    anchor = %anchor,
                                    child = %child.handle,
                                    error = %e,
                                    "child edit failed, truncating reconciliation"
                                );
                                outcome.partial = true;
                                // The untouched tail keeps its old text so
                                // the next render resumes positionally.
                                outcome.stale_children = old.len() - i;
                                new_children.extend(old[i..].iter().cloned());
                                break;
                            }
                        }
                    }
                    last_handle = child.handle;
                }
                (Some(text), None) => match self.transport.reply(last_handle, text).await {
                    Ok(handle) => {
                        outcome.replies += 1;
                        new_children.push(ChildMessage {
                            handle,
                            text: text.clone(),
                        });
                        last_handle = handle;
                    }
                    Err(e) => {
                        warn!(
                            anchor = %anchor,
                            parent = %last_handle,
                            error = %e,
                            "reply failed, truncating reconciliation"
                        );
                        outcome.partial = true;
                        break;
                    }
                },
                (None, Some(child)) => {
                    // Shrink: best effort, a stale remote message is
                    // cosmetic.
                    let result = self.transport.delete(child.handle).await;
                    if let Some(e) = result.as_ref().err() {
                        warn!(anchor = %anchor, child = %child.handle, error = %e, "delete failed");
                    }
                    outcome.deletes.push((child.handle, result.err()));
                }
                (None, None) => unreachable!("walk bounded by max(overflow, children)"),
            }
        }

        chain.children = new_children;
    }

    /// Zero chunks: tear the chain down. Child deletes and the placeholder
    /// edit are best effort; the chain state is dropped regardless.
    async fn clear(&self, anchor: MessageHandle, chain: &mut Chain) -> RenderOutcome {
        let mut outcome = RenderOutcome {
            cleared: true,
            ..RenderOutcome::default()
        };

        for child in chain.children.drain(..) {
            let result = self.transport.delete(child.handle).await;
            if let Some(e) = result.as_ref().err() {
                warn!(anchor = %anchor, child = %child.handle, error = %e, "delete failed during clear");
            }
            outcome.deletes.push((child.handle, result.err()));
        }

        if chain.anchor_text != self.config.cleared_placeholder {
            match self.transport.edit(anchor, &self.config.cleared_placeholder).await {
                Ok(()) => outcome.edits += 1,
                Err(e) => {
                    warn!(anchor = %anchor, error = %e, "placeholder edit failed during clear")
                }
            }
        } else {
            outcome.skipped += 1;
        }

        chain.anchor_text.clear();
        chain.last_rendered_text.clear();
        self.store.remove(anchor);
        outcome
    }
}
