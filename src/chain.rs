//! Per-anchor chain state and the store that owns it.
//!
//! A chain ties an anchor message to the ordered overflow children created
//! for it, plus the text each remote message currently displays. Storing
//! the displayed text per message is what makes no-op detection and
//! resume-after-partial-failure possible: the next render simply edits
//! whatever still differs, positionally.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::transport::MessageHandle;

/// One overflow message of a chain and the text it currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildMessage {
    pub handle: MessageHandle,
    pub text: String,
}

/// State of a single reply chain.
///
/// Invariant: `children[i]` displays chunk `i + 1` of the last successful
/// render; the anchor displays chunk 0. After a truncated reconciliation
/// the tail entries keep the text they actually still show remotely.
#[derive(Debug, Default, Clone)]
pub struct Chain {
    /// Text the anchor message currently displays. Empty until the first
    /// render, which therefore always edits the anchor.
    pub anchor_text: String,
    pub children: Vec<ChildMessage>,
    /// Full logical text of the most recent render, kept for append mode
    /// and redundant-render detection.
    pub last_rendered_text: String,
}

/// Owns every live chain, keyed by anchor.
///
/// Chains are created lazily on first acquire and removed on clear or an
/// explicit discard. Each chain sits behind its own async mutex; holding
/// it for the whole render serializes same-anchor updates while leaving
/// different anchors fully independent.
#[derive(Default)]
pub struct ChainStore {
    inner: Mutex<HashMap<MessageHandle, Arc<AsyncMutex<Chain>>>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the chain for `anchor`, creating an empty one if absent.
    pub fn acquire(&self, anchor: MessageHandle) -> Arc<AsyncMutex<Chain>> {
        let mut map = self.inner.lock().expect("chain store lock poisoned");
        map.entry(anchor).or_default().clone()
    }

    /// Whether `slot` is still the chain the store maps `anchor` to.
    /// False once a clear or discard removed the entry while a waiter
    /// slept on `slot`'s lock; such a waiter must re-acquire instead of
    /// mutating the orphaned chain.
    pub fn is_current(&self, anchor: MessageHandle, slot: &Arc<AsyncMutex<Chain>>) -> bool {
        let map = self.inner.lock().expect("chain store lock poisoned");
        map.get(&anchor)
            .map_or(false, |current| Arc::ptr_eq(current, slot))
    }

    /// Drop the chain for `anchor`. Called on clear, or by the owner when
    /// the surrounding conversation ends.
    pub fn remove(&self, anchor: MessageHandle) -> bool {
        let mut map = self.inner.lock().expect("chain store lock poisoned");
        map.remove(&anchor).is_some()
    }

    pub fn contains(&self, anchor: MessageHandle) -> bool {
        let map = self.inner.lock().expect("chain store lock poisoned");
        map.contains_key(&anchor)
    }

    pub fn len(&self) -> usize {
        let map = self.inner.lock().expect("chain store lock poisoned");
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
