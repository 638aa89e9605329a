//! Delivers the full text as an attached file with a readable name and
//! caption.
//!
//! The filename may come from an external title service; that call is a
//! best-effort enhancement and every failure falls back silently to a
//! generated name. This path never raises past the transport upload
//! itself.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use rand::Rng;
use tracing::debug;

use crate::transport::{ChatHandle, MessageHandle, Transport, TransportError};

const GENERIC_CAPTION: &str = "Full text attached";
const MAX_TITLE_LEN: usize = 60;

/// Best-effort source of a short descriptive title for a block of text,
/// e.g. an external summarization service.
#[async_trait]
pub trait TitleProvider: Send + Sync {
    async fn title(&self, text: &str) -> Result<String, String>;
}

/// How the attachment filename is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// Random identifier, always available.
    Random,
    /// Local timestamp, stable enough to sort chronologically.
    Timestamp,
    /// Ask the title provider; falls back to `Random` on any failure.
    Descriptive,
}

pub struct FileRenderer<T: Transport> {
    transport: Arc<T>,
    title_provider: Option<Arc<dyn TitleProvider>>,
    strategy: NamingStrategy,
}

impl<T: Transport> FileRenderer<T> {
    pub fn new(transport: Arc<T>, strategy: NamingStrategy) -> Self {
        Self {
            transport,
            title_provider: None,
            strategy,
        }
    }

    pub fn with_title_provider(mut self, provider: Arc<dyn TitleProvider>) -> Self {
        self.title_provider = Some(provider);
        self
    }

    pub fn with_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Upload `text` as a file to `chat`. The bytes are always the full
    /// text, never a chunk.
    pub async fn render_file(
        &self,
        chat: ChatHandle,
        text: &str,
    ) -> Result<MessageHandle, TransportError> {
        let (filename, caption) = self.name_and_caption(text).await;
        self.transport
            .send_file(chat, text.as_bytes(), &filename, &caption)
            .await
    }

    async fn name_and_caption(&self, text: &str) -> (String, String) {
        match self.strategy {
            NamingStrategy::Random => (random_filename(), GENERIC_CAPTION.to_string()),
            NamingStrategy::Timestamp => (timestamp_filename(), GENERIC_CAPTION.to_string()),
            NamingStrategy::Descriptive => match self.descriptive_name(text).await {
                Some(pair) => pair,
                None => (random_filename(), GENERIC_CAPTION.to_string()),
            },
        }
    }

    /// None on any provider failure; the caller falls back.
    async fn descriptive_name(&self, text: &str) -> Option<(String, String)> {
        let provider = self.title_provider.as_ref()?;
        match provider.title(text).await {
            Ok(title) => {
                let slug = slugify(&title);
                if slug.is_empty() {
                    debug!("title provider returned an unusable title, falling back");
                    return None;
                }
                Some((format!("{}.txt", slug), title))
            }
            Err(e) => {
                debug!(error = %e, "title provider failed, falling back to random name");
                None
            }
        }
    }
}

fn random_filename() -> String {
    let id: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("message-{:06}.txt", id)
}

fn timestamp_filename() -> String {
    format!("message-{}.txt", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Reduce a free-form title to something safe as a filename stem.
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.chars().count() >= MAX_TITLE_LEN {
            break;
        }
    }
    slug.trim_matches('-').to_string()
}
