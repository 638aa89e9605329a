//! Engine configuration: chunking caps, file-delivery thresholds, and the
//! append-mode separator.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::policy::SendFileMode;

// Defaults match the common chat-platform message cap.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 4096;
pub const DEFAULT_LOOK_BACK_WINDOW: usize = 600;
pub const DEFAULT_FILE_LENGTH_THRESHOLD: usize = 6000;
pub const DEFAULT_FILE_ONLY_THRESHOLD: usize = 60_000;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RenderConfig {
    /// Per-message character cap of the platform.
    #[serde(default = "default_max_chunk_len")]
    pub max_chunk_len: usize,
    /// How far back from a window edge split points are searched.
    #[serde(default = "default_look_back_window")]
    pub look_back_window: usize,
    /// Text longer than this may be delivered as a file, depending on mode.
    #[serde(default = "default_file_length_threshold")]
    pub file_length_threshold: usize,
    /// Past this length the text is no longer mirrored inline at all.
    #[serde(default = "default_file_only_threshold")]
    pub file_only_threshold: usize,
    #[serde(default)]
    pub send_file_mode: SendFileMode,
    /// Marker inserted between the previous and the new text in append mode.
    #[serde(default = "default_append_separator")]
    pub append_separator: String,
    /// What the anchor shows after a chain is cleared.
    #[serde(default = "default_cleared_placeholder")]
    pub cleared_placeholder: String,
}

fn default_max_chunk_len() -> usize {
    DEFAULT_MAX_CHUNK_LEN
}

fn default_look_back_window() -> usize {
    DEFAULT_LOOK_BACK_WINDOW
}

fn default_file_length_threshold() -> usize {
    DEFAULT_FILE_LENGTH_THRESHOLD
}

fn default_file_only_threshold() -> usize {
    DEFAULT_FILE_ONLY_THRESHOLD
}

fn default_append_separator() -> String {
    "\n\n".to_string()
}

fn default_cleared_placeholder() -> String {
    "\u{2026}".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            look_back_window: DEFAULT_LOOK_BACK_WINDOW,
            file_length_threshold: DEFAULT_FILE_LENGTH_THRESHOLD,
            file_only_threshold: DEFAULT_FILE_ONLY_THRESHOLD,
            send_file_mode: SendFileMode::Never,
            append_separator: default_append_separator(),
            cleared_placeholder: default_cleared_placeholder(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("io", "replychain", "replychain") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create config dir: {}", e);
            return None;
        }
        return Some(dir.join("render.json"));
    }
    None
}

pub fn load_config() -> Option<RenderConfig> {
    let path = config_path()?;
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn save_config(config: &RenderConfig) -> std::io::Result<()> {
    if let Some(path) = config_path() {
        let mut file = fs::File::create(path)?;
        let data = serde_json::to_string_pretty(config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        file.write_all(data.as_bytes())?;
    }
    Ok(())
}
