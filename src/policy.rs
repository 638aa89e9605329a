//! Decides whether a piece of text is delivered inline, as a file, both,
//! or not at all.
//!
//! Pure: the decision is derived from the text and the configured
//! thresholds on every call and never persisted.

use serde::{Deserialize, Serialize};

/// When to deliver text as an attached file instead of (or next to)
/// inline messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SendFileMode {
    /// Always inline text, never a file.
    #[default]
    Never,
    /// A file once the threshold is crossed, inline text otherwise.
    /// Never both.
    Only,
    /// Always inline text; additionally a file once the threshold is
    /// crossed.
    Also,
    /// Always a file; additionally inline text while the text is still
    /// short enough to be readable in the chat.
    AlsoIfLessThan,
}

/// What a single render call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDecision {
    pub send_text: bool,
    pub send_file: bool,
}

impl RenderDecision {
    pub const NOTHING: RenderDecision = RenderDecision {
        send_text: false,
        send_file: false,
    };
}

/// Derive the render decision for `text`.
///
/// When both thresholds are in play the effective cutoff is the smaller
/// one; crossing it must not be contradicted by the other.
pub fn decide(
    text: &str,
    mode: SendFileMode,
    file_length_threshold: usize,
    file_only_threshold: usize,
) -> RenderDecision {
    if text.trim().is_empty() {
        return RenderDecision::NOTHING;
    }

    let len = text.chars().count();
    let cutoff = file_length_threshold.min(file_only_threshold);

    match mode {
        SendFileMode::Never => RenderDecision {
            send_text: true,
            send_file: false,
        },
        SendFileMode::Only => {
            let as_file = len > cutoff;
            RenderDecision {
                send_text: !as_file,
                send_file: as_file,
            }
        }
        SendFileMode::Also => RenderDecision {
            send_text: true,
            send_file: len > cutoff,
        },
        SendFileMode::AlsoIfLessThan => RenderDecision {
            send_text: len < cutoff,
            send_file: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_LEN: usize = 100;
    const FILE_ONLY: usize = 1000;

    fn d(text: &str, mode: SendFileMode) -> RenderDecision {
        decide(text, mode, FILE_LEN, FILE_ONLY)
    }

    #[test]
    fn test_blank_text_renders_nothing() {
        for mode in [
            SendFileMode::Never,
            SendFileMode::Only,
            SendFileMode::Also,
            SendFileMode::AlsoIfLessThan,
        ] {
            assert_eq!(d("", mode), RenderDecision::NOTHING);
            assert_eq!(d("  \n\t ", mode), RenderDecision::NOTHING);
        }
    }

    #[test]
    fn test_never_mode_is_always_text() {
        let long = "x".repeat(5000);
        assert_eq!(
            d(&long, SendFileMode::Never),
            RenderDecision {
                send_text: true,
                send_file: false
            }
        );
    }

    #[test]
    fn test_only_mode_switches_at_threshold() {
        let short = "x".repeat(FILE_LEN);
        let long = "x".repeat(FILE_LEN + 1);
        assert_eq!(
            d(&short, SendFileMode::Only),
            RenderDecision {
                send_text: true,
                send_file: false
            }
        );
        assert_eq!(
            d(&long, SendFileMode::Only),
            RenderDecision {
                send_text: false,
                send_file: true
            }
        );
    }

    #[test]
    fn test_also_mode_adds_file_past_threshold() {
        let short = "hello";
        let long = "x".repeat(FILE_LEN + 1);
        assert_eq!(
            d(short, SendFileMode::Also),
            RenderDecision {
                send_text: true,
                send_file: false
            }
        );
        assert_eq!(
            d(&long, SendFileMode::Also),
            RenderDecision {
                send_text: true,
                send_file: true
            }
        );
    }

    #[test]
    fn test_also_if_less_than_drops_text_for_huge_content() {
        let short = "hello";
        assert_eq!(
            d(short, SendFileMode::AlsoIfLessThan),
            RenderDecision {
                send_text: true,
                send_file: true
            }
        );
        // The smaller threshold wins as the effective cutoff.
        let medium = "x".repeat(FILE_LEN + 1);
        assert_eq!(
            d(&medium, SendFileMode::AlsoIfLessThan),
            RenderDecision {
                send_text: false,
                send_file: true
            }
        );
    }

    #[test]
    fn test_effective_cutoff_is_the_smaller_threshold() {
        // file_only_threshold below file_length_threshold: Only mode must
        // honor the smaller value.
        let text = "x".repeat(51);
        let decision = decide(&text, SendFileMode::Only, 100, 50);
        assert_eq!(
            decision,
            RenderDecision {
                send_text: false,
                send_file: true
            }
        );
    }
}
