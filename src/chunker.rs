//! Splits logical text into bounded segments for the chat surface.
//!
//! Lengths are counted in characters, never bytes, and every slice lands on
//! a char boundary. Two search strategies exist: `Quality` picks the best
//! (rightmost) split point once the text is final, `Stable` picks the
//! earliest split point in the search region so that boundaries stop moving
//! while the text is still growing.

/// How split points are searched inside the look-back region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Backward search: the rightmost usable boundary, best fill per chunk.
    Quality,
    /// Forward search: the leftmost boundary in the region. Once the text
    /// has grown past the region the chosen point never shifts again.
    Stable,
}

/// Candidate boundary classes, strongest first. A weaker class is only
/// consulted when no boundary of a stronger class exists in the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    LineBreak,
    SentenceEnd,
    Clause,
    WhitespaceRun,
}

const BOUNDARY_ORDER: [Boundary; 4] = [
    Boundary::LineBreak,
    Boundary::SentenceEnd,
    Boundary::Clause,
    Boundary::WhitespaceRun,
];

/// Split `text` into segments of at most `max_len` chars.
///
/// `look_back` bounds the region (the tail of each `max_len` window) in
/// which split points are searched; outside it the split is a hard cut.
/// Empty or whitespace-only input yields no segments. Segments are trimmed
/// at the cut points, so rejoining them reconstructs the input up to the
/// whitespace collapsed there.
pub fn chunk(text: &str, max_len: usize, look_back: usize, mode: SplitMode) -> Vec<String> {
    let mut segments = Vec::new();
    if max_len == 0 {
        return segments;
    }

    let mut remaining: Vec<char> = text.trim().chars().collect();
    // 30% of the region: growth smaller than this cannot force a split,
    // so the remainder can be emitted whole without locking in a weak
    // boundary prematurely.
    let stable_margin = look_back * 3 / 10;

    while !remaining.is_empty() {
        let rem_len = remaining.len();

        if rem_len <= max_len {
            let fits_with_margin = rem_len + stable_margin <= max_len;
            if mode == SplitMode::Quality || fits_with_margin {
                segments.push(remaining.iter().collect::<String>());
                break;
            }
            // Stable mode near the cap: try to lock in a good boundary now
            // rather than let the next growth step force a worse one.
        }

        let window_end = rem_len.min(max_len);
        let region_start = window_end.saturating_sub(look_back);
        let split_at = find_split(&remaining, region_start, window_end, mode);

        match split_at {
            Some(at) => {
                push_trimmed(&mut segments, &remaining[..at]);
                remaining.drain(..at);
            }
            None if rem_len <= max_len => {
                // No boundary in the region and the remainder fits.
                segments.push(remaining.iter().collect::<String>());
                break;
            }
            None => {
                // Hard cut exactly at the cap.
                push_trimmed(&mut segments, &remaining[..max_len]);
                remaining.drain(..max_len);
            }
        }

        trim_leading(&mut remaining);
    }

    segments
}

/// Search `[region_start, window_end)` for the best split point, strongest
/// boundary class first. Returns the char index to cut at.
fn find_split(
    chars: &[char],
    region_start: usize,
    window_end: usize,
    mode: SplitMode,
) -> Option<usize> {
    for class in BOUNDARY_ORDER {
        let found = match mode {
            SplitMode::Stable => {
                (region_start..window_end).find_map(|i| boundary_cut(chars, i, window_end, class))
            }
            SplitMode::Quality => (region_start..window_end)
                .rev()
                .find_map(|i| boundary_cut(chars, i, window_end, class)),
        };
        // A cut at index 0 would emit an empty segment.
        if let Some(at) = found.filter(|&at| at > 0) {
            return Some(at);
        }
    }
    None
}

/// If position `i` starts a boundary of `class`, return the cut index
/// (one past the boundary), provided it stays within the window.
fn boundary_cut(chars: &[char], i: usize, window_end: usize, class: Boundary) -> Option<usize> {
    let c = chars[i];
    let cut = match class {
        Boundary::LineBreak => {
            if c == '\n' {
                Some(i + 1)
            } else {
                None
            }
        }
        Boundary::SentenceEnd => {
            if matches!(c, '.' | '!' | '?') && chars.get(i + 1) == Some(&' ') {
                Some(i + 2)
            } else {
                None
            }
        }
        Boundary::Clause => {
            if matches!(c, ',' | ';' | ':') && chars.get(i + 1) == Some(&' ') {
                Some(i + 2)
            } else {
                None
            }
        }
        Boundary::WhitespaceRun => {
            if c == ' ' || c == '\t' {
                // Cut after the last contiguous space/tab of the run.
                let mut end = i + 1;
                while end < window_end && (chars[end] == ' ' || chars[end] == '\t') {
                    end += 1;
                }
                Some(end)
            } else {
                None
            }
        }
    };
    cut.filter(|&at| at <= window_end)
}

fn push_trimmed(segments: &mut Vec<String>, chars: &[char]) {
    let segment: String = chars.iter().collect();
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
}

fn trim_leading(chars: &mut Vec<char>) {
    let skip = chars.iter().take_while(|c| c.is_whitespace()).count();
    chars.drain(..skip);
}
