//! Whitespace codec
//!
//! Text and tail content is stored in two files so that editing stays
//! pleasant while whitespace still round-trips exactly: the content file
//! holds the trimmed string (plus one trailing newline appended on write),
//! and a hidden skeleton file holds the original leading and trailing
//! whitespace with a one-character marker at the position where the trimmed
//! content is reinserted.

/// Marker character standing in for the trimmed content inside a skeleton
/// (U+001A SUBSTITUTE).
pub const MARKER: char = '\u{1A}';

/// The two meta-kinds that carry whitespace-coded content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Text,
    Tail,
}

impl Kind {
    /// File holding the trimmed content
    pub const fn content_file(self) -> &'static str {
        match self {
            Self::Text => "0-text",
            Self::Tail => "0-tail",
        }
    }

    /// Hidden file holding the whitespace skeleton
    pub const fn skeleton_file(self) -> &'static str {
        match self {
            Self::Text => ".text.ws",
            Self::Tail => ".tail.ws",
        }
    }
}

/// Split a raw string into `(content, skeleton)`
///
/// `content` is the maximal run starting and ending on a non-whitespace
/// character, `None` when the string is empty or all whitespace. The
/// skeleton is the surrounding whitespace with [`MARKER`] at the insertion
/// point, or the raw string verbatim (no marker) when there is no content.
pub fn split(raw: &str) -> (Option<&str>, String) {
    let content = raw.trim();
    if content.is_empty() {
        return (None, raw.to_string());
    }

    let start = raw.len() - raw.trim_start().len();
    let end = start + content.len();
    let mut skeleton = String::with_capacity(raw.len() - content.len() + MARKER.len_utf8());
    skeleton.push_str(&raw[..start]);
    skeleton.push(MARKER);
    skeleton.push_str(&raw[end..]);
    (Some(&raw[start..end]), skeleton)
}

/// Reassemble the original string from stored content and skeleton
///
/// The exact inverse of [`split`] when both halves are intact. A content
/// file without a matching marker (a hand-added `0-text`/`0-tail` whose
/// skeleton was never regenerated) is repaired best-effort: the content goes
/// in front of the skeleton's last line separator if it has one, otherwise
/// the stored whitespace is discarded and the content used as-is. That
/// repair is lossy by nature.
pub fn merge(content: Option<&str>, skeleton: Option<&str>) -> Option<String> {
    match (content, skeleton) {
        (None, None) => None,
        (content, Some(skeleton)) if skeleton.contains(MARKER) => {
            Some(skeleton.replacen(MARKER, content.unwrap_or(""), 1))
        }
        (None, Some(skeleton)) => Some(skeleton.to_string()),
        (Some(content), Some(skeleton)) => Some(match last_line_separator(skeleton) {
            Some(at) => {
                let mut merged = String::with_capacity(skeleton.len() + content.len());
                merged.push_str(&skeleton[..at]);
                merged.push_str(content);
                merged.push_str(&skeleton[at..]);
                merged
            }
            None => content.to_string(),
        }),
        (Some(content), None) => Some(content.to_string()),
    }
}

/// Byte offset of the skeleton's last line separator (`\n` or `\r\n`), if any
fn last_line_separator(skeleton: &str) -> Option<usize> {
    let at = skeleton.rfind('\n')?;
    if skeleton[..at].ends_with('\r') {
        Some(at - 1)
    } else {
        Some(at)
    }
}
