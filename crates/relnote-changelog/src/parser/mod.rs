//! Release-note block parsing
//!
//! Pull request descriptions carry their release notes in fenced blocks:
//!
//! ````text
//! ```release-note bugfix
//! Fix crash when the config file is empty
//! ```
//! ````
//!
//! The annotation after `release-note` is optional. A block whose content is
//! `NONE` means the pull request intentionally has no release note.

mod normalize;

pub use normalize::{
    harmonize_prefix, is_breaking_change, is_bugfix, is_update, normalize_item,
    remove_action_required, split_items,
};

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Stands in for a code fence while matching, so the pattern does not have
/// to deal with backticks.
const FENCE_SENTINEL: &str = "\u{E000}";

/// Captures the annotation (rest of the opening line) and the block content.
static BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E000}release-note([^\n]*)\n(?s:(.*?))\x{E000}").expect("Invalid regex")
});

/// A release-note block as found in a pull request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNoteBlock {
    /// Annotation following `release-note`, trimmed; `None` when absent
    pub annotation: Option<String>,
    /// Block content with normalized line endings, trimmed
    pub content: String,
}

impl ReleaseNoteBlock {
    /// Whether the block explicitly states that no release note is needed
    /// (or is empty altogether)
    pub fn is_none(&self) -> bool {
        self.content.is_empty() || self.content.eq_ignore_ascii_case("none")
    }

    /// Split the block into normalized note items. Yields nothing for a
    /// `none` block.
    pub fn items(&self) -> Vec<String> {
        if self.is_none() {
            return Vec::new();
        }

        split_items(&self.content)
            .into_iter()
            .map(|item| normalize_item(&item))
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Whether a pull request body carries release notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStatus {
    /// At least one block with content
    Present,
    /// Only `NONE` blocks
    Declined,
    /// No release-note block at all
    Missing,
}

/// Determine the release-note status of a pull request body
pub fn note_status(body: &str) -> NoteStatus {
    let blocks = extract_blocks(body);

    if blocks.is_empty() {
        NoteStatus::Missing
    } else if blocks.iter().all(ReleaseNoteBlock::is_none) {
        NoteStatus::Declined
    } else {
        NoteStatus::Present
    }
}

/// Find all release-note blocks in a pull request body, in order.
///
/// Blocks that are opened but never closed are ignored.
pub fn extract_blocks(body: &str) -> Vec<ReleaseNoteBlock> {
    let body = body
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("```", FENCE_SENTINEL);

    let blocks: Vec<_> = BLOCK_REGEX
        .captures_iter(&body)
        .filter_map(|caps| {
            let annotation = caps.get(1)?.as_str().trim();
            let content = caps.get(2)?.as_str().trim();

            Some(ReleaseNoteBlock {
                annotation: (!annotation.is_empty()).then(|| annotation.to_string()),
                content: content.to_string(),
            })
        })
        .collect();

    trace!(count = blocks.len(), "extracted release-note blocks");
    blocks
}
