//! Changelog generation

use std::collections::HashMap;

use relnote_core::{Commit, Result};
use tracing::{debug, info, instrument};

use crate::classifier::{classify, label_hint};
use crate::parser::{extract_blocks, note_status, NoteStatus};
use crate::types::{Change, ChangeGroup, ChangeType, Changelog};

/// Changelog generator
pub struct ChangelogGenerator {
    version: String,
    repository_url: String,
}

impl ChangelogGenerator {
    /// Create a new generator for a version
    pub fn new(version: impl Into<String>, repository_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            repository_url: repository_url.into(),
        }
    }

    /// Generate a changelog from commits (newest first, as walked)
    #[instrument(skip(self, commits), fields(version = %self.version, commit_count = commits.len()))]
    pub fn generate(&self, commits: &[Commit]) -> Result<Changelog> {
        info!(commit_count = commits.len(), "generating changelog");

        let changes = generate_changes(commits)?;
        let groups = group_changes(changes);

        debug!(group_count = groups.len(), "changelog groups built");

        Ok(Changelog {
            version: self.version.clone(),
            repository_url: self.repository_url.clone(),
            groups,
        })
    }

    /// List the pull requests that declared `NONE` as their release note,
    /// one `misc` change per pull request titled after it
    #[instrument(skip(self, commits), fields(version = %self.version, commit_count = commits.len()))]
    pub fn generate_declined(&self, commits: &[Commit]) -> Result<Changelog> {
        let changes: Vec<Change> = commits
            .iter()
            .filter(|c| note_status(&c.pull_request.body) == NoteStatus::Declined)
            .map(|commit| Change {
                commit: commit.clone(),
                change_type: ChangeType::Misc,
                breaking: false,
                text: commit.pull_request.title.trim().to_string(),
            })
            .collect();

        info!(count = changes.len(), "listed pull requests without release notes");

        Ok(Changelog {
            version: self.version.clone(),
            repository_url: self.repository_url.clone(),
            groups: group_changes(changes),
        })
    }
}

/// Extract all changes from the given commits.
///
/// Commit order is preserved, and within a commit the order in which notes
/// appear in the pull request body. Malformed blocks and pull requests
/// without notes are skipped, never reported.
pub fn generate_changes(commits: &[Commit]) -> Result<Vec<Change>> {
    Ok(commits.iter().flat_map(commit_changes).collect())
}

fn commit_changes(commit: &Commit) -> Vec<Change> {
    let labels = label_hint(&commit.pull_request);
    let mut changes = Vec::new();

    for block in extract_blocks(&commit.pull_request.body) {
        for text in block.items() {
            let classification = classify(block.annotation.as_deref(), &labels, &text);

            changes.push(Change {
                commit: commit.clone(),
                change_type: classification.change_type,
                breaking: classification.breaking,
                text,
            });
        }
    }

    if changes.is_empty() {
        debug!(
            commit = commit.short_hash(),
            pr = commit.pull_request.number,
            "no release note"
        );
    }

    changes
}

/// Group changes by type.
///
/// Groups are ordered features, API changes and deprecations first, then
/// everything else alphabetically, then updates, chores and miscellaneous.
/// Changes within a group are sorted case-insensitively by text; equal texts
/// keep their input order.
pub fn group_changes(changes: Vec<Change>) -> Vec<ChangeGroup> {
    let mut grouped: HashMap<ChangeType, Vec<Change>> = HashMap::new();

    for change in changes {
        grouped
            .entry(change.change_type.clone())
            .or_default()
            .push(change);
    }

    let mut groups: Vec<ChangeGroup> = grouped
        .into_iter()
        .map(|(change_type, mut changes)| {
            changes.sort_by_cached_key(|c| c.text.to_lowercase());
            ChangeGroup {
                change_type,
                changes,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        a.change_type
            .rank()
            .cmp(&b.change_type.rank())
            .then_with(|| a.change_type.as_str().cmp(b.change_type.as_str()))
    });

    groups
}
