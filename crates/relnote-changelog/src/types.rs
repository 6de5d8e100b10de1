//! Changelog types

use std::fmt;

use relnote_core::Commit;
use serde::{Deserialize, Serialize};

/// Category a change is grouped under
///
/// Well-known categories get their own variant; anything else a tracker
/// label or release-note block declares is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeType {
    /// API changes
    ApiChange,
    /// Bug fixes
    Bugfix,
    /// Cleanups and refactorings
    Cleanup,
    /// Deprecations
    Deprecation,
    /// Documentation
    Documentation,
    /// New features
    Feature,
    /// Miscellaneous
    Misc,
    /// Chores
    Chore,
    /// Regression fixes
    Regression,
    /// Dependency and component updates
    Update,
    /// Custom, lower-cased category
    Other(String),
}

impl ChangeType {
    /// Normalize a raw type string (label value or block annotation).
    ///
    /// Case-folds and resolves aliases. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        if raw.is_empty() {
            return None;
        }

        let known = match raw.as_str() {
            "api-change" | "api change" | "api-changes" => Self::ApiChange,
            "update" | "updates" => Self::Update,
            "fix" | "fixes" | "bugfix" | "bugfixes" | "bug" => Self::Bugfix,
            "feature" | "features" => Self::Feature,
            "misc" | "miscellaneous" | "none" => Self::Misc,
            "cleanup" | "cleanups" => Self::Cleanup,
            "deprecation" | "deprecations" => Self::Deprecation,
            "documentation" | "docs" => Self::Documentation,
            "chore" | "chores" => Self::Chore,
            "regression" | "regressions" => Self::Regression,
            _ => Self::Other(raw),
        };

        Some(known)
    }

    /// Canonical identifier
    pub fn as_str(&self) -> &str {
        match self {
            Self::ApiChange => "api-change",
            Self::Bugfix => "bugfix",
            Self::Cleanup => "cleanup",
            Self::Deprecation => "deprecation",
            Self::Documentation => "documentation",
            Self::Feature => "feature",
            Self::Misc => "misc",
            Self::Chore => "chore",
            Self::Regression => "regression",
            Self::Update => "update",
            Self::Other(s) => s,
        }
    }

    /// Section heading used when rendering
    pub fn title(&self) -> String {
        match self {
            Self::ApiChange => "API Changes".to_string(),
            Self::Bugfix => "Bugfixes".to_string(),
            Self::Cleanup => "Cleanups".to_string(),
            Self::Deprecation => "Deprecations".to_string(),
            Self::Documentation => "Documentation".to_string(),
            Self::Feature => "New Features".to_string(),
            Self::Misc => "Miscellaneous".to_string(),
            Self::Chore => "Chores".to_string(),
            Self::Regression => "Regressions".to_string(),
            Self::Update => "Updates".to_string(),
            Self::Other(s) => titleize(s),
        }
    }

    /// Position of the group in the output. Groups of equal rank are
    /// ordered alphabetically by their identifier.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Feature => 0,
            Self::ApiChange => 1,
            Self::Deprecation => 2,
            Self::Bugfix
            | Self::Cleanup
            | Self::Documentation
            | Self::Regression
            | Self::Other(_) => 3,
            Self::Update => 4,
            Self::Chore => 5,
            Self::Misc => 6,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ChangeType {
    fn from(raw: String) -> Self {
        Self::parse(&raw).unwrap_or(Self::Misc)
    }
}

impl From<ChangeType> for String {
    fn from(change_type: ChangeType) -> Self {
        change_type.as_str().to_string()
    }
}

fn titleize(identifier: &str) -> String {
    identifier
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            if word == "api" {
                return "API".to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One normalized, classified release note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Commit the note was taken from
    pub commit: Commit,
    /// Category
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Whether consumers need to act on this change
    #[serde(default)]
    pub breaking: bool,
    /// Normalized note text
    pub text: String,
}

/// All changes of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeGroup {
    /// Category shared by all changes
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Changes, sorted by text
    pub changes: Vec<Change>,
}

impl ChangeGroup {
    /// Section heading
    pub fn title(&self) -> String {
        self.change_type.title()
    }
}

/// A complete changelog for one version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    /// Version string
    pub version: String,
    /// Repository URL used for links
    pub repository_url: String,
    /// Groups in display order
    pub groups: Vec<ChangeGroup>,
}

impl Changelog {
    /// All breaking changes, in group order
    pub fn breaking_changes(&self) -> Vec<&Change> {
        self.groups
            .iter()
            .flat_map(|g| g.changes.iter())
            .filter(|c| c.breaking)
            .collect()
    }

    /// Total number of changes
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.changes.len()).sum()
    }

    /// Check if the changelog has no changes
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
