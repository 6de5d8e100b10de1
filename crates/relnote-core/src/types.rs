//! Shared history types

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A pull request as seen by the tracker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    /// Tracker-assigned number, unique within a repository
    pub number: u64,
    /// Pull request title
    pub title: String,
    /// Full description; the only place release-note blocks are read from
    pub body: String,
    /// Labels, iterated in sorted order
    pub labels: BTreeSet<String>,
}

impl PullRequest {
    /// Create a new pull request with an empty label set
    pub fn new(number: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: body.into(),
            labels: BTreeSet::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }
}

/// A commit together with its associated pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// First line of the commit message
    pub title: String,
    /// Author login or name
    pub author: String,
    /// Associated pull request (default when the commit has none)
    pub pull_request: PullRequest,
}

impl Commit {
    /// Create a new commit without a pull request
    pub fn new(
        hash: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            title: title.into(),
            author: author.into(),
            pull_request: PullRequest::default(),
        }
    }

    /// Attach a pull request
    pub fn with_pull_request(mut self, pull_request: PullRequest) -> Self {
        self.pull_request = pull_request;
        self
    }

    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// A named pointer to a commit (tag or branch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub name: String,
    pub hash: String,
}

impl Ref {
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
        }
    }
}

/// Snapshot of a repository's tags and branches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRefs {
    /// Name of the default branch (e.g. `main`)
    pub default_branch: String,
    /// All tags, peeled to the commit they point at
    pub tags: Vec<Ref>,
    /// All branches
    pub branches: Vec<Ref>,
}

impl RepositoryRefs {
    /// Find a tag by exact name
    pub fn tag(&self, name: &str) -> Option<&Ref> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Find a branch by exact name
    pub fn branch(&self, name: &str) -> Option<&Ref> {
        self.branches.iter().find(|b| b.name == name)
    }
}

/// Predicate deciding where a history walk ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stopper {
    /// Stop at the first commit whose hash starts with the prefix
    CommitPrefix(String),
    /// Stop when reaching the previous release branch or another stable tag
    Boundary {
        previous_release: HashSet<String>,
        stable_tags: HashSet<String>,
    },
    /// Walk the whole history
    Never,
}

impl Stopper {
    /// Whether the walk must stop at this commit (the commit itself is excluded)
    pub fn should_stop(&self, commit: &Commit) -> bool {
        match self {
            Self::CommitPrefix(prefix) => commit.hash.starts_with(prefix.as_str()),
            Self::Boundary {
                previous_release,
                stable_tags,
            } => previous_release.contains(&commit.hash) || stable_tags.contains(&commit.hash),
            Self::Never => false,
        }
    }
}

impl fmt::Display for Stopper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommitPrefix(prefix) => write!(f, "commit {}", prefix),
            Self::Boundary {
                previous_release,
                stable_tags,
            } => write!(
                f,
                "previous release ({} commits) or stable tag ({} tags)",
                previous_release.len(),
                stable_tags.len()
            ),
            Self::Never => write!(f, "end of history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let commit = Commit::new("abc1234567890", "title", "someone");
        assert_eq!(commit.short_hash(), "abc1234");

        let commit = Commit::new("abc", "title", "someone");
        assert_eq!(commit.short_hash(), "abc");
    }

    #[test]
    fn test_labels_are_sorted_and_deduplicated() {
        let pr = PullRequest::new(1, "t", "b")
            .with_label("kind/feature")
            .with_label("approved")
            .with_label("kind/feature");

        let labels: Vec<_> = pr.labels.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["approved", "kind/feature"]);
    }

    #[test]
    fn test_commit_prefix_stopper() {
        let stopper = Stopper::CommitPrefix("deadbeef".to_string());
        assert!(stopper.should_stop(&Commit::new("deadbeef0123", "", "")));
        assert!(!stopper.should_stop(&Commit::new("0123deadbeef", "", "")));
    }

    #[test]
    fn test_boundary_stopper() {
        let stopper = Stopper::Boundary {
            previous_release: HashSet::from(["aaa".to_string()]),
            stable_tags: HashSet::from(["bbb".to_string()]),
        };
        assert!(stopper.should_stop(&Commit::new("aaa", "", "")));
        assert!(stopper.should_stop(&Commit::new("bbb", "", "")));
        assert!(!stopper.should_stop(&Commit::new("ccc", "", "")));
        assert!(!Stopper::Never.should_stop(&Commit::new("aaa", "", "")));
    }

    #[test]
    fn test_refs_lookup() {
        let refs = RepositoryRefs {
            default_branch: "main".to_string(),
            tags: vec![Ref::new("v1.0.0", "t1")],
            branches: vec![Ref::new("main", "b1")],
        };
        assert_eq!(refs.tag("v1.0.0").map(|r| r.hash.as_str()), Some("t1"));
        assert!(refs.branch("release/1.0").is_none());
    }
}
