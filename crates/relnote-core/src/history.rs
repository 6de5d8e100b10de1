//! History source abstraction
//!
//! A history source knows the refs of one repository and can walk its commit
//! graph, attaching the pull request each commit was merged through.

use crate::error::Result;
use crate::types::{Commit, RepositoryRefs, Stopper};

/// Trait for places commit history can be read from
///
/// Implementations must return commits newest first and must fetch pages
/// sequentially: a walk ends as soon as the stopper matches.
#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    /// Get the source name (for logging)
    fn name(&self) -> &str;

    /// Browsable URL of the repository, used for links in the output
    fn repository_url(&self) -> String;

    /// List the default branch, all tags and all branches
    async fn references(&self) -> Result<RepositoryRefs>;

    /// Return at most `max_count` commits reachable from `head`
    async fn log(&self, head: &str, max_count: usize) -> Result<Vec<Commit>>;

    /// Return all commits from `head` up to, but excluding, the first commit
    /// matching `stopper`
    async fn history(&self, head: &str, stopper: &Stopper) -> Result<Vec<Commit>>;
}
