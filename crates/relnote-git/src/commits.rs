//! Commit history operations

use std::sync::LazyLock;

use git2::{Revwalk, Sort};
use regex::Regex;
use tracing::{debug, instrument};

use relnote_core::{Commit, PullRequest, Stopper};

use crate::repository::{GitRepo, Result};

/// `Some change (#1234)`, as written by squash merges
static SQUASH_MERGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)\s*$").expect("Invalid regex"));

/// `Merge pull request #1234 from owner/branch`
static MERGE_COMMIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Merge pull request #(\d+)").expect("Invalid regex"));

impl GitRepo {
    fn walk_from(&self, head: &str) -> Result<Revwalk<'_>> {
        let head = self.find_commit(head)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;
        Ok(revwalk)
    }

    /// Get at most `max_count` commits reachable from `head`, newest first.
    ///
    /// Commits that do not reference a pull request are included, with an
    /// empty pull request.
    #[instrument(skip(self))]
    pub fn log(&self, head: &str, max_count: usize) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();

        for oid in self.walk_from(head)?.take(max_count) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(to_commit(&commit));
        }

        debug!(count = commits.len(), "loaded commit log");
        Ok(commits)
    }

    /// Get all commits from `head` until the first one matching `stopper`.
    ///
    /// Commits that do not reference a pull request are skipped, but still
    /// take part in stop detection.
    #[instrument(skip(self), fields(stopper = %stopper))]
    pub fn history(&self, head: &str, stopper: &Stopper) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut skipped = 0usize;

        for oid in self.walk_from(head)? {
            let commit = to_commit(&self.repo.find_commit(oid?)?);

            if stopper.should_stop(&commit) {
                debug!(commit = commit.short_hash(), "reached stop commit");
                break;
            }

            if commit.pull_request.number == 0 {
                debug!(commit = commit.short_hash(), "commit has no pull request");
                skipped += 1;
                continue;
            }

            commits.push(commit);
        }

        debug!(count = commits.len(), skipped, "loaded history");
        Ok(commits)
    }
}

/// Pull request number referenced by a commit summary, if any
pub fn pull_request_number(summary: &str) -> Option<u64> {
    MERGE_COMMIT_REGEX
        .captures(summary)
        .or_else(|| SQUASH_MERGE_REGEX.captures(summary))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Convert a git2 commit, deriving the pull request from its message
fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let summary = commit.summary().unwrap_or_default().to_string();
    let author = commit.author().name().unwrap_or("Unknown").to_string();
    let mut result = Commit::new(commit.id().to_string(), summary.clone(), author);

    if let Some(number) = pull_request_number(&summary) {
        let body = commit.body().unwrap_or_default();
        result = result.with_pull_request(PullRequest::new(number, summary, body));
    }

    result
}
