//! Commit history pagination

use serde_json::Value;
use tracing::{debug, warn};

use relnote_core::error::TrackerError;
use relnote_changelog::{note_status, NoteStatus};
use relnote_core::{Commit, Stopper};

use crate::client::GitHubClient;
use crate::schema::{CommitNode, HistoryRepository, RepositoryData, HISTORY_QUERY};

type Result<T> = std::result::Result<T, TrackerError>;

impl GitHubClient {
    /// Fetch one page of history below `head`; returns the commits and the
    /// cursor of the next page
    async fn fetch_history_page(
        &self,
        head: &str,
        cursor: Option<&str>,
    ) -> Result<(Vec<CommitNode>, Option<String>)> {
        debug!(head, cursor, "fetching history page");

        let mut variables = self.repository_variables();
        variables["head"] = Value::from(head);
        variables["cursor"] = cursor.map(Value::from).unwrap_or(Value::Null);

        let data: RepositoryData<HistoryRepository> = self.query(HISTORY_QUERY, variables).await?;

        let history = data
            .repository
            .ok_or_else(|| TrackerError::ObjectNotFound(format!("{}/{}", self.owner, self.repository)))?
            .object
            .and_then(|object| object.history)
            .ok_or_else(|| TrackerError::ObjectNotFound(format!("commit {}", head)))?;

        Ok((history.nodes, history.page_info.next_cursor()))
    }

    /// Fetch at most `max_count` commits reachable from `head`, newest first.
    ///
    /// Commits without a pull request are included, with an empty one.
    pub(crate) async fn fetch_log(&self, head: &str, max_count: usize) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut cursor: Option<String> = None;

        while commits.len() < max_count {
            let (nodes, next) = self.fetch_history_page(head, cursor.as_deref()).await?;

            let remaining = max_count - commits.len();
            commits.extend(nodes.into_iter().take(remaining).map(CommitNode::into_commit));

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(count = commits.len(), "fetched commit log");
        Ok(commits)
    }

    /// Fetch all commits from `head` until the first one matching `stopper`.
    ///
    /// No page is requested after the stopper matched. Commits without a
    /// pull request take part in stop detection but are not returned.
    /// Cherry-picks are replaced by the pull request they were picked from,
    /// and pull requests by skipped authors are left out.
    ///
    /// When release notes are required, every pull request without a
    /// release-note block is collected and reported in one error.
    pub(crate) async fn fetch_history(&self, head: &str, stopper: &Stopper) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut missing = Vec::new();
        let mut cursor: Option<String> = None;

        'pages: loop {
            let (nodes, next) = self.fetch_history_page(head, cursor.as_deref()).await?;

            for node in nodes {
                let mut commit = node.into_commit();

                if stopper.should_stop(&commit) {
                    debug!(commit = commit.short_hash(), "reached stop commit");
                    break 'pages;
                }

                if commit.pull_request.number == 0 {
                    warn!(commit = %commit.hash, "commit has no associated pull request");
                    continue;
                }

                self.resolve_cherry_pick(&mut commit).await?;

                if self.skip_authors.contains(&commit.author) {
                    debug!(
                        pr = commit.pull_request.number,
                        author = %commit.author,
                        "skipping pull request by ignored author"
                    );
                    continue;
                }

                if self.require_release_notes
                    && note_status(&commit.pull_request.body) == NoteStatus::Missing
                {
                    warn!(pr = commit.pull_request.number, "pull request has no release note");
                    missing.push(TrackerError::MissingReleaseNote(
                        self.pull_request_url(commit.pull_request.number),
                    ));
                    continue;
                }

                commits.push(commit);
            }

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        if !missing.is_empty() {
            return Err(TrackerError::Aggregated(missing));
        }

        Ok(commits)
    }
}
