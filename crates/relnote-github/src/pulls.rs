//! Pull request lookup and cherry-pick resolution

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use relnote_core::error::TrackerError;
use relnote_core::Commit;

use crate::client::GitHubClient;
use crate::schema::{PullRequestNode, PullRequestRepository, RepositoryData, PULL_REQUEST_QUERY};

/// Marker the cherry-pick bot puts into the pull requests it opens
static CHERRY_PICK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"This is an automated cherry-pick of #(\d+)").expect("Invalid regex")
});

/// Number of the pull request a cherry-pick was made from
pub(crate) fn cherry_pick_parent(body: &str) -> Option<u64> {
    CHERRY_PICK_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl GitHubClient {
    /// Fetch a single pull request by number
    pub(crate) async fn fetch_pull_request(
        &self,
        number: u64,
    ) -> Result<PullRequestNode, TrackerError> {
        debug!(number, "fetching pull request");

        let mut variables = self.repository_variables();
        variables["number"] = Value::from(number);

        let data: RepositoryData<PullRequestRepository> =
            self.query(PULL_REQUEST_QUERY, variables).await?;

        data.repository
            .and_then(|repository| repository.pull_request)
            .ok_or_else(|| TrackerError::ObjectNotFound(format!("pull request #{}", number)))
    }

    /// Replace a cherry-picked pull request by the one it was picked from,
    /// following chains of cherry-picks. The commit itself is kept.
    pub(crate) async fn resolve_cherry_pick(
        &self,
        commit: &mut Commit,
    ) -> Result<(), TrackerError> {
        let mut seen = HashSet::from([commit.pull_request.number]);

        while let Some(parent) = cherry_pick_parent(&commit.pull_request.body) {
            if !seen.insert(parent) {
                warn!(
                    pr = commit.pull_request.number,
                    parent,
                    "cherry-pick cycle, keeping pull request"
                );
                break;
            }

            info!(pr = commit.pull_request.number, parent, "pull request is a cherry-pick");
            let (pull_request, author) = self.fetch_pull_request(parent).await?.into_parts();
            commit.pull_request = pull_request;
            commit.author = author;
        }

        Ok(())
    }
}
