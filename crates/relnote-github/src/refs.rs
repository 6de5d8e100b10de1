//! Reference listing

use serde_json::Value;
use tracing::debug;

use relnote_core::error::TrackerError;
use relnote_core::RepositoryRefs;

use crate::client::GitHubClient;
use crate::schema::{RefKind, RefsRepository, RepositoryData, REFS_QUERY};

impl GitHubClient {
    /// List the default branch and all branches and tags, following pages
    pub(crate) async fn fetch_references(&self) -> Result<RepositoryRefs, TrackerError> {
        let mut result = RepositoryRefs::default();
        let mut cursor: Option<String> = None;

        loop {
            debug!(cursor = cursor.as_deref(), "fetching references page");

            let mut variables = self.repository_variables();
            variables["prefix"] = Value::from("refs/");
            variables["cursor"] = cursor.as_deref().map(Value::from).unwrap_or(Value::Null);

            let data: RepositoryData<RefsRepository> = self.query(REFS_QUERY, variables).await?;
            let repository = data.repository.ok_or_else(|| {
                TrackerError::ObjectNotFound(format!("{}/{}", self.owner, self.repository))
            })?;

            if let Some(default_branch) = repository.default_branch_ref {
                result.default_branch = default_branch.name;
            }

            let Some(refs) = repository.refs else {
                break;
            };

            for node in refs.nodes {
                match node.into_ref() {
                    Some(RefKind::Branch(branch)) => result.branches.push(branch),
                    Some(RefKind::Tag(tag)) => result.tags.push(tag),
                    None => {}
                }
            }

            match refs.page_info.next_cursor() {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(result)
    }
}
