//! GitHub GraphQL client

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use relnote_core::config::GitHubConfig;
use relnote_core::error::TrackerError;
use relnote_core::{Commit, HistorySource, RepositoryRefs, Result, Stopper};

use crate::schema::Response;

/// Number of commits or refs requested per page
pub const PAGE_SIZE: usize = 50;

const USER_AGENT: &str = concat!("relnote/", env!("CARGO_PKG_VERSION"));

/// GitHub history source for one repository
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: String,
    pub(crate) owner: String,
    pub(crate) repository: String,
    repository_url: String,
    pub(crate) skip_authors: Vec<String>,
    pub(crate) require_release_notes: bool,
}

impl GitHubClient {
    /// Create a client for `owner/repository`
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        let repository = repository.into();
        let repository_url = format!("https://github.com/{}/{}", owner, repository);

        Self {
            client: Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            owner,
            repository,
            repository_url,
            skip_authors: Vec::new(),
            require_release_notes: false,
        }
    }

    /// Create a client from configuration, reading the token from the
    /// configured environment variable
    pub fn from_config(
        config: &GitHubConfig,
        owner: impl Into<String>,
        repository: impl Into<String>,
    ) -> std::result::Result<Self, TrackerError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TrackerError::MissingToken(config.token_env.clone()))?;

        debug!(token_env = %config.token_env, "loaded API token");
        Ok(Self::new(&config.api_url, owner, repository, token)
            .with_skip_authors(config.skip_authors.iter().cloned())
            .with_release_notes_required(config.require_release_notes))
    }

    /// Override the repository URL used for links
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    /// Leave pull requests by these authors out of the history
    pub fn with_skip_authors(mut self, authors: impl IntoIterator<Item = String>) -> Self {
        self.skip_authors = authors.into_iter().collect();
        self
    }

    /// Fail the history walk when pull requests lack a release-note block.
    /// All offending pull requests are reported together.
    pub fn with_release_notes_required(mut self, required: bool) -> Self {
        self.require_release_notes = required;
        self
    }

    /// Link to a pull request of this repository
    pub(crate) fn pull_request_url(&self, number: u64) -> String {
        format!("{}/pull/{}", self.repository_url, number)
    }

    /// Run a query and return its `data`.
    ///
    /// A response carrying several errors fails with all of them.
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> std::result::Result<T, TrackerError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TrackerError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: Response<T> = response.json().await?;
        into_data(body)
    }

    pub(crate) fn repository_variables(&self) -> Value {
        json!({ "owner": self.owner, "name": self.repository })
    }
}

fn into_data<T>(response: Response<T>) -> std::result::Result<T, TrackerError> {
    let mut errors: Vec<TrackerError> = response
        .errors
        .into_iter()
        .map(|e| TrackerError::GraphQl(e.message))
        .collect();

    match errors.len() {
        0 => response
            .data
            .ok_or_else(|| TrackerError::GraphQl("response contained no data".to_string())),
        1 => Err(errors.remove(0)),
        _ => Err(TrackerError::Aggregated(errors)),
    }
}

#[async_trait::async_trait]
impl HistorySource for GitHubClient {
    fn name(&self) -> &str {
        "github"
    }

    fn repository_url(&self) -> String {
        self.repository_url.clone()
    }

    #[instrument(skip(self), fields(repository = %self.repository))]
    async fn references(&self) -> Result<RepositoryRefs> {
        let refs = self.fetch_references().await?;
        info!(
            tags = refs.tags.len(),
            branches = refs.branches.len(),
            "fetched references"
        );
        Ok(refs)
    }

    #[instrument(skip(self), fields(repository = %self.repository))]
    async fn log(&self, head: &str, max_count: usize) -> Result<Vec<Commit>> {
        Ok(self.fetch_log(head, max_count).await?)
    }

    #[instrument(skip(self, stopper), fields(repository = %self.repository, stopper = %stopper))]
    async fn history(&self, head: &str, stopper: &Stopper) -> Result<Vec<Commit>> {
        let commits = self.fetch_history(head, stopper).await?;
        info!(count = commits.len(), "fetched history");
        Ok(commits)
    }
}
