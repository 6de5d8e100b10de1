//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_GITHUB_API_URL, DEFAULT_PREVIOUS_RELEASE_DEPTH, DEFAULT_RELEASE_BRANCH_PREFIX,
    DEFAULT_SKIP_AUTHORS, DEFAULT_TOKEN_ENV,
};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where history is read from
    pub source: SourceConfig,

    /// GitHub tracker settings
    pub github: GitHubConfig,

    /// Commit range resolution settings
    pub range: RangeConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Kind of history source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub GraphQL API
    #[default]
    GitHub,
    /// Local git repository, pull requests derived from commit messages
    Local,
}

/// Source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source kind
    pub kind: SourceKind,

    /// Remote whose tracking branches count as branches (local source)
    pub remote: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            remote: "origin".to_string(),
        }
    }
}

/// GitHub configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Organization or user owning the repository
    pub owner: Option<String>,

    /// Repository name
    pub repository: Option<String>,

    /// GraphQL endpoint
    pub api_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Authors (logins) whose pull requests are left out of the history
    pub skip_authors: Vec<String>,

    /// Fail when a pull request has neither release notes nor `NONE`
    pub require_release_notes: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repository: None,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            skip_authors: DEFAULT_SKIP_AUTHORS.iter().map(|a| a.to_string()).collect(),
            require_release_notes: false,
        }
    }
}

/// Range resolution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Prefix of release branch names
    pub release_branch_prefix: String,

    /// How many commits of the previous release branch to load
    pub previous_release_depth: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            release_branch_prefix: DEFAULT_RELEASE_BRANCH_PREFIX.to_string(),
            previous_release_depth: DEFAULT_PREVIOUS_RELEASE_DEPTH,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format (markdown or json)
    pub format: String,

    /// Overrides the repository URL used for links
    pub repository_url: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_string(),
            repository_url: None,
        }
    }
}
