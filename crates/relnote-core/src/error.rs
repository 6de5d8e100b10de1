//! Error types for relnote

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RelnoteError
pub type Result<T> = std::result::Result<T, RelnoteError>;

/// Main error type for relnote operations
#[derive(Debug, Error)]
pub enum RelnoteError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Local repository errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Remote tracker errors
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Commit range resolution errors
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Changelog generation and rendering errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl RelnoteError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Local repository errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Errors talking to the pull-request tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No API token available
    #[error("No API token found in ${0}")]
    MissingToken(String),

    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// GraphQL query reported errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Queried object does not exist
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Pull request has neither release notes nor `NONE`
    #[error("Pull request {0} is missing the release note")]
    MissingReleaseNote(String),

    /// Several lookups of one batch failed
    #[error("{} lookups failed: {}", .0.len(), join_errors(.0))]
    Aggregated(Vec<TrackerError>),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_errors(errors: &[TrackerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Commit range resolution errors
#[derive(Debug, Error)]
pub enum RangeError {
    /// Target version is not a semantic version
    #[error("Failed to parse version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Neither tag, release branch nor default branch resolved to a commit
    #[error("No commit details exist for primary branch '{branch}'")]
    UnresolvableHead { branch: String },

    /// No release branch exists for the previous major version
    #[error("Could not find a release branch for any minor in the v{major} release")]
    NoPreviousRelease { major: u64 },

    /// Previous release branch name was computed but does not exist
    #[error("Could not find HEAD for release branch '{branch}'")]
    MissingBranchHead { branch: String },
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Failed to render changelog
    #[error("Failed to render changelog as {format}: {reason}")]
    RenderFailed { format: String, reason: String },

    /// Unknown output format
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}
