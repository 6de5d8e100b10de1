//! CLI commands

mod changelog;
mod init;
mod range;

pub use changelog::ChangelogCommand;
pub use init::InitCommand;
pub use range::RangeCommand;

use std::path::Path;

use anyhow::Context;
use clap::{Args, ValueEnum};
use tracing::{debug, info};

use relnote_core::config::{Config, SourceKind};
use relnote_core::error::ConfigError;
use relnote_core::HistorySource;
use relnote_git::{browse_url, GitRepo, LocalSource};
use relnote_github::GitHubClient;

/// Which release to look at
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Version the changelog is for (a leading `v` is ignored)
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: String,

    /// Stop at the commit whose hash starts with this prefix, instead of the
    /// previous release
    #[arg(long, value_name = "COMMIT")]
    pub end: Option<String>,
}

impl RangeArgs {
    /// Target version without a leading `v`
    pub fn version(&self) -> &str {
        let version = self.for_version.trim();
        version.strip_prefix('v').unwrap_or(version)
    }
}

/// History source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// GitHub GraphQL API
    Github,
    /// Local git repository
    Local,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Github => SourceKind::GitHub,
            SourceArg::Local => SourceKind::Local,
        }
    }
}

/// Where history is read from
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// History source (default from configuration: github)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// GitHub organization or user owning the repository
    #[arg(long)]
    pub organization: Option<String>,

    /// GitHub repository name
    #[arg(long)]
    pub repository: Option<String>,
}

impl SourceArgs {
    /// Build the history source from flags and configuration
    pub fn build(&self, config: &Config, cwd: &Path) -> anyhow::Result<Box<dyn HistorySource>> {
        let kind = self.source.map(SourceKind::from).unwrap_or(config.source.kind);
        debug!(?kind, "building history source");

        let source: Box<dyn HistorySource> = match kind {
            SourceKind::Local => {
                let repo = GitRepo::discover(cwd)?;
                let mut source = LocalSource::new(repo, &config.source.remote)?;
                if let Some(url) = &config.output.repository_url {
                    source = source.with_repository_url(url);
                }
                Box::new(source)
            }
            SourceKind::GitHub => {
                let (owner, repository) = self.github_repository(config, cwd)?;
                info!(owner = %owner, repository = %repository, "using GitHub repository");

                let mut client = GitHubClient::from_config(&config.github, owner, repository)?;
                if let Some(url) = &config.output.repository_url {
                    client = client.with_repository_url(url);
                }
                Box::new(client)
            }
        };

        Ok(source)
    }

    /// Owner and name of the GitHub repository: flags, then configuration,
    /// then the configured remote of the local clone
    fn github_repository(&self, config: &Config, cwd: &Path) -> anyhow::Result<(String, String)> {
        let from_remote = || {
            let repo = GitRepo::discover(cwd).ok()?;
            let url = repo.remote_url(&config.source.remote).ok()??;
            github_owner_and_name(&browse_url(&url))
        };

        let mut owner = self.organization.clone().or_else(|| config.github.owner.clone());
        let mut repository = self.repository.clone().or_else(|| config.github.repository.clone());

        if owner.is_none() || repository.is_none() {
            if let Some((remote_owner, remote_name)) = from_remote() {
                owner = owner.or(Some(remote_owner));
                repository = repository.or(Some(remote_name));
            }
        }

        let owner = owner
            .ok_or_else(|| ConfigError::MissingField("github.owner".to_string()))
            .context("set --organization or github.owner")?;
        let repository = repository
            .ok_or_else(|| ConfigError::MissingField("github.repository".to_string()))
            .context("set --repository or github.repository")?;

        Ok((owner, repository))
    }
}

/// `owner` and `name` from `https://github.com/<owner>/<name>`
fn github_owner_and_name(url: &str) -> Option<(String, String)> {
    let path = url.strip_prefix("https://github.com/")?;
    let (owner, name) = path.split_once('/')?;

    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }

    Some((owner.to_string(), name.to_string()))
}
