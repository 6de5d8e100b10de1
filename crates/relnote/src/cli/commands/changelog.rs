//! Changelog command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use relnote_changelog::{ChangelogGenerator, FormatterRegistry};
use relnote_core::config::load_config_or_default;
use relnote_core::error::ChangelogError;
use relnote_git::RangeResolver;

use super::{RangeArgs, SourceArgs};
use crate::cli::{output, Cli};

/// Generate the changelog for a version
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format (markdown, json; default from configuration)
    #[arg(long)]
    pub format: Option<String>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the pull requests that declared no release note (NONE) instead
    #[arg(long)]
    pub release_notes_none: bool,

    /// Fail when a pull request has neither release notes nor NONE
    #[arg(long)]
    pub require_release_notes: bool,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let version = self.range.version();
        info!(version, end = ?self.range.end, "executing changelog command");

        let cwd = std::env::current_dir()?;
        let (mut config, config_path) = load_config_or_default(&cwd)?;
        if let Some(path) = &config_path {
            info!(path = %path.display(), "loaded configuration");
        }

        let format = self
            .format
            .clone()
            .unwrap_or_else(|| config.output.format.clone());
        let formatter = FormatterRegistry::new()
            .get(&format)
            .ok_or(ChangelogError::UnsupportedFormat(format))?;

        if self.require_release_notes {
            config.github.require_release_notes = true;
        }

        let source = self.source.build(&config, &cwd)?;

        let runtime = tokio::runtime::Runtime::new()?;
        let commits = runtime.block_on(async {
            let refs = source.references().await?;
            let range = RangeResolver::new(source.as_ref(), &config.range)
                .resolve(version, self.range.end.as_deref(), &refs)
                .await?;

            info!(head = %range.head, from = %range.head_source, stop = %range.stopper, "resolved commit range");
            source.history(&range.head, &range.stopper).await
        })?;

        let generator = ChangelogGenerator::new(version, source.repository_url());
        let changelog = if self.release_notes_none {
            generator.generate_declined(&commits)?
        } else {
            generator.generate(&commits)?
        };
        let rendered = formatter.format(&changelog)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                if !cli.quiet {
                    output::success(&format!(
                        "Changelog for {} written to {}",
                        style(version).green().bold(),
                        style(path.display()).cyan()
                    ));
                }
            }
            None => print!("{}", rendered),
        }

        if !cli.quiet && changelog.is_empty() {
            output::info(&format!("No release notes found for {}", version));
        }

        Ok(())
    }
}
