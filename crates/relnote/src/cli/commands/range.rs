//! Range command

use clap::Args;
use serde_json::json;
use tracing::info;

use relnote_core::config::load_config_or_default;
use relnote_core::Stopper;
use relnote_git::{CommitRange, RangeResolver};

use super::{RangeArgs, SourceArgs};
use crate::cli::{output, Cli, OutputFormat};

/// Show the commit range a changelog would cover
#[derive(Debug, Args)]
pub struct RangeCommand {
    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RangeCommand {
    /// Execute the range command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let version = self.range.version();
        info!(version, end = ?self.range.end, "executing range command");

        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;
        let source = self.source.build(&config, &cwd)?;

        let runtime = tokio::runtime::Runtime::new()?;
        let range = runtime.block_on(async {
            let refs = source.references().await?;
            RangeResolver::new(source.as_ref(), &config.range)
                .resolve(version, self.range.end.as_deref(), &refs)
                .await
        })?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&range_json(version, &range))?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header(&format!("Commit range for {}", version)));
                }
                println!("{}", output::key_value("head", &range.head));
                println!("{}", output::key_value("from", &range.head_source.to_string()));
                println!("{}", output::key_value("stops at", &range.stopper.to_string()));
            }
        }

        Ok(())
    }
}

fn range_json(version: &str, range: &CommitRange) -> serde_json::Value {
    let stop = match &range.stopper {
        Stopper::CommitPrefix(prefix) => json!({ "kind": "commit", "prefix": prefix }),
        Stopper::Boundary {
            previous_release,
            stable_tags,
        } => json!({
            "kind": "boundary",
            "previous_release_commits": previous_release.len(),
            "stable_tags": stable_tags.len(),
        }),
        Stopper::Never => json!({ "kind": "never" }),
    };

    json!({
        "version": version,
        "head": range.head,
        "head_source": {
            "kind": range.head_source.kind(),
            "name": range.head_source.name(),
        },
        "stop": stop,
    })
}
