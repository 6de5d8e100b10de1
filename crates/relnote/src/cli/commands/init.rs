//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use relnote_core::config::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};

use crate::cli::{output, Cli};

/// Write a starter configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path (default: relnote.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        if !cli.quiet {
            output::success(&format!(
                "Created {}",
                style(config_path.display()).cyan()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use relnote_core::config::load_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relnote.toml");
        let cli = Cli::parse_from(["relnote", "-q", "init"]);

        let cmd = InitCommand {
            force: false,
            output: Some(path.clone()),
        };
        cmd.execute(&cli).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.output.format, "markdown");

        // refuses to overwrite without --force
        assert!(cmd.execute(&cli).is_err());
        InitCommand {
            force: true,
            output: Some(path),
        }
        .execute(&cli)
        .unwrap();
    }
}
