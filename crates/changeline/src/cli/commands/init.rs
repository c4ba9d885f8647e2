//! Init command

use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::Args;
use console::style;
use tracing::info;

use changeline_core::config::{validate_options, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};
use changeline_core::FormatterOptions;

use crate::cli::{output, Cli};

/// Create a changeline.toml configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Repository in owner/name form
    #[arg(long)]
    pub repo: Option<String>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(repo = ?self.repo, force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let path = self.write_config(&cwd)?;

        if !cli.quiet {
            output::success(&format!("Created {}", style(path.display()).cyan()));
        }
        Ok(())
    }

    fn write_config(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(DEFAULT_CONFIG_TOML);
        if path.exists() && !self.force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let content = match &self.repo {
            Some(repo) => {
                validate_options(&FormatterOptions::new(repo.as_str()))?;
                DEFAULT_CONFIG_TEMPLATE.replace("org/repo", repo)
            }
            None => DEFAULT_CONFIG_TEMPLATE.to_string(),
        };

        std::fs::write(&path, content)?;
        Ok(path)
    }
}
