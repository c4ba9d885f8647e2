//! Release line command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use changeline_changelog::ChangelogFormatter;
use changeline_core::{Changeset, ReleaseType};

use super::{emit_line, github_formatter, read_input, resolve_options};
use crate::cli::Cli;

/// Format the changelog line for a changeset
#[derive(Debug, Args)]
pub struct ReleaseLineCommand {
    /// Changeset JSON file, e.g. {"summary": "...", "commit": "..."} ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Bump type of the changeset
    #[arg(long, value_name = "TYPE", default_value = "patch")]
    pub release_type: ReleaseType,

    /// Repository in owner/name form (overrides configuration)
    #[arg(long, env = "CHANGELINE_REPO")]
    pub repo: Option<String>,
}

impl ReleaseLineCommand {
    /// Execute the release line command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(input = ?self.input, release_type = %self.release_type, "executing release-line command");

        let input = read_input(self.input.as_deref())?;
        let changeset: Changeset =
            serde_json::from_str(&input).context("input is not a valid changeset")?;
        let options = resolve_options(self.repo.as_deref())?;

        let formatter = github_formatter(cli);
        let line = formatter
            .get_release_line(&changeset, self.release_type, &options)
            .await?;

        emit_line(cli, &line)
    }
}
