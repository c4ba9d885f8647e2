//! Dependency release line command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use tracing::info;

use changeline_changelog::ChangelogFormatter;
use changeline_core::{Changeset, DependencyUpdate};

use super::{emit_line, github_formatter, read_input, resolve_options};
use crate::cli::Cli;

/// Format the "Updated dependencies" line for a package
#[derive(Debug, Args)]
pub struct DependencyLineCommand {
    /// JSON file with `changesets` and `dependenciesUpdated` ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Repository in owner/name form (overrides configuration)
    #[arg(long, env = "CHANGELINE_REPO")]
    pub repo: Option<String>,
}

/// Input document for the dependency line command
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyLineInput {
    #[serde(default)]
    changesets: Vec<Changeset>,
    #[serde(default)]
    dependencies_updated: Vec<DependencyUpdate>,
}

impl DependencyLineCommand {
    /// Execute the dependency line command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(input = ?self.input, "executing dependency-line command");

        let input = read_input(self.input.as_deref())?;
        let document: DependencyLineInput =
            serde_json::from_str(&input).context("input is not a valid dependency document")?;
        let options = resolve_options(self.repo.as_deref())?;

        let formatter = github_formatter(cli);
        let line = formatter
            .get_dependency_release_line(
                &document.changesets,
                &document.dependencies_updated,
                &options,
            )
            .await?;

        emit_line(cli, &line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_document() {
        let document: DependencyLineInput = serde_json::from_str(
            r#"{
                "changesets": [{"summary": "Bump", "commit": "abc1234"}, {"summary": "Other"}],
                "dependenciesUpdated": [{"name": "pkg-a", "newVersion": "1.2.0"}]
            }"#,
        )
        .unwrap();

        assert_eq!(document.changesets.len(), 2);
        assert_eq!(document.changesets[0].commit.as_deref(), Some("abc1234"));
        assert_eq!(
            document.dependencies_updated,
            vec![DependencyUpdate::new("pkg-a", "1.2.0")]
        );
    }

    #[test]
    fn test_parse_empty_document() {
        let document: DependencyLineInput = serde_json::from_str("{}").unwrap();
        assert!(document.changesets.is_empty());
        assert!(document.dependencies_updated.is_empty());
    }
}
