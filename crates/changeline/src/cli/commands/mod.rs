//! CLI commands

mod completions;
mod dependency_line;
mod init;
mod release_line;

pub use completions::CompletionsCommand;
pub use dependency_line::DependencyLineCommand;
pub use init::InitCommand;
pub use release_line::ReleaseLineCommand;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use changeline_changelog::MarkdownFormatter;
use changeline_core::config::{load_config_or_default, validate_options};
use changeline_core::FormatterOptions;
use changeline_github::GitHubInfo;

use crate::cli::{output, Cli, OutputFormat};

/// Read command input from a file, or stdin when no path or `-` is given
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Resolve formatter options from the `--repo` flag or configuration files
fn resolve_options(repo: Option<&str>) -> anyhow::Result<FormatterOptions> {
    let options = match repo {
        Some(repo) => FormatterOptions::new(repo),
        None => {
            let cwd = std::env::current_dir()?;
            let (options, path) = load_config_or_default(&cwd)?;
            debug!(config = ?path, repo = ?options.repo, "resolved options from config");
            options
        }
    };
    validate_options(&options)?;
    Ok(options)
}

/// Build the formatter used by the line commands
fn github_formatter(cli: &Cli) -> MarkdownFormatter<GitHubInfo> {
    let github = GitHubInfo::from_env();
    if !github.has_token() && !cli.quiet {
        output::warning("GITHUB_TOKEN is not set; link lookups will fail");
    }
    MarkdownFormatter::new(github)
}

/// Print a formatted line in the selected output format
fn emit_line(cli: &Cli, line: &str) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "line": line });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => println!("{}", line),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_input_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("changeset.json");
        std::fs::write(&path, r#"{"summary": "Fix bug"}"#).unwrap();

        let input = read_input(Some(&path)).unwrap();
        assert_eq!(input, r#"{"summary": "Fix bug"}"#);
    }

    #[test]
    fn test_read_input_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_input(Some(&temp.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_resolve_options_from_flag() {
        let options = resolve_options(Some("o/r")).unwrap();
        assert_eq!(options.repo.as_deref(), Some("o/r"));
    }

    #[test]
    fn test_resolve_options_rejects_bad_flag() {
        assert!(resolve_options(Some("no-slash")).is_err());
    }
}
