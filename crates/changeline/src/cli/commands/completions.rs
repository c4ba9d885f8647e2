//! Shell completions generation command

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = ?self.shell, "executing completions command");

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                write_completions(self.shell, &mut file);
                if !cli.quiet {
                    output::success(&format!("Completions written to {}", path.display()));
                }
            }
            None => write_completions(self.shell, &mut std::io::stdout()),
        }
        Ok(())
    }
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_cover_line_commands() {
        let mut buffer = Vec::new();
        write_completions(Shell::Bash, &mut buffer);
        let script = String::from_utf8(buffer).unwrap();

        assert!(script.contains("changeline"));
        assert!(script.contains("release-line"));
        assert!(script.contains("dependency-line"));
        assert!(script.contains("--release-type"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
