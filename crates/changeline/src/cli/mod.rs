//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{CompletionsCommand, DependencyLineCommand, InitCommand, ReleaseLineCommand};

/// Changeline - Changelog line formatter for changesets
#[derive(Debug, Parser)]
#[command(name = "changeline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress output except errors and results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Raw Markdown output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a changeline.toml configuration
    Init(InitCommand),

    /// Format the changelog line for a changeset
    ReleaseLine(ReleaseLineCommand),

    /// Format the "Updated dependencies" line for a package
    DependencyLine(DependencyLineCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::ReleaseLine(ref cmd) => cmd.execute(&self),
            Commands::DependencyLine(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}
