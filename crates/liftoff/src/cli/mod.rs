//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{
    CheckReleaseCommand, CompletionsCommand, InitCommand, LintTitleCommand, PrepareCommand,
    PublishPlanCommand,
};

/// Liftoff - release pull requests for JavaScript monorepos
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
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
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter liftoff.toml
    Init(InitCommand),

    /// Compute the pending release and render the release PR body
    Prepare(PrepareCommand),

    /// Read a merged release PR body and list the packages to publish
    PublishPlan(PublishPlanCommand),

    /// Check whether HEAD is a release commit
    CheckRelease(CheckReleaseCommand),

    /// Validate a pull request title
    LintTitle(LintTitleCommand),

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
            Commands::Prepare(ref cmd) => cmd.execute(&self),
            Commands::PublishPlan(ref cmd) => cmd.execute(&self),
            Commands::CheckRelease(ref cmd) => cmd.execute(&self),
            Commands::LintTitle(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prepare_flags() {
        let cli = Cli::try_parse_from([
            "liftoff",
            "--format",
            "json",
            "prepare",
            "--ignore-latest",
            "--no-contributors",
            "--log-file",
            "log.txt",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Prepare(cmd) => {
                assert!(cmd.ignore_latest);
                assert!(cmd.no_contributors);
                assert_eq!(cmd.log_file.as_deref(), Some(std::path::Path::new("log.txt")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
