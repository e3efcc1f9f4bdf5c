//! CLI commands

mod check_release;
mod completions;
mod init;
mod lint_title;
mod prepare;
mod publish_plan;

pub use check_release::CheckReleaseCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use lint_title::LintTitleCommand;
pub use prepare::PrepareCommand;
pub use publish_plan::PublishPlanCommand;

use std::path::PathBuf;

use console::style;
use tracing::debug;

use liftoff_core::config::{load_config_or_default, Config};

use crate::cli::Cli;

/// Load the configuration for the working directory
fn load_config(cli: &Cli) -> anyhow::Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir()?;
    let (config, config_path) = load_config_or_default(&cwd)?;

    match &config_path {
        Some(path) => debug!(path = %path.display(), "using config file"),
        None if cli.verbose && !cli.quiet => println!(
            "{} No configuration found, using defaults.",
            style("!").yellow().bold()
        ),
        None => {}
    }

    Ok((cwd, config))
}

/// Repository slug from the configuration, falling back to the environment
fn repository_slug(config: &Config) -> Option<String> {
    resolve_repository(
        config.repository.as_deref(),
        std::env::var("GITHUB_REPOSITORY").ok(),
    )
}

fn resolve_repository(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .or(from_env)
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
