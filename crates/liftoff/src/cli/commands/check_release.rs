//! Check whether HEAD is a release commit

use clap::Args;
use tracing::info;

use liftoff_git::GitRepo;

use super::load_config;
use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Check whether HEAD is a release commit
#[derive(Debug, Args)]
pub struct CheckReleaseCommand {}

impl CheckReleaseCommand {
    /// Execute the check-release command
    ///
    /// Exits with a non-zero code when HEAD is not a release commit.
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing check-release command");
        let (cwd, config) = load_config(cli)?;

        let repo = GitRepo::discover(&cwd)?;
        let is_release = repo.head_is_release_commit(&config.release.release_id)?;
        let branch = repo.current_branch()?;

        match cli.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({ "release": is_release, "branch": branch })
                );
            }
            OutputFormat::Text if !cli.quiet => {
                let location = branch.as_deref().unwrap_or("detached HEAD");
                if is_release {
                    output::success(&format!("HEAD of {} is a release commit", location));
                } else {
                    output::info(&format!("HEAD of {} is not a release commit", location));
                }
                if branch.as_deref().is_some_and(|b| b != config.release.default_branch) {
                    output::warning(&format!(
                        "Releases are published from '{}'",
                        config.release.default_branch
                    ));
                }
            }
            OutputFormat::Text => {}
        }

        if !is_release {
            std::process::exit(exit_codes::ERROR);
        }
        Ok(())
    }
}
