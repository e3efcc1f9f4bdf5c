//! Pull request title validation

use clap::Args;
use tracing::info;

use liftoff_changelog::validate_pr_title;

use super::load_config;
use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Validate a pull request title
#[derive(Debug, Args)]
pub struct LintTitleCommand {
    /// The title to check
    pub title: String,
}

impl LintTitleCommand {
    /// Execute the lint-title command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(title = %self.title, "executing lint-title command");
        let (_, config) = load_config(cli)?;
        let types = config.type_table();

        let valid = validate_pr_title(&self.title, &types, &config.release.pr_title);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "title": self.title, "valid": valid }));
            }
            OutputFormat::Text if !cli.quiet => {
                if valid {
                    output::success("Pull request title is valid");
                } else {
                    let known: Vec<&str> = types.iter().map(|t| t.key.as_str()).collect();
                    output::warning(&format!(
                        "Pull request title must look like 'type(scope): description' with a type from: {}",
                        known.join(", ")
                    ));
                }
            }
            OutputFormat::Text => {}
        }

        if !valid {
            std::process::exit(exit_codes::VALIDATION_ERROR);
        }
        Ok(())
    }
}
