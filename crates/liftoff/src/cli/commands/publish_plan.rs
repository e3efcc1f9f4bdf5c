//! Publish plan command: read a merged release PR body

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use liftoff_changelog::formatter::increase_heading_level;
use liftoff_changelog::{has_release_marker, plan_publish, ChangelogParser, PlannedRelease};
use liftoff_core::monorepo::PackageDiscovery;

use super::load_config;
use crate::cli::{output, Cli, OutputFormat};

/// Read a merged release PR body and list the packages to publish
#[derive(Debug, Args)]
pub struct PublishPlanCommand {
    /// File holding the PR body (default: stdin)
    #[arg(long, value_name = "FILE")]
    pub body_file: Option<PathBuf>,
}

impl PublishPlanCommand {
    /// Execute the publish-plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(body_file = ?self.body_file, "executing publish-plan command");
        let (cwd, config) = load_config(cli)?;
        let release_id = config.release.release_id.as_str();

        let body = self.read_body()?;
        if !has_release_marker(&body, release_id) {
            anyhow::bail!(
                "The pull request body has no release marker for '{}'",
                release_id
            );
        }

        let entries = ChangelogParser::new(release_id).parse(&body)?;
        if entries.is_empty() {
            if !cli.quiet {
                output::info("No release headings found.");
            }
            return Ok(());
        }

        let packages = PackageDiscovery::new(&cwd).discover()?;
        let plan = plan_publish(&entries, &packages, &config.tags);

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            OutputFormat::Text => print_plan(cli, &plan),
        }

        Ok(())
    }

    fn read_body(&self) -> anyhow::Result<String> {
        match &self.body_file {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut body = String::new();
                std::io::stdin().read_to_string(&mut body)?;
                Ok(body)
            }
        }
    }
}

fn print_plan(cli: &Cli, plan: &[PlannedRelease]) {
    if plan.is_empty() {
        if !cli.quiet {
            output::warning("No publishable packages in this release.");
        }
        return;
    }

    for release in plan {
        println!("{}", output::header(&release.name));
        println!(
            "{}",
            output::key_value(
                "version",
                &output::version_change(&release.old_version, &release.new_version)
            )
        );
        println!(
            "{}",
            output::key_value("tag", &output::tag(&release.tag))
        );
        if cli.verbose && !release.changelog.is_empty() {
            println!();
            println!("{}", increase_heading_level(&release.changelog));
        }
        println!();
    }
}
