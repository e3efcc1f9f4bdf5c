//! Prepare command: compute the pending release and render its PR body

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::{info, instrument};

use liftoff_changelog::formatter::{generate_changelog_content, write_changelog};
use liftoff_changelog::{
    append_release_marker, resolve_contributors, ChangelogExtractor, ChangelogRenderer,
    Contributor, GitHubLinks, PackageRelease, ReleasePlan, SemverAggregator,
};
use liftoff_core::config::Config;
use liftoff_core::monorepo::{ManifestDocument, PackageDiscovery};
use liftoff_core::types::{PackageInfo, SemverBump};
use liftoff_git::{parse_git_log, Commit, CommitClassifier, GitRepo};

use super::{load_config, repository_slug};
use crate::cli::{output, Cli, OutputFormat};
use crate::ungh::UnghClient;

/// Compute the pending release and render the release PR body
#[derive(Debug, Args)]
pub struct PrepareCommand {
    /// Read the commit log from a file in the separator format instead of git
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Leave the newest commit out of the release
    #[arg(long)]
    pub ignore_latest: bool,

    /// Do not look up contributors
    #[arg(long)]
    pub no_contributors: bool,

    /// Write the PR body to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Update package.json versions and CHANGELOG.md files
    #[arg(short, long)]
    pub write: bool,
}

/// Machine readable result of a prepare run
#[derive(Debug, Serialize)]
struct PrepareOutput<'a> {
    title: &'a str,
    branch: &'a str,
    body: &'a str,
    packages: Vec<PackageSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct PackageSummary<'a> {
    name: &'a str,
    version: &'a str,
    new_version: Option<&'a str>,
    direct: bool,
}

impl PrepareCommand {
    /// Execute the prepare command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            log_file = ?self.log_file,
            ignore_latest = self.ignore_latest,
            write = self.write,
            "executing prepare command"
        );
        let (cwd, config) = load_config(cli)?;
        let types = config.type_table();

        let log = self.read_log(&cwd, &config)?;
        let commits = CommitClassifier::new(&types, &config.release.release_id)
            .with_ignore_latest(self.ignore_latest)
            .classify(&log);
        if commits.is_empty() {
            return notice(cli, "No commits found since the last release.");
        }

        let entries = ChangelogExtractor::new(&types).extract_all(&commits);
        if entries.is_empty() {
            return notice(cli, "No changelog entries found since the last release.");
        }

        let packages = PackageDiscovery::new(&cwd).discover()?;
        let plan = SemverAggregator::new(&types).aggregate(&entries, &packages);
        if plan.is_empty() {
            return notice(cli, "No packages need a release.");
        }

        let contributors = self.contributors(&config, &commits)?;

        let repository = repository_slug(&config);
        let renderer = ChangelogRenderer::new(&config.tags)
            .with_title(config.changelog.title.as_str())
            .with_repository(repository.as_deref());
        let body = append_release_marker(
            &renderer.render(&plan, &contributors),
            &config.release.release_id,
        );

        if self.write {
            write_release(&cwd, &config, &plan, renderer.links(), cli.quiet)?;
        }

        self.emit(cli, &config, &plan, &body)
    }

    fn read_log(&self, cwd: &Path, config: &Config) -> anyhow::Result<Vec<Commit>> {
        match &self.log_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(parse_git_log(&text)?)
            }
            None => {
                let repo = GitRepo::discover(cwd)?;
                Ok(repo.commit_log(config.release.end_commit.as_deref())?)
            }
        }
    }

    fn contributors(&self, config: &Config, commits: &[Commit]) -> anyhow::Result<Vec<Contributor>> {
        if self.no_contributors || !config.contributors.enabled {
            return Ok(Vec::new());
        }

        let lookup = UnghClient::new(&config.contributors.lookup_url);
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(runtime.block_on(resolve_contributors(commits, &lookup)))
    }

    fn emit(&self, cli: &Cli, config: &Config, plan: &ReleasePlan, body: &str) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let summary = PrepareOutput {
                    title: &config.release.pr_title,
                    branch: &config.release.release_branch,
                    body,
                    packages: summarize(plan),
                };
                let json = serde_json::to_string_pretty(&summary)?;
                match &self.output {
                    Some(path) => std::fs::write(path, json)?,
                    None => println!("{}", json),
                }
            }
            OutputFormat::Text => match &self.output {
                Some(path) => {
                    std::fs::write(path, body)?;
                    if !cli.quiet {
                        print_plan(plan);
                        output::success(&format!(
                            "Release PR body written to {}",
                            output::path(path)
                        ));
                    }
                }
                None => println!("{}", body),
            },
        }

        Ok(())
    }
}

fn notice(cli: &Cli, message: &str) -> anyhow::Result<()> {
    info!(message, "nothing to release");
    if !cli.quiet {
        output::info(message);
    }
    Ok(())
}

fn summarize(plan: &ReleasePlan) -> Vec<PackageSummary<'_>> {
    let direct = plan.direct.iter().map(|r| (&r.package, true));
    let indirect = plan.indirect.iter().map(|p| (p, false));

    direct
        .chain(indirect)
        .map(|(package, direct)| PackageSummary {
            name: &package.name,
            version: &package.version,
            new_version: package.new_version.as_deref(),
            direct,
        })
        .collect()
}

fn print_plan(plan: &ReleasePlan) {
    eprintln!("{}", output::header("Release plan"));
    for release in &plan.direct {
        eprintln!(
            "{} ({})",
            output::key_value(
                &release.package.name,
                &output::version_change(&release.package.version, release.new_version())
            ),
            output::bump(release.bump)
        );
    }
    for package in &plan.indirect {
        eprintln!(
            "{} (dependencies)",
            output::key_value(
                &package.name,
                &output::version_change(&package.version, package.new_version.as_deref().unwrap_or("?"))
            )
        );
    }
    eprintln!();
}

/// Apply a release plan to the working tree
///
/// Every released manifest gets its new version, and every range a released
/// package holds on another released package is moved along.
#[instrument(skip_all, fields(packages = plan.direct.len() + plan.indirect.len()))]
fn write_release(
    root: &Path,
    config: &Config,
    plan: &ReleasePlan,
    links: Option<&GitHubLinks>,
    quiet: bool,
) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let released: Vec<&PackageInfo> = plan.packages().collect();

    for package in &released {
        let Some(new_version) = package.new_version.as_deref() else {
            continue;
        };
        let dir = root.join(&package.path);

        let mut manifest = ManifestDocument::open(&dir.join("package.json"))?;
        manifest.set_version(new_version)?;
        for dependency in &released {
            if let Some(version) = dependency.new_version.as_deref() {
                manifest.update_dependency(&dependency.name, version);
            }
        }
        manifest.save()?;

        let release = match plan.direct.iter().find(|r| r.package.name == package.name) {
            Some(release) => release.clone(),
            None => dependency_release(package),
        };
        let section = generate_changelog_content(&release, today, links);
        write_changelog(
            &dir.join(&config.changelog.file),
            &config.changelog.title,
            &section,
            new_version,
        )?;

        info!(package = %package.name, version = new_version, "release written");
        if quiet {
            continue;
        }
        output::success(&format!(
            "{} {}",
            package.name,
            output::tag(config.tags.package_tag(package, new_version))
        ));
    }

    Ok(())
}

/// A release without changelog entries, for dependency refreshes
fn dependency_release(package: &PackageInfo) -> PackageRelease {
    PackageRelease {
        package: package.clone(),
        bump: SemverBump::Patch,
        breaking_changes: Vec::new(),
        sections: Vec::new(),
    }
}
