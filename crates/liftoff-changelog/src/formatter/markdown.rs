//! Release PR body renderer

use tracing::{debug, instrument};

use liftoff_core::config::TagConfig;
use liftoff_core::types::PackageInfo;

use super::{render_sections, GitHubLinks};
use crate::aggregator::ReleasePlan;
use crate::types::{Contributor, PackageRelease};

/// Notice rendered for packages released only because a dependency moved
pub const DEPENDENCY_NOTICE: &str = "📦 Updated due to dependency changes";

/// Heading of the contributor credits
pub const CONTRIBUTORS_HEADING: &str = "❤️ Contributors";

/// Default document title
const DEFAULT_TITLE: &str = "👉 Changelog";

/// Renders a release plan as the markdown body of a release PR
pub struct ChangelogRenderer<'a> {
    tags: &'a TagConfig,
    title: String,
    links: Option<GitHubLinks>,
}

impl<'a> ChangelogRenderer<'a> {
    /// Create a renderer using a tag naming scheme
    pub fn new(tags: &'a TagConfig) -> Self {
        Self {
            tags,
            title: DEFAULT_TITLE.to_string(),
            links: None,
        }
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the `owner/repo` slug used for compare and pull request links
    pub fn with_repository(mut self, repository: Option<&str>) -> Self {
        self.links = repository.and_then(GitHubLinks::new);
        self
    }

    /// Links used when rendering, if a repository is known
    pub fn links(&self) -> Option<&GitHubLinks> {
        self.links.as_ref()
    }

    /// Render the whole document
    #[instrument(skip_all, fields(direct = plan.direct.len(), indirect = plan.indirect.len(), contributors = contributors.len()))]
    pub fn render(&self, plan: &ReleasePlan, contributors: &[Contributor]) -> String {
        let mut output = format!("# {}\n\n", self.title);

        for release in &plan.direct {
            output.push_str(&package_heading(&release.package));
            output.push_str("\n\n");
            output.push_str(&self.render_package_content(release));
            output.push_str("\n\n");
        }

        for package in &plan.indirect {
            output.push_str(&package_heading(package));
            output.push_str("\n\n");
            output.push_str(&self.render_indirect_content(package));
            output.push_str("\n\n");
        }

        if !contributors.is_empty() {
            output.push_str(&format!("## {}\n", CONTRIBUTORS_HEADING));
            for contributor in contributors {
                let name = contributor.name.as_deref().unwrap_or(&contributor.username);
                output.push_str(&format!("- {} (@{})\n", name, contributor.username));
            }
        }

        debug!(output_len = output.len(), "release PR body rendered");
        output
    }

    /// Body of a direct package section, without its heading
    pub fn render_package_content(&self, release: &PackageRelease) -> String {
        let mut parts: Vec<String> = self.compare_link(&release.package).into_iter().collect();
        parts.extend(render_sections(release, self.links.as_ref()));
        parts.join("\n\n")
    }

    /// Body of an indirect package section, without its heading
    pub fn render_indirect_content(&self, package: &PackageInfo) -> String {
        let mut parts: Vec<String> = self.compare_link(package).into_iter().collect();
        parts.push(DEPENDENCY_NOTICE.to_string());
        parts.join("\n\n")
    }

    /// `[compare changes](...)` between the current and the new tag
    pub fn compare_link(&self, package: &PackageInfo) -> Option<String> {
        let links = self.links.as_ref()?;
        let new_version = package.new_version.as_deref()?;

        let previous_tag = self.tags.package_tag(package, &package.version);
        let new_tag = self.tags.package_tag(package, new_version);

        Some(format!(
            "[compare changes]({})",
            links.compare_url(&previous_tag, &new_tag)
        ))
    }
}

/// `## name@old➡️new`, or `## old➡️new` for the root package
pub fn package_heading(package: &PackageInfo) -> String {
    let versions = match &package.new_version {
        Some(new_version) => format!("{}➡️{}", package.version, new_version),
        None => package.version.clone(),
    };

    if package.is_root {
        format!("## {}", versions)
    } else {
        format!("## {}@{}", package.name, versions)
    }
}
