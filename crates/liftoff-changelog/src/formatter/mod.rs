//! Changelog formatters

mod changelog_file;
mod links;
mod markdown;

pub use changelog_file::{
    generate_changelog_content, increase_heading_level, new_changelog, update_changelog,
    write_changelog,
};
pub use links::GitHubLinks;
pub use markdown::{package_heading, ChangelogRenderer, CONTRIBUTORS_HEADING, DEPENDENCY_NOTICE};

use crate::types::{ChangelogEntry, PackageRelease};

/// Heading of the breaking changes section
pub const BREAKING_CHANGES_HEADING: &str = "⚠️ Breaking Changes";

/// Render the breaking and typed sections of a release
///
/// Each section is `### heading` followed by one bullet per entry, with no
/// trailing newline.
pub(crate) fn render_sections(release: &PackageRelease, links: Option<&GitHubLinks>) -> Vec<String> {
    let mut sections = Vec::new();

    if !release.breaking_changes.is_empty() {
        sections.push(render_section(
            BREAKING_CHANGES_HEADING,
            &release.breaking_changes,
            links,
        ));
    }

    for section in release.sections.iter().filter(|s| !s.is_empty()) {
        sections.push(render_section(&section.heading, &section.entries, links));
    }

    sections
}

fn render_section(heading: &str, entries: &[ChangelogEntry], links: Option<&GitHubLinks>) -> String {
    let mut output = format!("### {}", heading);

    for entry in entries {
        let description = match links {
            Some(links) => links.link_pull_requests(&entry.description),
            None => entry.description.clone(),
        };
        output.push_str("\n- ");
        output.push_str(&description);
    }

    output
}
