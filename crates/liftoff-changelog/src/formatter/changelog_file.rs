//! Per-package CHANGELOG.md maintenance

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use liftoff_core::error::ChangelogError;

use super::{render_sections, GitHubLinks, DEPENDENCY_NOTICE};
use crate::types::PackageRelease;

/// Matches the hashes of a markdown heading at the start of a line
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?P<hashes>#+) ").expect("Invalid regex"));

/// Render the CHANGELOG.md section of a release
///
/// `## <version> (<date>)` followed by the breaking and typed sections, with
/// no trailing newline. Releases without entries carry the dependency
/// notice instead.
pub fn generate_changelog_content(
    release: &PackageRelease,
    date: NaiveDate,
    links: Option<&GitHubLinks>,
) -> String {
    let heading = format!("## {} ({})", release.new_version(), date.format("%Y-%m-%d"));

    let sections = render_sections(release, links);
    let body = if sections.is_empty() {
        DEPENDENCY_NOTICE.to_string()
    } else {
        sections.join("\n\n")
    };

    format!("{}\n\n{}", heading, body)
}

/// Whether a line is the heading of a version's section
fn is_version_heading(line: &str, version: &str) -> bool {
    line.strip_prefix("## ")
        .and_then(|rest| rest.strip_prefix(version))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Byte offsets at which each line starts
fn line_starts(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |line| {
        let start = offset;
        offset += line.len();
        (start, line.trim_end_matches(['\n', '\r']))
    })
}

/// Insert or replace a version's section in an existing changelog
///
/// An existing section for the same version is replaced up to the next
/// `## ` heading. Otherwise the section is placed first, below the
/// document title when there is one. Sections are separated by two blank
/// lines.
pub fn update_changelog(existing: &str, section: &str, version: &str) -> String {
    let existing_section = line_starts(existing).find(|(_, line)| is_version_heading(line, version));

    if let Some((start, _)) = existing_section {
        let end = line_starts(existing)
            .find(|(offset, line)| *offset > start && line.starts_with("## "))
            .map(|(offset, _)| offset);

        let before = &existing[..start];
        return match end {
            Some(end) => format!("{}{}\n\n\n{}", before, section, &existing[end..]),
            None => format!("{}{}", before, section),
        };
    }

    if existing.trim().is_empty() {
        return section.to_string();
    }

    if existing.starts_with("# ") {
        let (title, rest) = existing.split_once('\n').unwrap_or((existing, ""));
        let rest = rest.trim_start();
        return if rest.is_empty() {
            format!("{}\n\n{}\n", title, section)
        } else {
            format!("{}\n\n{}\n\n\n{}", title, section, rest)
        };
    }

    format!("{}\n\n\n{}", section, existing)
}

/// A new changelog document holding a single section
pub fn new_changelog(title: &str, section: &str) -> String {
    format!("# {}\n\n{}\n", title, section)
}

/// Create or update a changelog file with a version's section
pub fn write_changelog(
    path: &Path,
    title: &str,
    section: &str,
    version: &str,
) -> Result<(), ChangelogError> {
    let content = if path.exists() {
        let existing = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), version, "updating changelog");
        update_changelog(&existing, section, version)
    } else {
        debug!(path = %path.display(), version, "creating changelog");
        new_changelog(title, section)
    };

    std::fs::write(path, content).map_err(|e| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(path = %path.display(), version, "changelog written");
    Ok(())
}

/// Push every heading one level deeper
pub fn increase_heading_level(markdown: &str) -> String {
    HEADING_REGEX.replace_all(markdown, "${hashes}# ").into_owned()
}
