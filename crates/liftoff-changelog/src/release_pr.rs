//! Release PR body persistence
//!
//! The rendered body is the only state carried from the `prepare` run to
//! the `publish` run. It ends with a marker comment identifying the
//! release id and the schema of the document, and is read back by
//! scanning its package headings.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use tracing::{debug, instrument, warn};

use liftoff_core::error::ReleasePrError;

use crate::extractor::FenceTracker;
use crate::types::{PackageChangelogEntry, ReleaseHeading};

/// Schema of the documents written by this version
pub const SCHEMA_VERSION: u32 = 1;

/// Separator between the old and the new version of a heading
const VERSION_ARROW: &str = "➡️";

/// Matches a release marker comment, with or without a schema tag
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*Release PR:\s*(?P<id>.*?)(?:\s+schema=(?P<schema>\d+))?\s*-->")
        .expect("Invalid regex")
});

/// Marker comment for a release id
pub fn release_marker(release_id: &str) -> String {
    format!("<!-- Release PR: {} schema={} -->", release_id, SCHEMA_VERSION)
}

/// Append the marker comment to a rendered body
pub fn append_release_marker(body: &str, release_id: &str) -> String {
    format!("{}\n\n{}", body.trim_end(), release_marker(release_id))
}

/// Whether a body carries the marker of a release id
pub fn has_release_marker(body: &str, release_id: &str) -> bool {
    MARKER_REGEX
        .captures_iter(body)
        .any(|caps| caps["id"].trim() == release_id)
}

/// Remove the marker comment of a release id
///
/// A marker without a schema tag was written before schemas existed and is
/// read as schema 1.
pub fn strip_release_marker(body: &str, release_id: &str) -> Result<String, ReleasePrError> {
    for caps in MARKER_REGEX.captures_iter(body) {
        if caps["id"].trim() != release_id {
            continue;
        }

        let found = match caps.name("schema") {
            Some(schema) => schema.as_str().parse::<u32>().unwrap_or(u32::MAX),
            None => SCHEMA_VERSION,
        };
        if found != SCHEMA_VERSION {
            return Err(ReleasePrError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
    }

    let stripped = MARKER_REGEX.replace_all(body, |caps: &regex::Captures<'_>| {
        if caps["id"].trim() == release_id {
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    Ok(stripped.trim_end().to_string())
}

/// Outcome of reading one h2 line
enum HeadingLine {
    Release(ReleaseHeading),
    Foreign,
}

/// Reads package sections back out of a release PR body
pub struct ChangelogParser<'a> {
    release_id: &'a str,
}

impl<'a> ChangelogParser<'a> {
    /// Create a parser for documents marked with a release id
    pub fn new(release_id: &'a str) -> Self {
        Self { release_id }
    }

    /// Parse every package section of a body
    ///
    /// Headings that do not look generated are skipped. A generated-looking
    /// heading with unparseable versions is an error, since silently
    /// dropping it would lose a release.
    ///
    /// A well-formed release heading inside a code block still starts a new
    /// package: a block left open in one package must not swallow the next.
    #[instrument(skip_all, fields(bytes = body.len()))]
    pub fn parse(&self, body: &str) -> Result<Vec<PackageChangelogEntry>, ReleasePrError> {
        let document = strip_release_marker(body, self.release_id)?;

        let mut entries = Vec::new();
        let mut current: Option<(ReleaseHeading, Vec<&str>)> = None;
        let mut fences = FenceTracker::default();

        for (index, line) in document.lines().enumerate() {
            let fence_line = fences.update(line);

            let heading = if fence_line || !line.starts_with("## ") {
                None
            } else if fences.is_open() {
                let fenced = fenced_release_heading(line);
                if fenced.is_some() {
                    warn!(line = index + 1, "code block left open before release heading, closing it");
                    fences.close();
                }
                fenced.map(HeadingLine::Release)
            } else {
                Some(parse_heading_line(index + 1, line)?)
            };

            let Some(heading) = heading else {
                if let Some((_, content)) = current.as_mut() {
                    content.push(line);
                }
                continue;
            };

            if let Some((heading, content)) = current.take() {
                entries.push(finish_entry(heading, &content));
            }

            match heading {
                HeadingLine::Release(heading) => current = Some((heading, Vec::new())),
                HeadingLine::Foreign => {}
            }
        }

        if let Some((heading, content)) = current.take() {
            entries.push(finish_entry(heading, &content));
        }

        debug!(count = entries.len(), "parsed release PR body");
        Ok(entries)
    }
}

fn finish_entry(heading: ReleaseHeading, lines: &[&str]) -> PackageChangelogEntry {
    PackageChangelogEntry {
        heading,
        content: lines.join("\n").trim().to_string(),
    }
}

/// `(name, old, new)` of an h2 text shaped like `[[@scope/]name@]old➡️new`
///
/// Versions only need to start with a digit here; whether they parse is
/// checked separately.
fn release_shape(text: &str) -> Option<(Option<&str>, &str, &str)> {
    if text.contains(char::is_whitespace) {
        return None;
    }

    let (left, new_version) = text.split_once(VERSION_ARROW)?;
    let (package_name, old_version) = match left.rsplit_once('@') {
        Some((name, version)) if is_package_name(name) => (Some(name), version),
        Some(_) => return None,
        None => (None, left),
    };

    let starts_with_digit = |v: &str| v.starts_with(|c: char| c.is_ascii_digit());
    if !starts_with_digit(old_version) || !starts_with_digit(new_version) {
        return None;
    }

    Some((package_name, old_version, new_version))
}

/// `name` or `@scope/name`
fn is_package_name(name: &str) -> bool {
    let bare = match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, rest)) if !scope.is_empty() => rest,
            _ => return false,
        },
        None => name,
    };
    !bare.is_empty() && !bare.contains(['@', '/'])
}

/// A release heading with valid versions, read from inside a code block
fn fenced_release_heading(line: &str) -> Option<ReleaseHeading> {
    let text = line.strip_prefix("## ")?.trim();
    let (package_name, old_version, new_version) = release_shape(text)?;
    if Version::parse(old_version).is_err() || Version::parse(new_version).is_err() {
        return None;
    }
    Some(ReleaseHeading {
        package_name: package_name.map(str::to_string),
        old_version: old_version.to_string(),
        new_version: new_version.to_string(),
    })
}

/// Classify an h2 line
fn parse_heading_line(line_number: usize, line: &str) -> Result<HeadingLine, ReleasePrError> {
    let text = line.strip_prefix("## ").unwrap_or(line).trim();

    let Some((package_name, old_version, new_version)) = release_shape(text) else {
        if text.contains(VERSION_ARROW) {
            warn!(line = line_number, heading = text, "skipping heading that is not a release heading");
        } else {
            debug!(line = line_number, heading = text, "skipping foreign heading");
        }
        return Ok(HeadingLine::Foreign);
    };

    for version in [old_version, new_version] {
        if let Err(e) = Version::parse(version) {
            return Err(ReleasePrError::InvalidHeading {
                line: line_number,
                heading: line.to_string(),
                reason: format!("'{}' is not a valid version: {}", version, e),
            });
        }
    }

    Ok(HeadingLine::Release(ReleaseHeading {
        package_name: package_name.map(str::to_string),
        old_version: old_version.to_string(),
        new_version: new_version.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SemverAggregator;
    use crate::extractor::ChangelogExtractor;
    use crate::formatter::ChangelogRenderer;
    use crate::types::{ChangelogEntry, Contributor};
    use liftoff_core::commit_types::TypeTable;
    use liftoff_core::config::TagConfig;
    use liftoff_core::types::{PackageInfo, SemverBump};
    use liftoff_git::Commit;

    const RELEASE_ID: &str = "[release-action]";

    fn entry(commit_type: &str, description: &str, packages: &[&str], bump: SemverBump) -> ChangelogEntry {
        ChangelogEntry {
            commit_type: commit_type.to_string(),
            description: description.to_string(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
            is_breaking_change: false,
            semver_bump: bump,
            has_explicit_version_bump: false,
        }
    }

    #[test]
    fn test_round_trip() {
        let table = TypeTable::default();
        let tags = TagConfig::default();
        let packages = vec![
            PackageInfo::new("monorepo", "1.0.0", "").root(),
            PackageInfo::new("@acme/ui", "0.4.2", "packages/ui"),
            PackageInfo::new("@acme/app", "2.0.0", "packages/app")
                .with_dependencies(vec!["@acme/ui".to_string()]),
        ];
        let mut breaking = entry("refactor", "Rename props (#12)", &["ui"], SemverBump::Major);
        breaking.is_breaking_change = true;
        let entries = vec![
            entry("fix", "Fix focus ring", &["ui"], SemverBump::Patch),
            entry("docs", "Update readme", &[], SemverBump::Patch),
            breaking,
        ];

        let plan = SemverAggregator::new(&table).aggregate(&entries, &packages);
        let renderer = ChangelogRenderer::new(&tags).with_repository(Some("acme/web"));
        let contributors = vec![Contributor {
            username: "jane".to_string(),
            name: Some("Jane".to_string()),
            email: None,
        }];
        let body = append_release_marker(&renderer.render(&plan, &contributors), RELEASE_ID);

        let parsed = ChangelogParser::new(RELEASE_ID).parse(&body).unwrap();
        assert_eq!(parsed.len(), 3);

        for release in &plan.direct {
            let found = parsed
                .iter()
                .find(|p| match &p.heading.package_name {
                    Some(name) => *name == release.package.name,
                    None => release.package.is_root,
                })
                .unwrap();
            assert_eq!(found.heading.old_version, release.package.version);
            assert_eq!(found.heading.new_version, release.new_version());
            assert_eq!(found.content, renderer.render_package_content(release));
        }

        let root = parsed.iter().find(|p| p.heading.is_root()).unwrap();
        assert_eq!(root.heading.new_version, "1.0.1");

        let app = &parsed[2];
        assert_eq!(app.heading.package_name.as_deref(), Some("@acme/app"));
        assert!(app.content.ends_with("📦 Updated due to dependency changes"));
        assert!(!app.content.contains("Contributors"));
    }

    #[test]
    fn test_foreign_headings_are_skipped() {
        let body = "# 👉 Changelog

## Notes from the team
Please review carefully.

## pkg-a@1.0.0➡️1.1.0

### 🚀 New Features
- Add X

## See also ➡️ docs
whatever

## ➡️
nothing

## Before➡️After
human notes

## @1.0.0➡️2.0.0
## @acme/ui/extra@1.0.0➡️2.0.0";

        let parsed = ChangelogParser::new(RELEASE_ID).parse(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].heading.package_name.as_deref(), Some("pkg-a"));
        assert_eq!(parsed[0].content, "### 🚀 New Features\n- Add X");
    }

    #[test]
    fn test_fenced_headings_are_content() {
        let body = "## 1.0.0➡️1.0.1

```md
## pkg@9.9.9➡️oops
```";

        let parsed = ChangelogParser::new(RELEASE_ID).parse(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].heading.is_root());
        assert!(parsed[0].content.contains("## pkg@9.9.9➡️oops"));
    }

    #[test]
    fn test_fenced_foreign_headings_stay_content() {
        let body = "## pkg-a@1.0.0➡️1.1.0\n\n```md\n## Usage\n## Before➡️After\n## pkg@1.0➡️2\n```\n\n## pkg-b@2.0.0➡️2.0.1\n\n- Fix Y";

        let parsed = ChangelogParser::new(RELEASE_ID).parse(body).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].content.contains("## Usage"));
        assert!(parsed[0].content.ends_with("```"));
        assert_eq!(parsed[1].content, "- Fix Y");
    }

    #[test]
    fn test_unclosed_fence_does_not_hide_next_package() {
        let body = "## pkg-a@1.0.0➡️1.1.0\n\n- Add X\n```js\nconst a = 1;\n\n## pkg-b@2.0.0➡️2.0.1\n\n- Fix Y\n\n## ❤️ Contributors\n- Jane (@jane)";

        let parsed = ChangelogParser::new(RELEASE_ID).parse(body).unwrap();
        let names: Vec<Option<&str>> = parsed
            .iter()
            .map(|p| p.heading.package_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("pkg-a"), Some("pkg-b")]);
        assert_eq!(parsed[1].content, "- Fix Y");
    }

    #[test]
    fn test_unclosed_fence_in_commit_round_trips() {
        let table = TypeTable::default();
        let tags = TagConfig::default();
        let packages = vec![
            PackageInfo::new("pkg-a", "1.0.0", "packages/pkg-a"),
            PackageInfo::new("pkg-b", "2.0.0", "packages/pkg-b"),
        ];
        let commits = vec![
            Commit::new("a1", "jane", "jane@example.com", "feat(pkg-a): add X")
                .with_body("## Changelog\n- feat(pkg-a): add X\n```js\nconst a = 1;"),
            Commit::new("b2", "jane", "jane@example.com", "fix(pkg-b): fix Y"),
        ];

        let entries = ChangelogExtractor::new(&table).extract_all(&commits);
        let plan = SemverAggregator::new(&table).aggregate(&entries, &packages);
        let body = append_release_marker(&ChangelogRenderer::new(&tags).render(&plan, &[]), RELEASE_ID);

        let parsed = ChangelogParser::new(RELEASE_ID).parse(&body).unwrap();
        assert_eq!(plan.direct.len(), 2);
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].content.ends_with("const a = 1;\n```"));
        assert_eq!(parsed[1].heading.package_name.as_deref(), Some("pkg-b"));
        assert_eq!(parsed[1].heading.new_version, "2.0.1");
    }

    #[test]
    fn test_invalid_version_is_fatal() {
        let body = "# 👉 Changelog\n\n## pkg-a@1.0➡️1.1.0\n\n- text";

        let err = ChangelogParser::new(RELEASE_ID).parse(body).unwrap_err();
        match err {
            ReleasePrError::InvalidHeading { line, heading, .. } => {
                assert_eq!(line, 3);
                assert_eq!(heading, "## pkg-a@1.0➡️1.1.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marker_schema() {
        let body = append_release_marker("# 👉 Changelog\n\n", RELEASE_ID);
        assert_eq!(
            body,
            "# 👉 Changelog\n\n<!-- Release PR: [release-action] schema=1 -->"
        );
        assert!(has_release_marker(&body, RELEASE_ID));
        assert!(!has_release_marker(&body, "[other]"));
        assert_eq!(strip_release_marker(&body, RELEASE_ID).unwrap(), "# 👉 Changelog");

        let legacy = "## 1.0.0➡️1.0.1\n\n- a\n\n<!-- Release PR: [release-action] -->";
        assert!(has_release_marker(legacy, RELEASE_ID));
        let parsed = ChangelogParser::new(RELEASE_ID).parse(legacy).unwrap();
        assert_eq!(parsed[0].content, "- a");

        let future = "## 1.0.0➡️1.0.1\n\n<!-- Release PR: [release-action] schema=2 -->";
        let err = ChangelogParser::new(RELEASE_ID).parse(future).unwrap_err();
        assert!(matches!(
            err,
            ReleasePrError::UnsupportedSchema {
                found: 2,
                supported: 1
            }
        ));
    }
}
