//! Changelog extraction from commits

mod conventional;
mod section;

pub use conventional::{explicit_bump, parse_commit_type, split_item, CommitTypeParts};
pub(crate) use section::FenceTracker;
pub use section::{changelog_items, changelog_section};

use tracing::{debug, instrument, warn};

use liftoff_core::commit_types::TypeTable;
use liftoff_core::types::SemverBump;
use liftoff_git::{is_revert_commit, Commit};

use crate::types::ChangelogEntry;

/// Extracts structured changelog entries from commits
pub struct ChangelogExtractor<'a> {
    types: &'a TypeTable,
}

impl<'a> ChangelogExtractor<'a> {
    /// Create an extractor backed by a type table
    pub fn new(types: &'a TypeTable) -> Self {
        Self { types }
    }

    /// Entries of all commits, in commit order
    #[instrument(skip_all, fields(commit_count = commits.len()))]
    pub fn extract_all(&self, commits: &[Commit]) -> Vec<ChangelogEntry> {
        let entries: Vec<ChangelogEntry> = commits.iter().flat_map(|c| self.extract(c)).collect();
        debug!(entry_count = entries.len(), "extracted changelog entries");
        entries
    }

    /// Entries of one commit
    ///
    /// The items of the body's `## Changelog` section when present,
    /// otherwise the subject line alone.
    pub fn extract(&self, commit: &Commit) -> Vec<ChangelogEntry> {
        match changelog_section(&commit.body) {
            Some(section) => changelog_items(&section)
                .iter()
                .filter_map(|item| self.parse_item(item))
                .collect(),
            None => self.parse_item(&commit.subject).into_iter().collect(),
        }
    }

    /// Parse a single changelog item
    ///
    /// Items that are not `type(scope): description` with a known type, and
    /// revert items, yield nothing.
    pub fn parse_item(&self, item: &str) -> Option<ChangelogEntry> {
        let item = item.trim();

        if is_revert_item(item) {
            debug!(item, "skipping revert item");
            return None;
        }

        let Some((commit_type, description)) = split_item(item) else {
            warn!(item, "changelog item has no type prefix, skipping");
            return None;
        };

        let Some(parts) = parse_commit_type(commit_type) else {
            warn!(item, "changelog item type cannot be parsed, skipping");
            return None;
        };

        let Some(type_def) = self.types.get(&parts.commit_type) else {
            warn!(item, commit_type = %parts.commit_type, "unknown commit type, skipping");
            return None;
        };

        if description.is_empty() {
            warn!(item, "changelog item has no description, skipping");
            return None;
        }

        let explicit = explicit_bump(description);
        let semver_bump = if parts.is_breaking_change {
            SemverBump::Major
        } else {
            explicit.unwrap_or(type_def.bump)
        };

        Some(ChangelogEntry {
            commit_type: parts.commit_type,
            description: conventional::capitalize(description),
            packages: parts.packages,
            is_breaking_change: parts.is_breaking_change,
            semver_bump,
            has_explicit_version_bump: explicit.is_some(),
        })
    }
}

/// Whether a changelog item records a revert rather than a change
fn is_revert_item(item: &str) -> bool {
    let lower = item.to_lowercase();
    is_revert_commit(item, item) || lower.starts_with("revert:") || lower.starts_with("revert(")
}

/// Whether a pull request title is acceptable
///
/// The configured release PR title is always accepted; any other title must
/// be a conventional commit line with a known type.
pub fn validate_pr_title(title: &str, types: &TypeTable, release_title: &str) -> bool {
    let title = title.trim();
    title == release_title.trim() || types.is_conventional(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_subject(subject: &str) -> Vec<ChangelogEntry> {
        let table = TypeTable::default();
        let commit = Commit::new("abc1234", "testuser", "", subject);
        ChangelogExtractor::new(&table).extract(&commit)
    }

    #[test]
    fn test_extract_from_changelog_section() {
        let table = TypeTable::default();
        let commit = Commit::new("123456", "testuser", "", "feat(package-a): Some description")
            .with_body(
                "## Changelog
        - feat(package-a): Some description
        - chore(package-a,package-b): Some description 2",
            );

        let entries = ChangelogExtractor::new(&table).extract_all(&[commit]);
        assert_eq!(
            entries,
            vec![
                ChangelogEntry {
                    commit_type: "feat".to_string(),
                    description: "Some description".to_string(),
                    packages: vec!["package-a".to_string()],
                    is_breaking_change: false,
                    semver_bump: SemverBump::Minor,
                    has_explicit_version_bump: false,
                },
                ChangelogEntry {
                    commit_type: "chore".to_string(),
                    description: "Some description 2".to_string(),
                    packages: vec!["package-a".to_string(), "package-b".to_string()],
                    is_breaking_change: false,
                    semver_bump: SemverBump::Patch,
                    has_explicit_version_bump: false,
                },
            ]
        );
    }

    #[test]
    fn test_extract_from_subject() {
        let entries = extract_subject("feat(components): test using directory name");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Test using directory name");
        assert_eq!(entries[0].packages, vec!["components"]);
        assert_eq!(entries[0].semver_bump, SemverBump::Minor);
    }

    #[test]
    fn test_explicit_version_bump() {
        let entries = extract_subject("feat(components): some test #major");
        assert_eq!(entries[0].description, "Some test #major");
        assert_eq!(entries[0].semver_bump, SemverBump::Major);
        assert!(entries[0].has_explicit_version_bump);
        assert!(!entries[0].is_breaking_change);

        let chore = extract_subject("chore(pkg-a): cleanup #major");
        assert_eq!(chore[0].semver_bump, SemverBump::Major);
    }

    #[test]
    fn test_breaking_wins_over_explicit_bump() {
        let entries = extract_subject("fix(api)!: drop endpoint #patch");
        assert!(entries[0].is_breaking_change);
        assert_eq!(entries[0].semver_bump, SemverBump::Major);
        assert!(entries[0].has_explicit_version_bump);
    }

    #[test]
    fn test_unscoped_item_targets_root() {
        let entries = extract_subject("fix: correct typo (#12)");
        assert!(entries[0].packages.is_empty());
        assert_eq!(entries[0].description, "Correct typo (#12)");
    }

    #[test]
    fn test_skipped_items() {
        assert!(extract_subject("Merge branch 'main'").is_empty());
        assert!(extract_subject("wip(ui): unknown type").is_empty());
        assert!(extract_subject("feat(ui):").is_empty());

        let table = TypeTable::default();
        let commit = Commit::new("a", "b", "", "chore: misc").with_body(
            "## Changelog\n- Revert \"feat(ui): add table\"\n- revert: undo thing\n- fix(ui): keep this",
        );
        let entries = ChangelogExtractor::new(&table).extract(&commit);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Keep this");
    }

    #[test]
    fn test_multiline_item_keeps_code_block() {
        let table = TypeTable::default();
        let commit = Commit::new("a", "b", "", "feat: x").with_body(
            "## Changelog\n- feat(ui): add table\n```html\n<ds-table></ds-table>\n```\n- fix(ui): y",
        );
        let entries = ChangelogExtractor::new(&table).extract(&commit);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].description,
            "Add table\n```html\n<ds-table></ds-table>\n```"
        );
    }

    #[test]
    fn test_validate_pr_title() {
        let table = TypeTable::default();
        assert!(validate_pr_title("feat(ui): add table", &table, "Version Packages"));
        assert!(validate_pr_title("Version Packages", &table, "Version Packages"));
        assert!(!validate_pr_title("Add table", &table, "Version Packages"));
        assert!(!validate_pr_title("wip: later", &table, "Version Packages"));
    }
}
