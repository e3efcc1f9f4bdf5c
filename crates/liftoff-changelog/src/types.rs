//! Changelog types

use serde::{Deserialize, Serialize};

use liftoff_core::types::{PackageInfo, SemverBump};

/// One changelog line extracted from a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Commit type (feat, fix, ...)
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Human readable description
    pub description: String,
    /// Targeted package scopes; empty means the root package
    pub packages: Vec<String>,
    /// Whether this is a breaking change
    pub is_breaking_change: bool,
    /// Bump implied by this entry
    pub semver_bump: SemverBump,
    /// Whether the bump came from a `#major`/`#minor`/`#patch` token
    pub has_explicit_version_bump: bool,
}

impl ChangelogEntry {
    /// Whether this entry applies to a package
    pub fn targets(&self, package: &PackageInfo) -> bool {
        if self.packages.is_empty() {
            return package.is_root;
        }
        self.packages.iter().any(|scope| package.matches_scope(scope))
    }
}

/// Entries of one commit type, rendered as one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Commit type key
    pub commit_type: String,
    /// Section heading text (`🚀 New Features`)
    pub heading: String,
    /// Entries in commit order
    pub entries: Vec<ChangelogEntry>,
}

impl Section {
    /// Create a new empty section
    pub fn new(commit_type: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            heading: heading.into(),
            entries: Vec::new(),
        }
    }

    /// Check if section is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A package with its computed release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRelease {
    /// The package, with `new_version` set
    pub package: PackageInfo,
    /// Applied bump
    pub bump: SemverBump,
    /// Breaking entries, rendered before every typed section
    pub breaking_changes: Vec<ChangelogEntry>,
    /// Non-breaking entries grouped by type, in type table order
    pub sections: Vec<Section>,
}

impl PackageRelease {
    /// Version this release moves to
    pub fn new_version(&self) -> &str {
        self.package
            .new_version
            .as_deref()
            .unwrap_or(&self.package.version)
    }

    /// Check if this release carries changelog content
    pub fn is_empty(&self) -> bool {
        self.breaking_changes.is_empty() && self.sections.iter().all(Section::is_empty)
    }
}

/// Parsed identity of one release heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseHeading {
    /// Package name with its scope re-joined; `None` for the root package
    pub package_name: Option<String>,
    /// Version before the release
    pub old_version: String,
    /// Version after the release
    pub new_version: String,
}

impl ReleaseHeading {
    /// Whether the heading belongs to the root package
    pub fn is_root(&self) -> bool {
        self.package_name.is_none()
    }
}

/// One package section of a release PR body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageChangelogEntry {
    /// Heading triple
    pub heading: ReleaseHeading,
    /// Section body, trimmed
    pub content: String,
}

/// A credited contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// GitHub username, or the commit author name until resolved
    pub username: String,
    /// Display name
    pub name: Option<String>,
    /// Commit email
    pub email: Option<String>,
}

impl Contributor {
    /// Whether this contributor is an automation account
    pub fn is_bot(&self) -> bool {
        self.username.contains("[bot]")
            || self.email.as_deref().is_some_and(|e| e.contains("[bot]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(packages: &[&str]) -> ChangelogEntry {
        ChangelogEntry {
            commit_type: "feat".to_string(),
            description: "Add thing".to_string(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
            is_breaking_change: false,
            semver_bump: SemverBump::Minor,
            has_explicit_version_bump: false,
        }
    }

    #[test]
    fn test_entry_targets() {
        let root = PackageInfo::new("monorepo", "1.0.0", "").root();
        let pkg = PackageInfo::new("@acme/components", "0.1.0", "packages/ui");

        assert!(entry(&[]).targets(&root));
        assert!(!entry(&[]).targets(&pkg));
        assert!(entry(&["components"]).targets(&pkg));
        assert!(entry(&["ui", "other"]).targets(&pkg));
        assert!(entry(&["monorepo"]).targets(&root));
        assert!(!entry(&["other"]).targets(&pkg));
    }

    #[test]
    fn test_contributor_is_bot() {
        let bot = Contributor {
            username: "renovate[bot]".to_string(),
            name: None,
            email: None,
        };
        let human = Contributor {
            username: "jane".to_string(),
            name: None,
            email: Some("jane@example.com".to_string()),
        };
        assert!(bot.is_bot());
        assert!(!human.is_bot());
    }

    #[test]
    fn test_entry_serializes_type_field() {
        let json = serde_json::to_string(&entry(&["a"])).unwrap();
        assert!(json.contains("\"type\":\"feat\""));
        assert!(json.contains("\"semver_bump\":\"minor\""));
    }
}
