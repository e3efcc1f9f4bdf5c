//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commit_types::{default_types, CommitTypeSpec, TypeTable};
use crate::types::PackageInfo;

/// Main configuration for liftoff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository slug (`owner/repo`) used for links
    pub repository: Option<String>,

    /// Release PR configuration
    pub release: ReleaseConfig,

    /// Tag naming configuration
    pub tags: TagConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Contributor credit configuration
    pub contributors: ContributorsConfig,
}

impl Config {
    /// Build the commit type table for this configuration
    pub fn type_table(&self) -> TypeTable {
        TypeTable::new(self.changelog.types.clone())
    }
}

/// Release PR configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Token embedded in release commits and the PR marker comment
    pub release_id: String,

    /// Branch releases are cut from
    pub default_branch: String,

    /// Branch holding the pending release
    pub release_branch: String,

    /// Title of the release pull request
    pub pr_title: String,

    /// Oldest commit to consider (`<end>^..HEAD`)
    pub end_commit: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            release_id: "[release-action]".to_string(),
            default_branch: "main".to_string(),
            release_branch: "release/main".to_string(),
            pr_title: "Version Packages".to_string(),
            end_commit: None,
        }
    }
}

/// Tag naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Tag format for the root package
    pub root_format: String,

    /// Tag format for workspace packages; `{name}` is the unscoped name
    pub package_format: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            root_format: "v{version}".to_string(),
            package_format: "{name}@{version}".to_string(),
        }
    }
}

impl TagConfig {
    /// Tag name for a package at a version
    pub fn tag_name(&self, unscoped_name: &str, version: &str, is_root: bool) -> String {
        let format = if is_root {
            &self.root_format
        } else {
            &self.package_format
        };
        format
            .replace("{name}", unscoped_name)
            .replace("{version}", version)
    }

    /// Tag name of a package at a version
    pub fn package_tag(&self, package: &PackageInfo, version: &str) -> String {
        self.tag_name(package.unscoped_name(), version, package.is_root)
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Document title of the release PR body
    pub title: String,

    /// Per-package changelog file name
    pub file: PathBuf,

    /// Commit type table, in section order
    pub types: Vec<CommitTypeSpec>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            title: "👉 Changelog".to_string(),
            file: PathBuf::from("CHANGELOG.md"),
            types: default_types(),
        }
    }
}

/// Contributor credit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorsConfig {
    /// Whether to credit contributors in the release PR
    pub enabled: bool,

    /// Base URL of the user lookup service
    pub lookup_url: String,
}

impl Default for ContributorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookup_url: "https://ungh.cc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name() {
        let tags = TagConfig::default();
        assert_eq!(tags.tag_name("widgets", "1.2.0", false), "widgets@1.2.0");
        assert_eq!(tags.tag_name("monorepo", "1.2.0", true), "v1.2.0");

        let scoped = PackageInfo::new("@acme/widgets", "1.0.0", "packages/widgets");
        assert_eq!(tags.package_tag(&scoped, "1.0.0"), "widgets@1.0.0");
    }

    #[test]
    fn test_type_table_from_config() {
        let config = Config::default();
        let table = config.type_table();
        assert!(table.contains("feat"));
        assert!(table.rank("feat") < table.rank("chore"));
    }
}
