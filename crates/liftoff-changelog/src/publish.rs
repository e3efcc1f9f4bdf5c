//! Publish planning from a parsed release PR body

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use liftoff_core::config::TagConfig;
use liftoff_core::types::PackageInfo;

use crate::types::PackageChangelogEntry;

/// A package to tag and publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRelease {
    /// Package name as found in the workspace
    pub name: String,
    /// Package directory, relative to the repository root
    pub path: std::path::PathBuf,
    /// Whether this is the root package
    pub is_root: bool,
    /// Version before the release
    pub old_version: String,
    /// Released version
    pub new_version: String,
    /// Git tag of the release
    pub tag: String,
    /// Changelog body of the release
    pub changelog: String,
}

/// Match parsed release headings to workspace packages
///
/// Headings naming no known package are logged and dropped, as are private
/// packages.
#[instrument(skip_all, fields(entries = entries.len(), packages = packages.len()))]
pub fn plan_publish(
    entries: &[PackageChangelogEntry],
    packages: &[PackageInfo],
    tags: &TagConfig,
) -> Vec<PlannedRelease> {
    let mut planned = Vec::new();

    for entry in entries {
        let heading = &entry.heading;
        let package = packages.iter().find(|p| match &heading.package_name {
            Some(name) => p.matches_name(name),
            None => p.is_root,
        });

        let Some(package) = package else {
            warn!(package = ?heading.package_name, "release heading names no workspace package, skipping");
            continue;
        };

        if package.is_private {
            debug!(package = %package.name, "skipping private package");
            continue;
        }

        planned.push(PlannedRelease {
            name: package.name.clone(),
            path: package.path.clone(),
            is_root: package.is_root,
            old_version: heading.old_version.clone(),
            new_version: heading.new_version.clone(),
            tag: tags.package_tag(package, &heading.new_version),
            changelog: entry.content.clone(),
        });
    }

    info!(count = planned.len(), "publish plan computed");
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReleaseHeading;

    fn parsed(name: Option<&str>, old: &str, new: &str) -> PackageChangelogEntry {
        PackageChangelogEntry {
            heading: ReleaseHeading {
                package_name: name.map(str::to_string),
                old_version: old.to_string(),
                new_version: new.to_string(),
            },
            content: "### 🐛 Bug Fixes\n- Fix".to_string(),
        }
    }

    #[test]
    fn test_plan_publish() {
        let packages = vec![
            PackageInfo::new("monorepo", "1.0.0", "").root(),
            PackageInfo::new("@acme/ui", "1.0.0", "packages/ui"),
            PackageInfo::new("@acme/docs", "1.0.0", "packages/docs").private(true),
            PackageInfo::new("tools", "3.0.0", "packages/tools"),
        ];
        let entries = vec![
            parsed(Some("@acme/ui"), "1.0.0", "1.1.0"),
            parsed(None, "1.0.0", "1.0.1"),
            parsed(Some("@acme/docs"), "1.0.0", "1.0.1"),
            parsed(Some("removed"), "0.1.0", "0.1.1"),
            parsed(Some("tools"), "3.0.0", "4.0.0"),
        ];

        let plan = plan_publish(&entries, &packages, &TagConfig::default());
        let tags: Vec<&str> = plan.iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["ui@1.1.0", "v1.0.1", "tools@4.0.0"]);
        assert!(plan[1].is_root);
        assert_eq!(plan[0].changelog, "### 🐛 Bug Fixes\n- Fix");
    }

    #[test]
    fn test_unscoped_heading_matches_scoped_package() {
        let packages = vec![PackageInfo::new("@acme/ui", "1.0.0", "packages/ui")];
        let plan = plan_publish(&[parsed(Some("ui"), "1.0.0", "1.0.1")], &packages, &TagConfig::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name, "@acme/ui");
    }
}
