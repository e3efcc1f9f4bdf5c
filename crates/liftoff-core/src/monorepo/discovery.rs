//! Package discovery in npm workspaces

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, info, warn};

use crate::error::{ManifestError, Result};
use crate::types::PackageInfo;

use super::manifest::PackageJson;

const MANIFEST_NAME: &str = "package.json";

/// Discovers the root package and workspace members of a repository
pub struct PackageDiscovery {
    root: PathBuf,
}

impl PackageDiscovery {
    /// Create a discovery instance rooted at a repository directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover all packages
    ///
    /// The root package comes first, members follow sorted by path.
    /// Dependencies are narrowed to names of other discovered packages.
    pub fn discover(&self) -> Result<Vec<PackageInfo>> {
        let root_manifest = self.root.join(MANIFEST_NAME);
        let root = PackageJson::load(&root_manifest)?;

        let patterns: Vec<String> = root
            .workspaces
            .as_ref()
            .map(|w| w.patterns().to_vec())
            .unwrap_or_default();
        debug!(patterns = patterns.len(), "discovering packages");

        // First pass: load manifests
        let mut manifests: Vec<(PathBuf, PackageJson)> = vec![(PathBuf::new(), root)];
        let mut member_dirs: Vec<PathBuf> = Vec::new();

        for pattern in &patterns {
            member_dirs.extend(self.expand_pattern(pattern)?);
        }
        member_dirs.sort();
        member_dirs.dedup();

        for dir in member_dirs {
            let manifest_path = self.root.join(&dir).join(MANIFEST_NAME);
            if !manifest_path.exists() {
                continue;
            }
            match PackageJson::load(&manifest_path) {
                Ok(manifest) => manifests.push((dir, manifest)),
                Err(e) => warn!(path = %manifest_path.display(), error = %e, "skipping unreadable manifest"),
            }
        }

        // Second pass: resolve workspace dependencies
        let names: HashSet<String> = manifests.iter().map(|(_, m)| m.name.clone()).collect();
        let packages: Vec<PackageInfo> = manifests
            .into_iter()
            .enumerate()
            .map(|(index, (dir, manifest))| {
                let mut deps: Vec<String> = manifest
                    .all_dependency_names()
                    .filter(|d| names.contains(*d) && **d != manifest.name)
                    .cloned()
                    .collect();
                deps.sort();
                deps.dedup();

                let pkg = PackageInfo::new(manifest.name, manifest.version, dir)
                    .private(manifest.private)
                    .with_dependencies(deps);
                if index == 0 {
                    pkg.root()
                } else {
                    pkg
                }
            })
            .collect();

        info!(count = packages.len(), "discovered packages");
        Ok(packages)
    }

    /// Expand one workspace glob into member directories relative to the root
    fn expand_pattern(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = pattern.trim_start_matches("./");
        let full_pattern = self.root.join(pattern).to_string_lossy().to_string();

        let entries = glob(&full_pattern).map_err(|e| ManifestError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ManifestError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

            if !path.is_dir() || path.components().any(|c| c.as_os_str() == "node_modules") {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(&self.root) {
                if !relative.as_os_str().is_empty() {
                    dirs.push(relative.to_path_buf());
                }
            }
        }

        Ok(dirs)
    }
}
