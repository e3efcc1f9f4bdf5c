//! npm package.json handling

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ManifestError, Result};

/// Dependency tables that may reference other workspace packages
pub const DEPENDENCY_FIELDS: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Workspaces declaration: either a list or `{ "packages": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    /// `"workspaces": ["packages/*"]`
    List(Vec<String>),
    /// `"workspaces": { "packages": ["packages/*"] }`
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    /// Glob patterns of member packages
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::List(patterns) => patterns,
            Self::Object { packages } => packages,
        }
    }
}

/// The fields of package.json the release pipeline reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    pub name: String,

    /// Package version
    #[serde(default = "default_version")]
    pub version: String,

    /// Whether package is private
    #[serde(default)]
    pub private: bool,

    /// Workspace member patterns (root only)
    pub workspaces: Option<Workspaces>,

    /// Dependencies
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Dev dependencies
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Peer dependencies
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

impl PackageJson {
    /// Load package.json from path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ManifestError::NotFound(path.to_path_buf()))?;

        serde_json::from_str(&content).map_err(|e| {
            ManifestError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Names of all declared dependencies, across every dependency table
    pub fn all_dependency_names(&self) -> impl Iterator<Item = &String> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .chain(self.peer_dependencies.keys())
    }
}

/// Editable package.json document preserving key order and unknown fields
pub struct ManifestDocument {
    path: PathBuf,
    value: Value,
}

impl ManifestDocument {
    /// Open a manifest for editing
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ManifestError::NotFound(path.to_path_buf()))?;
        let value = serde_json::from_str(&content).map_err(|e| ManifestError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            value,
        })
    }

    /// Set the package's own version
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        let object = self.value.as_object_mut().ok_or_else(|| ManifestError::UpdateError {
            path: self.path.clone(),
            reason: "manifest root is not an object".to_string(),
        })?;
        object.insert("version".to_string(), Value::String(version.to_string()));
        Ok(())
    }

    /// Point ranges on `dependency` at `version`, keeping the range prefix
    ///
    /// Returns whether anything changed. `workspace:` protocol ranges are
    /// left alone.
    pub fn update_dependency(&mut self, dependency: &str, version: &str) -> bool {
        let mut changed = false;

        for field in DEPENDENCY_FIELDS {
            let Some(range) = self
                .value
                .get_mut(field)
                .and_then(|deps| deps.get_mut(dependency))
            else {
                continue;
            };

            let Some(current) = range.as_str() else {
                continue;
            };

            if current.starts_with("workspace:") {
                continue;
            }

            let prefix: String = current
                .chars()
                .take_while(|c| matches!(c, '^' | '~' | '>' | '=' | '<'))
                .collect();
            let updated = format!("{}{}", prefix, version);

            if updated != current {
                debug!(dependency, field, from = current, to = %updated, "updating dependency range");
                *range = Value::String(updated);
                changed = true;
            }
        }

        changed
    }

    /// Write the manifest back with two-space indentation
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.value).map_err(|e| ManifestError::UpdateError {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        std::fs::write(&self.path, format!("{}\n", content)).map_err(|e| {
            ManifestError::UpdateError {
                path: self.path.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
