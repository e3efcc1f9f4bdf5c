//! Core types for liftoff

use std::path::{Path, PathBuf};

use semver::{Prerelease, Version};
use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Magnitude of a version increment
///
/// Variants are ordered by severity so that `max()` over a set of bumps
/// yields the bump that must be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemverBump {
    /// Patch version bump (fixes, chores)
    Patch,
    /// Minor version bump (new features)
    Minor,
    /// Major version bump (breaking changes)
    Major,
}

impl SemverBump {
    /// Returns the string representation of the bump
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }

    /// Apply this bump to a version
    ///
    /// On a prerelease, a bump that the prerelease already anticipates only
    /// drops the prerelease tag: `2.0.0-rc.1` major is `2.0.0`, `1.3.0-beta.1`
    /// minor is `1.3.0`, and any patch bump of `1.2.4-x` is `1.2.4`.
    pub fn apply(&self, current: &Version) -> Version {
        let mut next = current.clone();
        let pre = !current.pre.is_empty();

        match self {
            Self::Major => {
                if !(pre && current.minor == 0 && current.patch == 0) {
                    next.major += 1;
                }
                next.minor = 0;
                next.patch = 0;
            }
            Self::Minor => {
                if !(pre && current.patch == 0) {
                    next.minor += 1;
                }
                next.patch = 0;
            }
            Self::Patch => {
                if !pre {
                    next.patch += 1;
                }
            }
        }

        next.pre = Prerelease::EMPTY;
        next.build = semver::BuildMetadata::EMPTY;
        next
    }

    /// Parse a version string and apply this bump to it
    pub fn bump_str(&self, current: &str) -> Result<String, VersionError> {
        let trimmed = current.strip_prefix('v').unwrap_or(current);
        let version = Version::parse(trimmed)
            .map_err(|e| VersionError::ParseFailed(current.to_string(), e.to_string()))?;
        Ok(self.apply(&version).to_string())
    }
}

impl std::fmt::Display for SemverBump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SemverBump {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(VersionError::InvalidBumpType(s.to_string())),
        }
    }
}

/// One publishable unit: the root package or a workspace member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package name, possibly scoped (`@scope/name`)
    pub name: String,
    /// Current version
    pub version: String,
    /// Version computed for this release
    pub new_version: Option<String>,
    /// Package directory, relative to the repository root
    pub path: PathBuf,
    /// Whether this is the repository root package
    pub is_root: bool,
    /// Whether the package is marked private
    pub is_private: bool,
    /// Names of workspace packages this package depends on
    pub dependencies: Vec<String>,
}

impl PackageInfo {
    /// Create a new package description
    pub fn new(name: impl Into<String>, version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            new_version: None,
            path: path.into(),
            is_root: false,
            is_private: false,
            dependencies: Vec::new(),
        }
    }

    /// Mark as the root package
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Mark as private
    pub fn private(mut self, private: bool) -> Self {
        self.is_private = private;
        self
    }

    /// Set workspace dependencies
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    /// Package name without its `@scope/` prefix
    pub fn unscoped_name(&self) -> &str {
        unscoped_name(&self.name)
    }

    /// Name of the package directory
    ///
    /// Accepts paths pointing at the directory or at its `package.json`.
    pub fn directory_name(&self) -> Option<&str> {
        let dir = if self.path.file_name().is_some_and(|f| f == "package.json") {
            self.path.parent().unwrap_or(Path::new(""))
        } else {
            self.path.as_path()
        };
        dir.file_name().and_then(|n| n.to_str())
    }

    /// Whether a changelog scope refers to this package
    pub fn matches_scope(&self, scope: &str) -> bool {
        scope == self.unscoped_name() || self.directory_name() == Some(scope)
    }

    /// Whether a name from a release heading refers to this package
    pub fn matches_name(&self, name: &str) -> bool {
        name == self.name || name == self.unscoped_name()
    }
}

/// Strip an npm `@scope/` prefix from a package name
pub fn unscoped_name(name: &str) -> &str {
    match name.strip_prefix('@') {
        Some(rest) => rest.split_once('/').map(|(_, n)| n).unwrap_or(name),
        None => name,
    }
}
