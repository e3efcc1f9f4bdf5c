//! Error types for liftoff

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LiftoffError
pub type Result<T> = std::result::Result<T, LiftoffError>;

/// Main error type for liftoff operations
#[derive(Debug, Error)]
pub enum LiftoffError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Commit log wire format errors
    #[error(transparent)]
    LogFormat(#[from] LogFormatError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Release PR body errors
    #[error(transparent)]
    ReleasePr(#[from] ReleasePrError),

    /// Package manifest errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Errors raised while tokenizing separator-delimited `git log` output
#[derive(Debug, Error)]
pub enum LogFormatError {
    /// A field separator is missing from a record
    #[error("Commit record {record} is missing separator {token}")]
    MissingSeparator { record: usize, token: &'static str },

    /// A separator token appears inside free-text content
    #[error("Commit record {record} contains separator {token} inside its content")]
    SeparatorCollision { record: usize, token: &'static str },
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid bump type
    #[error("Invalid bump type: {0}")]
    InvalidBumpType(String),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a persisted release PR body
#[derive(Debug, Error)]
pub enum ReleasePrError {
    /// A generated-looking heading whose contents cannot be parsed
    #[error("Invalid release heading on line {line} ('{heading}'): {reason}")]
    InvalidHeading {
        line: usize,
        heading: String,
        reason: String,
    },

    /// The document was written by an incompatible schema
    #[error("Release PR body uses schema {found}, this version understands schema {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
}

/// Package manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Package manifest not found
    #[error("Package manifest not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse manifest
    #[error("Failed to parse manifest {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// Failed to update manifest
    #[error("Failed to update manifest {path}: {reason}")]
    UpdateError { path: PathBuf, reason: String },

    /// Invalid workspace glob
    #[error("Invalid workspace pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
