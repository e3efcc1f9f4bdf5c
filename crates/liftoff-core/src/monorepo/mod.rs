//! Monorepo support for npm workspaces
//!
//! - Package discovery from the root manifest's workspace globs
//! - Dependency graph with transitive dependents and cycle detection
//! - Manifest version updates

pub mod discovery;
pub mod graph;
pub mod manifest;

pub use discovery::PackageDiscovery;
pub use graph::{DependencyGraph, PackageNode};
pub use manifest::{ManifestDocument, PackageJson, Workspaces};
