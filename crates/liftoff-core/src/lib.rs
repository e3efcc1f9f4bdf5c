//! Liftoff Core - Core library for release PR automation
//!
//! This crate provides the foundational types, error handling, configuration,
//! commit type table and monorepo model shared by the changelog pipeline.

pub mod commit_types;
pub mod config;
pub mod error;
pub mod monorepo;
pub mod types;

pub use commit_types::{default_types, has_changelog_section, CommitTypeSpec, TypeTable};
pub use config::Config;
pub use error::{LiftoffError, Result};
pub use types::{unscoped_name, PackageInfo, SemverBump};
