//! Liftoff Git - Commit history for release management
//!
//! This crate reads the commit log, either natively through git2 or from the
//! separator-delimited textual format, and classifies it into the commits
//! that make up the next release.

pub mod classify;
mod commits;
pub mod log;
mod repository;
pub mod types;

pub use classify::{is_revert_commit, CommitClassifier};
pub use commits::is_release_commit;
pub use log::{git_log_args, parse_git_log};
pub use repository::{GitRepo, Result};
pub use types::Commit;
