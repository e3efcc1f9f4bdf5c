//! Liftoff Changelog - changelog extraction and release PR rendering
//!
//! Turns classified commits into per-package releases, renders them as a
//! release PR body and reads that body back when publishing.

pub mod aggregator;
pub mod contributors;
pub mod extractor;
pub mod formatter;
pub mod publish;
pub mod release_pr;
pub mod types;

pub use aggregator::{ReleasePlan, SemverAggregator};
pub use contributors::{collect_contributors, resolve_contributors, UserLookup};
pub use extractor::{validate_pr_title, ChangelogExtractor};
pub use formatter::{ChangelogRenderer, GitHubLinks};
pub use publish::{plan_publish, PlannedRelease};
pub use release_pr::{append_release_marker, has_release_marker, ChangelogParser};
pub use types::{ChangelogEntry, Contributor, PackageChangelogEntry, PackageRelease, ReleaseHeading, Section};
