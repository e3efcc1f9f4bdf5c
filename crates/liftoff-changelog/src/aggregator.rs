//! Per-package release aggregation

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use liftoff_core::commit_types::TypeTable;
use liftoff_core::monorepo::DependencyGraph;
use liftoff_core::types::{PackageInfo, SemverBump};

use crate::types::{ChangelogEntry, PackageRelease, Section};

/// The packages a release moves and how
#[derive(Debug, Clone, Default)]
pub struct ReleasePlan {
    /// Packages targeted by at least one changelog entry
    pub direct: Vec<PackageRelease>,
    /// Packages bumped only because a dependency moved
    pub indirect: Vec<PackageInfo>,
}

impl ReleasePlan {
    /// Check if nothing is released
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.indirect.is_empty()
    }

    /// Every package that changes version, direct packages first
    pub fn packages(&self) -> impl Iterator<Item = &PackageInfo> {
        self.direct
            .iter()
            .map(|r| &r.package)
            .chain(self.indirect.iter())
    }
}

/// Merges changelog entries into per-package releases
pub struct SemverAggregator<'a> {
    types: &'a TypeTable,
}

impl<'a> SemverAggregator<'a> {
    /// Create an aggregator backed by a type table
    pub fn new(types: &'a TypeTable) -> Self {
        Self { types }
    }

    /// Compute the release plan for a set of packages
    ///
    /// A package whose version cannot be parsed is logged and left out; the
    /// rest of the plan is unaffected.
    #[instrument(skip_all, fields(entry_count = entries.len(), package_count = packages.len()))]
    pub fn aggregate(&self, entries: &[ChangelogEntry], packages: &[PackageInfo]) -> ReleasePlan {
        let mut plan = ReleasePlan::default();

        for package in packages {
            let selected: Vec<&ChangelogEntry> =
                entries.iter().filter(|e| e.targets(package)).collect();

            let Some(bump) = selected.iter().map(|e| e.semver_bump).max() else {
                continue;
            };

            match bump.bump_str(&package.version) {
                Ok(new_version) => {
                    debug!(package = %package.name, %bump, from = %package.version, to = %new_version, "computed direct release");
                    let mut package = package.clone();
                    package.new_version = Some(new_version);
                    plan.direct.push(self.build_release(package, bump, &selected));
                }
                Err(e) => warn!(package = %package.name, error = %e, "cannot bump package, skipping"),
            }
        }

        plan.indirect = self.indirect_packages(&plan.direct, packages);

        info!(
            direct = plan.direct.len(),
            indirect = plan.indirect.len(),
            "release plan computed"
        );
        plan
    }

    fn build_release(
        &self,
        package: PackageInfo,
        bump: SemverBump,
        entries: &[&ChangelogEntry],
    ) -> PackageRelease {
        let breaking_changes: Vec<ChangelogEntry> = entries
            .iter()
            .filter(|e| e.is_breaking_change)
            .map(|e| (*e).clone())
            .collect();

        let mut sections: Vec<Section> = Vec::new();
        for entry in entries.iter().filter(|e| !e.is_breaking_change) {
            match sections.iter_mut().find(|s| s.commit_type == entry.commit_type) {
                Some(section) => section.entries.push((*entry).clone()),
                None => {
                    let heading = self
                        .types
                        .get(&entry.commit_type)
                        .map(|t| t.heading())
                        .unwrap_or_else(|| entry.commit_type.clone());
                    let mut section = Section::new(&entry.commit_type, heading);
                    section.entries.push((*entry).clone());
                    sections.push(section);
                }
            }
        }

        sections.sort_by_key(|s| self.types.rank(&s.commit_type));

        PackageRelease {
            package,
            bump,
            breaking_changes,
            sections,
        }
    }

    /// Dependents of directly released packages, bumped by a patch
    fn indirect_packages(&self, direct: &[PackageRelease], packages: &[PackageInfo]) -> Vec<PackageInfo> {
        if direct.is_empty() {
            return Vec::new();
        }

        let graph = DependencyGraph::build(packages);
        for cycle in graph.cycles() {
            warn!(packages = %cycle.join(", "), "circular workspace dependencies");
        }
        let direct_names: HashSet<&str> = direct.iter().map(|r| r.package.name.as_str()).collect();

        let mut affected: HashSet<String> = HashSet::new();
        for release in direct {
            affected.extend(graph.get_affected(&release.package.name));
        }

        packages
            .iter()
            .filter(|p| affected.contains(&p.name) && !direct_names.contains(p.name.as_str()))
            .filter_map(|p| match SemverBump::Patch.bump_str(&p.version) {
                Ok(new_version) => {
                    debug!(package = %p.name, to = %new_version, "dependency refresh release");
                    let mut package = p.clone();
                    package.new_version = Some(new_version);
                    Some(package)
                }
                Err(e) => {
                    warn!(package = %p.name, error = %e, "cannot bump dependent package, skipping");
                    None
                }
            })
            .collect()
    }
}
