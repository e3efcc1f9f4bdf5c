//! Commit classification
//!
//! Turns a raw newest-first commit log into the commits that belong in the
//! next release: reverts and the changes they undo are removed, the walk
//! stops at the previous release commit, and only commits that carry
//! changelog information survive.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use liftoff_core::commit_types::{has_changelog_section, TypeTable};

use crate::types::Commit;

/// Matches a `#123` issue or pull request reference
static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\d+").expect("Invalid regex"));

/// Whether a commit reverts an earlier change
pub fn is_revert_commit(subject: &str, body: &str) -> bool {
    subject.starts_with("Revert ") || body.starts_with("Reverts ")
}

/// First `#N` reference in a text
fn first_reference(text: &str) -> Option<&str> {
    REFERENCE_REGEX.find(text).map(|m| m.as_str())
}

/// Classifies a commit log into the effective commits of a release
pub struct CommitClassifier<'a> {
    types: &'a TypeTable,
    release_id: &'a str,
    ignore_latest: bool,
}

impl<'a> CommitClassifier<'a> {
    /// Create a classifier for the given type table and release marker
    pub fn new(types: &'a TypeTable, release_id: &'a str) -> Self {
        Self {
            types,
            release_id,
            ignore_latest: false,
        }
    }

    /// Drop the newest commit from consideration
    pub fn with_ignore_latest(mut self, ignore_latest: bool) -> Self {
        self.ignore_latest = ignore_latest;
        self
    }

    /// Classify a newest-first log
    ///
    /// Malformed records are logged and skipped; this never fails.
    #[instrument(skip_all, fields(commits = log.len(), ignore_latest = self.ignore_latest))]
    pub fn classify(&self, log: &[Commit]) -> Vec<Commit> {
        let reverted = self.collect_reverted(log);
        let recent = self.collect_recent(log, &reverted);

        let filtered: Vec<Commit> = recent
            .into_iter()
            .filter(|c| self.types.is_conventional(&c.subject) || has_changelog_section(&c.body))
            .collect();

        info!(count = filtered.len(), "classified commits since last release");
        filtered
    }

    fn considered<'c>(&self, log: &'c [Commit]) -> impl Iterator<Item = (usize, &'c Commit)> {
        let skip = usize::from(self.ignore_latest);
        log.iter().enumerate().skip(skip)
    }

    /// First pass: references undone by revert commits
    fn collect_reverted(&self, log: &[Commit]) -> HashSet<String> {
        let mut reverted = HashSet::new();

        for (_, commit) in self.considered(log) {
            if !is_revert_commit(&commit.subject, &commit.body) {
                continue;
            }

            if let Some(reference) = first_reference(&commit.body) {
                debug!(hash = %commit.hash, reference, "found revert commit, excluding reverted change");
                reverted.insert(reference.to_string());
            }
        }

        reverted
    }

    /// Second pass: commits newer than the last release, minus reverted work
    fn collect_recent(&self, log: &[Commit], reverted: &HashSet<String>) -> Vec<Commit> {
        let mut recent = Vec::new();

        for (index, commit) in self.considered(log) {
            let hash = commit.hash.trim();
            if hash.is_empty() {
                warn!(subject = %commit.subject, "no commit hash found, skipping");
                continue;
            }

            if reverted.contains(hash) {
                debug!(hash, "skipping reverted commit");
                continue;
            }

            let subject = commit.subject.trim();
            if subject.is_empty() {
                warn!(hash, "no commit subject found, skipping");
                continue;
            }

            let reference = first_reference(subject);
            if let Some(reference) = reference.filter(|r| reverted.contains(*r)) {
                debug!(hash, reference, "skipping commit with reverted reference");
                continue;
            }

            if !self.release_id.is_empty() && commit.body.contains(self.release_id) {
                if index == 0 {
                    warn!(hash, "skipping release commit because it is the first commit");
                    continue;
                }

                if reference.is_none() {
                    warn!(hash, "skipping release commit because it does not contain a PR number");
                    continue;
                }

                debug!(hash, "reached previous release commit");
                break;
            }

            if is_revert_commit(subject, &commit.body) {
                debug!(hash, "skipping revert commit");
                continue;
            }

            recent.push(commit.trimmed());
        }

        recent
    }
}
