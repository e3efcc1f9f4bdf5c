//! Commit history operations

use git2::Sort;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::Commit;

/// Length of abbreviated hashes, matching `git log --pretty=%h`
const SHORT_HASH_LEN: usize = 7;

impl GitRepo {
    /// Read the commit log reachable from HEAD, newest first
    ///
    /// With an end commit the walk covers `<end>^..HEAD`, so the end commit
    /// itself is included.
    #[instrument(skip(self))]
    pub fn commit_log(&self, end_commit: Option<&str>) -> Result<Vec<Commit>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        if let Some(end) = end_commit.filter(|e| !e.trim().is_empty()) {
            let end = self.repo.revparse_single(end.trim())?.peel_to_commit()?;
            for parent in end.parent_ids() {
                revwalk.hide(parent)?;
            }
        }

        let mut commits = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(to_commit(&commit));
        }

        debug!(count = commits.len(), "read commit log");
        Ok(commits)
    }

    /// Whether the newest commit's message carries the release id
    pub fn head_is_release_commit(&self, release_id: &str) -> Result<bool> {
        let head = self.head_commit()?;
        let message = head.message().unwrap_or("");
        Ok(is_release_commit(message, release_id))
    }
}

/// Whether a commit message marks a release
pub fn is_release_commit(message: &str, release_id: &str) -> bool {
    !release_id.is_empty() && message.contains(release_id)
}

/// Convert a git2 commit into a log record
fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let hash: String = commit.id().to_string().chars().take(SHORT_HASH_LEN).collect();
    let author = commit.author();

    Commit::new(
        hash,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or(""),
        commit.summary().unwrap_or(""),
    )
    .with_body(commit.body().unwrap_or("").trim())
}
