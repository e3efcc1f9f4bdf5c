//! Contributor credits

use async_trait::async_trait;
use tracing::{debug, instrument};

use liftoff_git::Commit;

use crate::types::Contributor;

/// Resolves commit authors to GitHub users
///
/// Implementations report any failure as `None`; a missing user never
/// aborts a release.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Username of the account owning an email address
    async fn find_username(&self, email: &str) -> Option<String>;

    /// Display name of an account
    async fn find_name(&self, username: &str) -> Option<String>;
}

/// Key used to compare author names
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Distinct commit authors in first-seen order
///
/// Authors are merged by email first, then by name. A name match fills in
/// the email when the earlier commit had none.
pub fn collect_contributors(commits: &[Commit]) -> Vec<Contributor> {
    let mut contributors: Vec<Contributor> = Vec::new();

    for commit in commits {
        let email = Some(commit.email.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        if let Some(email) = &email {
            let known = contributors
                .iter()
                .any(|c| c.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)));
            if known {
                continue;
            }
        }

        let key = normalize(&commit.author);
        if let Some(existing) = contributors.iter_mut().find(|c| normalize(&c.username) == key) {
            if existing.email.is_none() {
                existing.email = email;
            }
            continue;
        }

        contributors.push(Contributor {
            username: commit.author.trim().to_string(),
            name: None,
            email,
        });
    }

    contributors
}

/// Contributors of a set of commits, resolved to GitHub accounts
///
/// Bots are dropped without a lookup, as are authors whose display name
/// cannot be resolved.
#[instrument(skip_all, fields(commits = commits.len()))]
pub async fn resolve_contributors(commits: &[Commit], lookup: &dyn UserLookup) -> Vec<Contributor> {
    let mut contributors = collect_contributors(commits);

    for contributor in contributors.iter_mut() {
        if contributor.is_bot() {
            debug!(username = %contributor.username, "skipping bot");
            continue;
        }

        if let Some(email) = contributor.email.as_deref() {
            if let Some(username) = lookup.find_username(email).await {
                contributor.username = username;
            }
        }

        if !contributor.username.is_empty() {
            contributor.name = lookup.find_name(&contributor.username).await;
        }
    }

    let resolved: Vec<Contributor> = contributors
        .into_iter()
        .filter(|c| !c.is_bot() && !c.username.is_empty() && c.name.is_some())
        .collect();

    debug!(count = resolved.len(), "resolved contributors");
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockLookup {
        usernames: HashMap<String, String>,
        names: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn with_user(mut self, email: &str, username: &str, name: &str) -> Self {
            if !email.is_empty() {
                self.usernames.insert(email.to_string(), username.to_string());
            }
            self.names.insert(username.to_string(), name.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserLookup for MockLookup {
        async fn find_username(&self, email: &str) -> Option<String> {
            self.calls.lock().unwrap().push(format!("find:{email}"));
            self.usernames.get(email).cloned()
        }

        async fn find_name(&self, username: &str) -> Option<String> {
            self.calls.lock().unwrap().push(format!("user:{username}"));
            self.names.get(username).cloned()
        }
    }

    fn commit(hash: &str, author: &str, email: &str) -> Commit {
        Commit::new(hash, author, email, "Test commit")
    }

    #[tokio::test]
    async fn test_no_commits() {
        let lookup = MockLookup::default();
        assert!(resolve_contributors(&[], &lookup).await.is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_author_without_email() {
        let lookup = MockLookup::default().with_user("", "testuser", "Test User");
        let result = resolve_contributors(&[commit("abc123", "testuser", "")], &lookup).await;

        assert_eq!(
            result,
            vec![Contributor {
                username: "testuser".to_string(),
                name: Some("Test User".to_string()),
                email: None,
            }]
        );
        assert_eq!(lookup.calls(), vec!["user:testuser"]);
    }

    #[tokio::test]
    async fn test_email_resolves_username() {
        let lookup = MockLookup::default().with_user("test@example.com", "actualtestuser", "Actual Test User");
        let result = resolve_contributors(&[commit("abc123", "testuser", "test@example.com")], &lookup).await;

        assert_eq!(result[0].username, "actualtestuser");
        assert_eq!(result[0].name.as_deref(), Some("Actual Test User"));
        assert_eq!(
            lookup.calls(),
            vec!["find:test@example.com", "user:actualtestuser"]
        );
    }

    #[tokio::test]
    async fn test_deduplicates_case_insensitively() {
        let lookup = MockLookup::default().with_user("test@example.com", "actualtestuser", "Actual Test User");
        let commits = vec![
            commit("abc123", "TestUser", "test@example.com"),
            commit("def456", "testuser", "TEST@example.com"),
            commit("ghi789", " TESTUSER ", ""),
        ];

        let result = resolve_contributors(&commits, &lookup).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].email.as_deref(), Some("test@example.com"));
        assert_eq!(lookup.calls().len(), 2);
    }

    #[test]
    fn test_name_match_backfills_email() {
        let commits = vec![
            commit("a", "Jane", ""),
            commit("b", "jane", "jane@example.com"),
            commit("c", "John", "john@example.com"),
        ];

        let contributors = collect_contributors(&commits);
        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].username, "Jane");
        assert_eq!(contributors[0].email.as_deref(), Some("jane@example.com"));
        assert_eq!(contributors[1].username, "John");
    }

    #[tokio::test]
    async fn test_bots_and_unresolved_are_dropped() {
        let lookup = MockLookup::default()
            .with_user("one@example.com", "user1", "User One")
            .with_user("two@example.com", "user2", "User Two");
        let commits = vec![
            commit("a", "user1", "one@example.com"),
            commit("b", "renovate[bot]", "bot@renovateapp.com"),
            commit("c", "ghost", "ghost@example.com"),
            commit("d", "user2", "two@example.com"),
        ];

        let result = resolve_contributors(&commits, &lookup).await;
        let usernames: Vec<&str> = result.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(usernames, vec!["user1", "user2"]);
        assert!(!lookup.calls().iter().any(|c| c.contains("renovate")));
    }
}
