//! GitHub links

use std::sync::LazyLock;

use regex::Regex;

/// Matches a `(#123)` pull request reference
static PR_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(?P<number>\d+)\)").expect("Invalid regex"));

/// Link builder for a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubLinks {
    repository: String,
}

impl GitHubLinks {
    /// Create links for an `owner/repo` slug; `None` for anything else
    pub fn new(repository: &str) -> Option<Self> {
        let repository = repository.trim().trim_matches('/');
        let (owner, repo) = repository.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            repository: repository.to_string(),
        })
    }

    /// URL of a pull request
    pub fn pull_request_url(&self, number: &str) -> String {
        format!("https://github.com/{}/pull/{}", self.repository, number)
    }

    /// URL comparing two tags
    pub fn compare_url(&self, previous_tag: &str, new_tag: &str) -> String {
        format!(
            "https://github.com/{}/compare/{}...{}",
            self.repository, previous_tag, new_tag
        )
    }

    /// Rewrite `(#N)` references into pull request links
    pub fn link_pull_requests(&self, text: &str) -> String {
        PR_REFERENCE_REGEX
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let number = &caps["number"];
                format!("([#{}]({}))", number, self.pull_request_url(number))
            })
            .into_owned()
    }
}
