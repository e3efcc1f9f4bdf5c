//! Conventional changelog item parsing
//!
//! Parses items of the form `type(scope, scope)!: description`, where the
//! breaking marker may also sit inside the parentheses.

use regex::Regex;
use std::sync::LazyLock;

use liftoff_core::types::SemverBump;

/// Regex for the part of an item before its first colon
static COMMIT_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?$")
        .expect("Invalid regex")
});

/// Regex for explicit version bump tokens
static BUMP_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?P<bump>major|minor|patch)\b").expect("Invalid regex"));

/// The parsed `type(scopes)!` prefix of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTypeParts {
    /// Lowercased commit type
    pub commit_type: String,
    /// Scopes in written order
    pub packages: Vec<String>,
    /// Whether a `!` marker was present
    pub is_breaking_change: bool,
}

/// Split an item on its first colon into type part and description
pub fn split_item(item: &str) -> Option<(&str, &str)> {
    let (commit_type, description) = item.split_once(':')?;
    Some((commit_type.trim(), description.trim()))
}

/// Parse a `type(scope, scope)!` prefix
pub fn parse_commit_type(commit_type: &str) -> Option<CommitTypeParts> {
    let caps = COMMIT_TYPE_REGEX.captures(commit_type.trim())?;

    let scope = caps.name("scope").map(|m| m.as_str()).unwrap_or("");
    let packages = scope
        .split(',')
        .map(|s| s.trim().trim_end_matches('!').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Some(CommitTypeParts {
        commit_type: caps.name("type")?.as_str().to_lowercase(),
        packages,
        is_breaking_change: caps.name("breaking").is_some() || scope.contains('!'),
    })
}

/// Explicit version bump token in a description
pub fn explicit_bump(description: &str) -> Option<SemverBump> {
    let caps = BUMP_TOKEN_REGEX.captures(description)?;
    caps.name("bump")?.as_str().parse().ok()
}

/// Upper-case the first character
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_package() {
        let parts = parse_commit_type("chore(package-a)").unwrap();
        assert_eq!(parts.packages, vec!["package-a"]);
        assert_eq!(parts.commit_type, "chore");
    }

    #[test]
    fn test_multiple_packages() {
        let parts = parse_commit_type("chore(package-a, package-b)").unwrap();
        assert_eq!(parts.packages, vec!["package-a", "package-b"]);
    }

    #[test]
    fn test_breaking_markers() {
        assert!(parse_commit_type("chore(package-a)!").unwrap().is_breaking_change);
        assert!(parse_commit_type("feat!").unwrap().is_breaking_change);

        let inner = parse_commit_type("refactor(api-client!)").unwrap();
        assert!(inner.is_breaking_change);
        assert_eq!(inner.packages, vec!["api-client"]);
    }

    #[test]
    fn test_type_without_scope() {
        let parts = parse_commit_type("feat").unwrap();
        assert_eq!(parts.commit_type, "feat");
        assert!(parts.packages.is_empty());
        assert!(!parts.is_breaking_change);
    }

    #[test]
    fn test_rejects_prose() {
        assert!(parse_commit_type("Updated docs").is_none());
        assert!(parse_commit_type("").is_none());
    }

    #[test]
    fn test_split_item() {
        let item = "feat(ui-components): Added new responsive table component";
        let (commit_type, description) = split_item(item).unwrap();
        assert_eq!(commit_type, "feat(ui-components)");
        assert_eq!(description, "Added new responsive table component");
        assert!(split_item("no colon here").is_none());
    }

    #[test]
    fn test_explicit_bump() {
        assert_eq!(explicit_bump("some test #major"), Some(SemverBump::Major));
        assert_eq!(explicit_bump("cleanup #patch please"), Some(SemverBump::Patch));
        assert_eq!(explicit_bump("see #majority"), None);
        assert_eq!(explicit_bump("fixes #12"), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("some test"), "Some test");
        assert_eq!(capitalize("Already"), "Already");
        assert_eq!(capitalize(""), "");
    }
}
