//! Commit type table
//!
//! Maps a conventional-commit type to the emoji and display name of its
//! changelog section, its rank in the rendered document, and the version
//! bump it implies. The table is built once from configuration and shared
//! by reference across the pipeline.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::SemverBump;

/// Matches `type(scope, scope)!: description`
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?: (?P<description>\S.*)$")
        .expect("Invalid regex")
});

/// Heading that introduces an explicit changelog in a commit body
pub const CHANGELOG_HEADING: &str = "## Changelog";

/// Whether a commit body carries an explicit changelog section
pub fn has_changelog_section(body: &str) -> bool {
    body.contains(CHANGELOG_HEADING)
}

/// One row of the type table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTypeSpec {
    /// Commit type key (feat, fix, ...)
    #[serde(rename = "type")]
    pub key: String,
    /// Emoji shown in the section heading
    pub emoji: String,
    /// Section display name
    pub name: String,
    /// Default bump for entries of this type
    #[serde(default = "default_bump")]
    pub bump: SemverBump,
}

fn default_bump() -> SemverBump {
    SemverBump::Patch
}

impl CommitTypeSpec {
    /// Create a new type row
    pub fn new(key: &str, emoji: &str, name: &str, bump: SemverBump) -> Self {
        Self {
            key: key.to_string(),
            emoji: emoji.to_string(),
            name: name.to_string(),
            bump,
        }
    }

    /// Section heading text, e.g. `🚀 New Features`
    pub fn heading(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

/// Ordered, immutable commit type table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    types: Vec<CommitTypeSpec>,
}

impl TypeTable {
    /// Build a table from rows; row order defines section rank
    pub fn new(types: Vec<CommitTypeSpec>) -> Self {
        Self { types }
    }

    /// Look up a type by key (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&CommitTypeSpec> {
        self.types.iter().find(|t| t.key.eq_ignore_ascii_case(key))
    }

    /// Rank of a type in the rendered document; unknown types sort last
    pub fn rank(&self, key: &str) -> usize {
        self.types
            .iter()
            .position(|t| t.key.eq_ignore_ascii_case(key))
            .unwrap_or(usize::MAX)
    }

    /// Whether a type is known
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All rows, in rank order
    pub fn iter(&self) -> impl Iterator<Item = &CommitTypeSpec> {
        self.types.iter()
    }

    /// Whether a subject line is a conventional commit with a known type
    pub fn is_conventional(&self, subject: &str) -> bool {
        CONVENTIONAL_REGEX
            .captures(subject.trim())
            .and_then(|caps| caps.name("type"))
            .is_some_and(|t| self.contains(t.as_str()))
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new(default_types())
    }
}

/// Built-in type rows in rank order
pub fn default_types() -> Vec<CommitTypeSpec> {
    use SemverBump::{Minor, Patch};

    vec![
        CommitTypeSpec::new("feat", "🚀", "New Features", Minor),
        CommitTypeSpec::new("fix", "🐛", "Bug Fixes", Patch),
        CommitTypeSpec::new("perf", "🔥", "Performance", Patch),
        CommitTypeSpec::new("refactor", "💅", "Refactors", Patch),
        CommitTypeSpec::new("docs", "📖", "Documentation", Patch),
        CommitTypeSpec::new("build", "📦", "Build", Patch),
        CommitTypeSpec::new("types", "🌊", "Types", Patch),
        CommitTypeSpec::new("chore", "🏠", "Chores", Patch),
        CommitTypeSpec::new("examples", "🏀", "Examples", Patch),
        CommitTypeSpec::new("test", "✅", "Tests", Patch),
        CommitTypeSpec::new("style", "🎨", "Styles", Patch),
        CommitTypeSpec::new("ci", "🤖", "CI", Patch),
    ]
}
