//! Terminal output helpers
//!
//! Status lines go to stderr so that the release body or JSON printed on
//! stdout can be piped as is.

use std::fmt::Display;
use std::path::Path;

use console::style;
use liftoff_core::types::SemverBump;

/// Print a success message
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// Bold section header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Indented `key: value` line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// `old → new`, with the new version highlighted
pub fn version_change(old: &str, new: &str) -> String {
    format!("{} → {}", old, style(new).green().bold())
}

/// Bump name colored by severity
pub fn bump(bump: SemverBump) -> String {
    let styled = style(bump.as_str());
    match bump {
        SemverBump::Major => styled.red().bold().to_string(),
        SemverBump::Minor => styled.yellow().to_string(),
        SemverBump::Patch => styled.dim().to_string(),
    }
}

/// Git tag
pub fn tag(tag: impl Display) -> String {
    style(tag).yellow().to_string()
}

/// Filesystem path
pub fn path(path: &Path) -> String {
    style(path.display()).cyan().to_string()
}
