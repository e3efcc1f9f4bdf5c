//! Textual commit log format
//!
//! `git log` is asked to print each commit as a record whose fields are
//! delimited by fixed separator tokens. The tokens form a closed alphabet:
//! a token found anywhere a field's content is expected means the record
//! cannot be split unambiguously, and the tokenizer fails instead of
//! guessing.

use liftoff_core::error::LogFormatError;
use tracing::{debug, instrument};

use crate::types::Commit;

pub const HASH_SEPARATOR: &str = "<HASH_SEPARATOR>";
pub const AUTHOR_SEPARATOR: &str = "<AUTHOR_SEPARATOR>";
pub const EMAIL_SEPARATOR: &str = "<EMAIL_SEPARATOR>";
pub const SUBJECT_SEPARATOR: &str = "<SUBJECT_SEPARATOR>";
pub const COMMIT_SEPARATOR: &str = "<COMMIT_SEPARATOR>";

/// Field separators in record order
const FIELD_SEPARATORS: [&str; 4] = [
    HASH_SEPARATOR,
    AUTHOR_SEPARATOR,
    EMAIL_SEPARATOR,
    SUBJECT_SEPARATOR,
];

/// Every token of the alphabet
const ALL_SEPARATORS: [&str; 5] = [
    HASH_SEPARATOR,
    AUTHOR_SEPARATOR,
    EMAIL_SEPARATOR,
    SUBJECT_SEPARATOR,
    COMMIT_SEPARATOR,
];

/// The `--pretty` format string producing one record per commit
pub fn pretty_format() -> String {
    format!(
        "%h{}%an{}%ae{}%s{}%b{}",
        HASH_SEPARATOR, AUTHOR_SEPARATOR, EMAIL_SEPARATOR, SUBJECT_SEPARATOR, COMMIT_SEPARATOR
    )
}

/// Arguments for `git` that print the log in this format
///
/// With an end commit the log is limited to `<end>^..HEAD`.
pub fn git_log_args(end_commit: Option<&str>) -> Vec<String> {
    let mut args = vec!["log".to_string(), format!("--pretty=format:{}", pretty_format())];

    if let Some(end) = end_commit.filter(|e| !e.trim().is_empty()) {
        args.push(format!("{}^..HEAD", end.trim()));
    }

    args
}

/// Render commits in the record format (the inverse of [`parse_git_log`])
pub fn format_git_log(commits: &[Commit]) -> String {
    commits
        .iter()
        .map(|c| {
            format!(
                "{}{}{}{}{}{}{}{}{}{}",
                c.hash,
                HASH_SEPARATOR,
                c.author,
                AUTHOR_SEPARATOR,
                c.email,
                EMAIL_SEPARATOR,
                c.subject,
                SUBJECT_SEPARATOR,
                c.body,
                COMMIT_SEPARATOR
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split textual log output into commits, newest first
///
/// Whitespace-only records are ignored and every field is trimmed.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_git_log(text: &str) -> Result<Vec<Commit>, LogFormatError> {
    let mut commits = Vec::new();

    let records = text
        .split(COMMIT_SEPARATOR)
        .map(str::trim)
        .filter(|r| !r.is_empty());

    for (index, record) in records.enumerate() {
        commits.push(parse_record(index, record)?);
    }

    debug!(count = commits.len(), "tokenized commit log");
    Ok(commits)
}

fn parse_record(record_index: usize, record: &str) -> Result<Commit, LogFormatError> {
    let mut fields: Vec<&str> = Vec::with_capacity(5);
    let mut rest = record;

    for token in FIELD_SEPARATORS {
        let (field, remainder) = rest.split_once(token).ok_or(LogFormatError::MissingSeparator {
            record: record_index,
            token,
        })?;
        check_collision(record_index, field)?;
        fields.push(field);
        rest = remainder;
    }
    check_collision(record_index, rest)?;
    fields.push(rest);

    Ok(Commit {
        hash: fields[0].trim().to_string(),
        author: fields[1].trim().to_string(),
        email: fields[2].trim().to_string(),
        subject: fields[3].trim().to_string(),
        body: fields[4].trim().to_string(),
    })
}

fn check_collision(record_index: usize, content: &str) -> Result<(), LogFormatError> {
    match ALL_SEPARATORS.into_iter().find(|token| content.contains(token)) {
        Some(token) => Err(LogFormatError::SeparatorCollision {
            record: record_index,
            token,
        }),
        None => Ok(()),
    }
}
