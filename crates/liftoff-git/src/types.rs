//! Git types

use serde::{Deserialize, Serialize};

/// One record of the commit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Abbreviated commit hash
    pub hash: String,
    /// Author name
    pub author: String,
    /// Author email
    pub email: String,
    /// First line of the commit message
    pub subject: String,
    /// Remainder of the commit message
    pub body: String,
}

impl Commit {
    /// Create a new commit record with an empty body
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: author.into(),
            email: email.into(),
            subject: subject.into(),
            body: String::new(),
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Copy with every field trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            hash: self.hash.trim().to_string(),
            author: self.author.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}
