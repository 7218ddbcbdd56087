//! Commit records
//!
//! Immutable snapshots of a single commit's metadata and message, as handed
//! over by the commit source. Subject and body are derived from the raw
//! message on every call, never stored separately.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Separator between a commit message's subject and body.
const PARAGRAPH_SEP: &str = "\n\n";

/// The author of a commit.
///
/// Both fields are free text. The zero value is used for synthetic commits
/// built from a literal message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

/// A single commit's immutable facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Raw, unmodified commit message
    pub message: String,
    /// Author identity
    pub author: Author,
    /// Author timestamp
    pub date: DateTime<Utc>,
    /// Number of parents: 0 for root/synthetic commits, 2+ for merges
    pub parent_count: usize,
}

impl Commit {
    /// Short form of the hash: the first 7 characters, or the whole hash
    /// when it is shorter than that.
    #[must_use]
    pub fn short_id(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }

    /// The message text before the first blank-line separator, or the whole
    /// message when there is none.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self.message.find(PARAGRAPH_SEP) {
            Some(end) => &self.message[..end],
            None => &self.message,
        }
    }

    /// The message text after the first blank-line separator, with the
    /// remaining segments concatenated without reintroducing the separator.
    /// Empty when the message has no separator.
    #[must_use]
    pub fn body(&self) -> String {
        self.message.split(PARAGRAPH_SEP).skip(1).collect()
    }
}
