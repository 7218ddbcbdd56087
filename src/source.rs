//! Commit sources
//!
//! Produces the ordered commit sequence the pipeline consumes: either the
//! history of an on-disk repository walked newest-first with `git2`, or a
//! single synthetic commit built from a literal message file. Failures are
//! fatal; no partial sequence is ever returned.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Sort};
use log::debug;
use thiserror::Error;

use crate::commits::{Author, Commit};

/// Hash assigned to the synthetic commit built from a message file.
const PLACEHOLDER_HASH: &str = "0000000000000000000000000000000000000000";

/// Errors raised while producing commits
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing git store failed mid-walk
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// No repository at the given path
    #[error("repository not found at {path}")]
    RepositoryNotFound {
        /// The path that was searched
        path: String,
    },

    /// The starting reference does not resolve to a commit
    #[error("cannot resolve reference {reference}")]
    UnresolvedReference {
        /// The reference that failed to resolve
        reference: String,
    },

    /// The single-message file cannot be read
    #[error("cannot read message file {path}")]
    UnreadableMessageFile {
        /// Path of the message file
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Walk the repository at `path` newest-first, from `from_ref` when given
/// and HEAD otherwise, and return every reachable commit.
pub fn commits_in(path: &Path, from_ref: Option<&str>) -> Result<Vec<Commit>, SourceError> {
    let repo = Repository::open(path).map_err(|_| SourceError::RepositoryNotFound {
        path: path.display().to_string(),
    })?;

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;
    match from_ref {
        Some(reference) => {
            let oid = repo
                .revparse_single(reference)
                .map_err(|_| SourceError::UnresolvedReference {
                    reference: reference.to_string(),
                })?
                .id();
            revwalk.push(oid)?;
        }
        None => revwalk.push_head()?,
    }

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        commits.push(record(&commit));
    }
    debug!("walked {} commits in {}", commits.len(), path.display());
    Ok(commits)
}

/// Build a single synthetic commit from the message text in `path`, with a
/// placeholder hash, the current wall clock as its date, and no author.
pub fn message_from_file(path: &Path) -> Result<Vec<Commit>, SourceError> {
    let message =
        std::fs::read_to_string(path).map_err(|source| SourceError::UnreadableMessageFile {
            path: path.display().to_string(),
            source,
        })?;
    Ok(vec![Commit {
        hash: PLACEHOLDER_HASH.to_string(),
        message,
        author: Author::default(),
        date: Utc::now(),
        parent_count: 0,
    }])
}

fn record(commit: &git2::Commit<'_>) -> Commit {
    let author = commit.author();
    Commit {
        hash: commit.id().to_string(),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        date: timestamp(&author),
        author: Author {
            name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        },
        parent_count: commit.parent_count(),
    }
}

/// Author timestamp, the date the change was written rather than committed.
fn timestamp(author: &git2::Signature<'_>) -> DateTime<Utc> {
    Utc.timestamp_opt(author.when().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}
