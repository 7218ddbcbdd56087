//! Commit-narrowing pipeline
//!
//! Each stage is a pure predicate over one commit; narrowing an ordered
//! commit sequence drops non-matching commits and preserves relative order.
//! Stages compose in any order and applying the same stage twice is
//! idempotent, so stage order never changes the final result.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::commits::Commit;
use crate::config::Config;

/// Errors raised while building pipeline stages from configuration
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The since date is not a valid `yyyy-MM-dd` calendar date
    #[error("invalid since date [{value}]: expected yyyy-MM-dd")]
    InvalidDate {
        /// The rejected date string
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// An author exclusion pattern is not a valid regular expression
    #[error("invalid author exclusion pattern [{pattern}]")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single narrowing stage.
pub trait Stage {
    /// Whether a commit survives this stage.
    fn keep(&self, commit: &Commit) -> bool;

    /// Narrow an ordered commit sequence, preserving relative order.
    fn narrow(&self, commits: Vec<Commit>) -> Vec<Commit> {
        commits.into_iter().filter(|c| self.keep(c)).collect()
    }
}

/// Keeps commits authored on or after a threshold date.
#[derive(Debug)]
pub struct Since {
    threshold: DateTime<Utc>,
}

impl Since {
    /// Build the stage from a `yyyy-MM-dd` date string.
    pub fn new(date: &str) -> Result<Self, PipelineError> {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| {
            PipelineError::InvalidDate {
                value: date.to_string(),
                source,
            }
        })?;
        Ok(Self {
            threshold: day.and_time(NaiveTime::MIN).and_utc(),
        })
    }
}

impl Stage for Since {
    fn keep(&self, commit: &Commit) -> bool {
        commit.date >= self.threshold
    }
}

/// Keeps commits with at most `max` parents. `MaxParents::new(1)` excludes
/// merge commits.
pub struct MaxParents {
    max: usize,
}

impl MaxParents {
    /// Build the stage with the given parent-count bound.
    #[must_use]
    pub const fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Stage for MaxParents {
    fn keep(&self, commit: &Commit) -> bool {
        commit.parent_count <= self.max
    }
}

/// Drops commits whose author name matches any of the given patterns.
#[derive(Debug)]
pub struct ExcludeAuthorNames {
    patterns: Vec<Regex>,
}

impl ExcludeAuthorNames {
    /// Compile the exclusion patterns.
    pub fn new(patterns: &[String]) -> Result<Self, PipelineError> {
        Ok(Self {
            patterns: compile(patterns)?,
        })
    }
}

impl Stage for ExcludeAuthorNames {
    fn keep(&self, commit: &Commit) -> bool {
        !self.patterns.iter().any(|p| p.is_match(&commit.author.name))
    }
}

/// Drops commits whose author email matches any of the given patterns.
pub struct ExcludeAuthorEmails {
    patterns: Vec<Regex>,
}

impl ExcludeAuthorEmails {
    /// Compile the exclusion patterns.
    pub fn new(patterns: &[String]) -> Result<Self, PipelineError> {
        Ok(Self {
            patterns: compile(patterns)?,
        })
    }
}

impl Stage for ExcludeAuthorEmails {
    fn keep(&self, commit: &Commit) -> bool {
        !self.patterns.iter().any(|p| p.is_match(&commit.author.email))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, PipelineError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| PipelineError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// An ordered list of narrowing stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Build every configured stage. Stages whose configuration is the
    /// permissive default are still constructed where cheap (`Since`) or
    /// skipped where absent (exclusion lists, parent bound); either way the
    /// result over any commit sequence is the same.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(Since::new(&config.since)?)];
        if let Some(max) = config.max_parents {
            stages.push(Box::new(MaxParents::new(max)));
        }
        if !config.excl_author_names.is_empty() {
            stages.push(Box::new(ExcludeAuthorNames::new(&config.excl_author_names)?));
        }
        if !config.excl_author_emails.is_empty() {
            stages.push(Box::new(ExcludeAuthorEmails::new(&config.excl_author_emails)?));
        }
        Ok(Self { stages })
    }

    /// A pipeline with no stages; used for single-message input, where
    /// history-narrowing options do not apply.
    #[must_use]
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    /// Run every stage over the commit sequence, in order.
    #[must_use]
    pub fn run(&self, commits: Vec<Commit>) -> Vec<Commit> {
        let before = commits.len();
        let survivors = self
            .stages
            .iter()
            .fold(commits, |commits, stage| stage.narrow(commits));
        debug!("pipeline narrowed {before} commits to {}", survivors.len());
        survivors
    }
}
