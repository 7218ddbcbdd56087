//! Per-commit message rules
//!
//! A rule inspects one commit and either finds nothing or produces exactly
//! one issue. Rules never drop commits from the flow and never fail on a
//! well-formed commit; an empty subject or body is a value like any other.
//! Lengths are measured in characters, not bytes.

use regex::Regex;
use thiserror::Error;

use crate::commits::Commit;
use crate::config::Config;
use crate::issues::Issue;

/// Errors raised while building rules from configuration
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule pattern is not a valid regular expression
    #[error("invalid rule pattern [{pattern}]")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A pure per-commit check.
pub trait Rule {
    /// Check one commit, producing an issue on violation.
    fn check(&self, commit: &Commit) -> Option<Issue>;
}

/// Flags commits whose subject does not match the pattern (search, not
/// full-match).
#[derive(Debug)]
pub struct SubjectPattern {
    regex: Regex,
}

impl SubjectPattern {
    /// Compile the subject pattern.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Ok(Self {
            regex: compile(pattern)?,
        })
    }
}

impl Rule for SubjectPattern {
    fn check(&self, commit: &Commit) -> Option<Issue> {
        if self.regex.is_match(commit.subject()) {
            None
        } else {
            Some(Issue::new(
                format!("subject does not match regex [{}]", self.regex.as_str()),
                commit.clone(),
            ))
        }
    }
}

/// Flags commits whose body does not match the pattern.
#[derive(Debug)]
pub struct BodyPattern {
    regex: Regex,
}

impl BodyPattern {
    /// Compile the body pattern.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Ok(Self {
            regex: compile(pattern)?,
        })
    }
}

impl Rule for BodyPattern {
    fn check(&self, commit: &Commit) -> Option<Issue> {
        if self.regex.is_match(&commit.body()) {
            None
        } else {
            Some(Issue::new(
                format!("body does not conform to regex [{}]", self.regex.as_str()),
                commit.clone(),
            ))
        }
    }
}

/// Flags commits whose subject is longer than the bound.
pub struct SubjectMaxLength {
    max: usize,
}

impl SubjectMaxLength {
    /// Build the rule with the given upper bound.
    #[must_use]
    pub const fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Rule for SubjectMaxLength {
    fn check(&self, commit: &Commit) -> Option<Issue> {
        if commit.subject().chars().count() > self.max {
            Some(Issue::new(
                format!("subject length exceeds max [{}]", self.max),
                commit.clone(),
            ))
        } else {
            None
        }
    }
}

/// Flags commits whose subject is shorter than the bound.
pub struct SubjectMinLength {
    min: usize,
}

impl SubjectMinLength {
    /// Build the rule with the given lower bound.
    #[must_use]
    pub const fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule for SubjectMinLength {
    fn check(&self, commit: &Commit) -> Option<Issue> {
        if commit.subject().chars().count() < self.min {
            Some(Issue::new(
                format!("subject length less than min [{}]", self.min),
                commit.clone(),
            ))
        } else {
            None
        }
    }
}

/// Flags commits whose body is longer than the bound.
pub struct BodyMaxLength {
    max: usize,
}

impl BodyMaxLength {
    /// Build the rule with the given upper bound.
    #[must_use]
    pub const fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Rule for BodyMaxLength {
    fn check(&self, commit: &Commit) -> Option<Issue> {
        if commit.body().chars().count() > self.max {
            Some(Issue::new(
                format!("body length exceeds max [{}]", self.max),
                commit.clone(),
            ))
        } else {
            None
        }
    }
}

/// Build every configured rule, in the order issues are reported per commit.
pub fn from_config(config: &Config) -> Result<Vec<Box<dyn Rule>>, RuleError> {
    Ok(vec![
        Box::new(SubjectPattern::new(&config.subject_regex)?),
        Box::new(SubjectMaxLength::new(config.subject_maxlen)),
        Box::new(SubjectMinLength::new(config.subject_minlen)),
        Box::new(BodyPattern::new(&config.body_regex)?),
        Box::new(BodyMaxLength::new(config.body_maxlen)),
    ])
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
