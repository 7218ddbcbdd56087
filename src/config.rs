//! Run configuration
//!
//! Options come from three layers: command line, the repository-local
//! `.gitlint.toml` file, and built-in defaults. Command-line values win over
//! file values, file values win over defaults, per option. The resolved
//! `Config` is built once at startup, never mutated, and passed by reference
//! into pipeline and rule construction.
//!
//! Every default makes the corresponding rule or stage a no-op: permissive
//! patterns, zero/maximal length bounds, epoch start date, unbounded parent
//! count, empty exclusion lists.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the repository-local configuration file
pub const CONFIG_FILE: &str = ".gitlint.toml";

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but cannot be read
    #[error("cannot read config file {path}")]
    Unreadable {
        /// Path of the file
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the known options
    #[error("cannot parse config file {path}")]
    Unparsable {
        /// Path of the file
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The fully resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the git repository
    pub path: PathBuf,
    /// Reference to start walking history from (HEAD when unset)
    pub from: Option<String>,
    /// Subject lines must match this regular expression
    pub subject_regex: String,
    /// Minimum subject length in characters
    pub subject_minlen: usize,
    /// Maximum subject length in characters
    pub subject_maxlen: usize,
    /// Bodies must match this regular expression
    pub body_regex: String,
    /// Maximum body length in characters
    pub body_maxlen: usize,
    /// Only lint commits authored on or after this `yyyy-MM-dd` date
    pub since: String,
    /// Only lint commits with at most this many parents (unbounded when unset)
    pub max_parents: Option<usize>,
    /// Skip commits whose author name matches any of these patterns
    pub excl_author_names: Vec<String>,
    /// Skip commits whose author email matches any of these patterns
    pub excl_author_emails: Vec<String>,
    /// Lint a single commit message read from this file instead of history
    pub msg_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            from: None,
            subject_regex: ".*".to_string(),
            subject_minlen: 0,
            subject_maxlen: usize::MAX,
            body_regex: ".*".to_string(),
            body_maxlen: usize::MAX,
            since: "1970-01-01".to_string(),
            max_parents: None,
            excl_author_names: Vec::new(),
            excl_author_emails: Vec::new(),
            msg_file: None,
        }
    }
}

impl Config {
    /// Resolve the final configuration from one merged override layer.
    #[must_use]
    pub fn resolve(overrides: Overrides) -> Self {
        let defaults = Self::default();
        Self {
            path: overrides.path.unwrap_or(defaults.path),
            from: overrides.from.or(defaults.from),
            subject_regex: overrides.subject_regex.unwrap_or(defaults.subject_regex),
            subject_minlen: overrides.subject_minlen.unwrap_or(defaults.subject_minlen),
            subject_maxlen: overrides.subject_maxlen.unwrap_or(defaults.subject_maxlen),
            body_regex: overrides.body_regex.unwrap_or(defaults.body_regex),
            body_maxlen: overrides.body_maxlen.unwrap_or(defaults.body_maxlen),
            since: overrides.since.unwrap_or(defaults.since),
            max_parents: overrides.max_parents.or(defaults.max_parents),
            excl_author_names: overrides.excl_author_names.unwrap_or_default(),
            excl_author_emails: overrides.excl_author_emails.unwrap_or_default(),
            msg_file: overrides.msg_file.or(defaults.msg_file),
        }
    }
}

/// One layer of options, every field optional. Unset fields fall through to
/// the next layer. Field names double as the TOML keys of `.gitlint.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Path to the git repository
    pub path: Option<PathBuf>,
    /// Reference to start walking history from
    pub from: Option<String>,
    /// Subject pattern
    pub subject_regex: Option<String>,
    /// Minimum subject length
    pub subject_minlen: Option<usize>,
    /// Maximum subject length
    pub subject_maxlen: Option<usize>,
    /// Body pattern
    pub body_regex: Option<String>,
    /// Maximum body length
    pub body_maxlen: Option<usize>,
    /// Date threshold
    pub since: Option<String>,
    /// Parent-count bound
    pub max_parents: Option<usize>,
    /// Author-name exclusion patterns
    pub excl_author_names: Option<Vec<String>>,
    /// Author-email exclusion patterns
    pub excl_author_emails: Option<Vec<String>>,
    /// Single commit message file
    pub msg_file: Option<PathBuf>,
}

impl Overrides {
    /// Merge two layers; fields set in `self` win.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            path: self.path.or(lower.path),
            from: self.from.or(lower.from),
            subject_regex: self.subject_regex.or(lower.subject_regex),
            subject_minlen: self.subject_minlen.or(lower.subject_minlen),
            subject_maxlen: self.subject_maxlen.or(lower.subject_maxlen),
            body_regex: self.body_regex.or(lower.body_regex),
            body_maxlen: self.body_maxlen.or(lower.body_maxlen),
            since: self.since.or(lower.since),
            max_parents: self.max_parents.or(lower.max_parents),
            excl_author_names: self.excl_author_names.or(lower.excl_author_names),
            excl_author_emails: self.excl_author_emails.or(lower.excl_author_emails),
            msg_file: self.msg_file.or(lower.msg_file),
        }
    }

    /// Load one layer from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Unparsable {
            path: path.display().to_string(),
            source,
        })
    }
}
