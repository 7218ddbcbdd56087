//! Issue detection and reporting
//!
//! The detector runs every configured rule against every commit surviving
//! the pipeline and concatenates the findings: commits in pipeline order,
//! rules in configuration order. The reporter serializes that list to a
//! sink verbatim — one record per issue, no reordering, no deduplication.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;

use crate::commits::Commit;
use crate::rules::Rule;

/// A single rule violation, bound to the commit that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// What is wrong with the commit message
    pub description: String,
    /// The offending commit
    pub commit: Commit,
}

impl Issue {
    /// Create an issue for a commit.
    pub fn new(description: impl Into<String>, commit: Commit) -> Self {
        Self {
            description: description.into(),
            commit,
        }
    }
}

/// Run every rule against every commit, in order.
#[must_use]
pub fn collect(rules: &[Box<dyn Rule>], commits: &[Commit]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for commit in commits {
        for rule in rules {
            if let Some(issue) = rule.check(commit) {
                issues.push(issue);
            }
        }
    }
    issues
}

/// Writes issues to a sink, one record per issue, each terminated by the
/// configured separator.
pub struct Reporter<W> {
    sink: W,
    separator: String,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter over a sink with the given record separator.
    pub fn new(sink: W, separator: impl Into<String>) -> Self {
        Self {
            sink,
            separator: separator.into(),
        }
    }

    /// Print the issues in list order.
    pub fn print(&mut self, issues: &[Issue]) -> io::Result<()> {
        for issue in issues {
            write!(self.sink, "{}: ", issue.commit.short_id().bold())?;
            write!(self.sink, "{}{}", issue.description.red(), self.separator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::commits::Author;
    use crate::rules::{SubjectMaxLength, SubjectPattern};

    fn commit(hash: &str, subject: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            message: subject.to_string(),
            author: Author::default(),
            date: Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap(),
            parent_count: 1,
        }
    }

    #[test]
    fn test_collect_flags_only_violating_commits() {
        let commits = vec![
            commit("aaaaaaa1", "ok (#1)"),
            commit("aaaaaaa2", "ok (#2)"),
            commit("aaaaaaa3", "bad subject"),
        ];
        let rules: Vec<Box<dyn Rule>> =
            vec![Box::new(SubjectPattern::new(r"\(#\d+\)").unwrap())];
        let issues = collect(&rules, &commits);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].commit.hash, "aaaaaaa3");
        assert_eq!(
            issues[0].description,
            r"subject does not match regex [\(#\d+\)]"
        );
    }

    #[test]
    fn test_collect_orders_by_commit_then_rule() {
        let commits = vec![
            commit("aaaaaaa1", "this subject is long and has no ticket"),
            commit("aaaaaaa2", "also long, also no ticket reference"),
        ];
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(SubjectPattern::new(r"\(#\d+\)").unwrap()),
            Box::new(SubjectMaxLength::new(10)),
        ];
        let issues = collect(&rules, &commits);
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].commit.hash, "aaaaaaa1");
        assert!(issues[0].description.contains("does not match regex"));
        assert_eq!(issues[1].commit.hash, "aaaaaaa1");
        assert!(issues[1].description.contains("exceeds max"));
        assert_eq!(issues[2].commit.hash, "aaaaaaa2");
        assert_eq!(issues[3].commit.hash, "aaaaaaa2");
    }

    #[test]
    fn test_collect_is_deterministic() {
        let commits = vec![commit("aaaaaaa1", "bad"), commit("aaaaaaa2", "bad")];
        let rules: Vec<Box<dyn Rule>> =
            vec![Box::new(SubjectPattern::new(r"\(#\d+\)").unwrap())];
        assert_eq!(collect(&rules, &commits), collect(&rules, &commits));
    }

    #[test]
    fn test_collect_with_no_rules_finds_nothing() {
        let commits = vec![commit("aaaaaaa1", "anything")];
        assert!(collect(&[], &commits).is_empty());
    }

    #[test]
    fn test_reporter_writes_short_id_description_and_separator() {
        colored::control::set_override(false);
        let issues = vec![
            Issue::new("issueA", commit("18045269d8d2fd8f53d01883c6c7b548d0b9e3ae", "x")),
            Issue::new("issueB", commit("4be918ff8bfc91de77a1462707a8d2eb30956f93", "y")),
        ];
        let mut buffer = Vec::new();
        Reporter::new(&mut buffer, "-").print(&issues).unwrap();
        let printed = String::from_utf8(buffer).unwrap();
        assert_eq!(printed, "1804526: issueA-4be918f: issueB-");
    }

    #[test]
    fn test_reporter_writes_nothing_for_empty_list() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        Reporter::new(&mut buffer, "\n").print(&[]).unwrap();
        assert!(buffer.is_empty());
    }
}
