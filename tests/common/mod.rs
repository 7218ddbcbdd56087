//! Temporary git repository helper for integration tests
//!
//! Builds throwaway repositories directly through `git2`, so the tests do
//! not depend on a `git` binary being installed. Commits carry an empty
//! tree; only the metadata and message matter to the linter.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// A temporary git repository for testing
pub struct TempGitRepo {
    _temp_dir: TempDir,
    repo: Repository,
    clock: i64,
}

impl TempGitRepo {
    /// Create a new temporary git repository
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp directory");
        let repo = Repository::init(temp_dir.path()).expect("init git repo");
        Self {
            _temp_dir: temp_dir,
            repo,
            clock: 1_560_000_000,
        }
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        self.repo.workdir().expect("workdir")
    }

    /// Commit on HEAD with the default test author
    pub fn commit(&mut self, message: &str) -> Oid {
        self.clock += 60;
        let parents = self.head_parents();
        self.raw_commit(
            Some("HEAD"),
            "John Doe",
            "john@doe.org",
            message,
            self.clock,
            &parents,
        )
    }

    /// Commit on HEAD, authored at noon UTC on the given `yyyy-MM-dd` date
    pub fn commit_dated(&mut self, message: &str, date: &str) -> Oid {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
        let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("valid time");
        let seconds = day.and_time(noon).and_utc().timestamp();
        self.clock = seconds;
        let parents = self.head_parents();
        self.raw_commit(
            Some("HEAD"),
            "John Doe",
            "john@doe.org",
            message,
            seconds,
            &parents,
        )
    }

    /// Commit on HEAD with a specific author
    pub fn commit_authored(&mut self, name: &str, email: &str, message: &str) -> Oid {
        self.clock += 60;
        let parents = self.head_parents();
        self.raw_commit(Some("HEAD"), name, email, message, self.clock, &parents)
    }

    /// Create a two-parent merge commit on HEAD: a side commit branching
    /// off the current HEAD, then a merge of both
    pub fn merge_commit(&mut self, message: &str) -> Oid {
        let head = self.head_parents();
        assert!(!head.is_empty(), "merge_commit needs an existing commit");
        self.clock += 60;
        let side = self.raw_commit(None, "John Doe", "john@doe.org", "side work", self.clock, &head);
        self.clock += 60;
        self.raw_commit(
            Some("HEAD"),
            "John Doe",
            "john@doe.org",
            message,
            self.clock,
            &[head[0], side],
        )
    }

    fn head_parents(&self) -> Vec<Oid> {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .map(|c| vec![c.id()])
            .unwrap_or_default()
    }

    fn raw_commit(
        &self,
        update_ref: Option<&str>,
        name: &str,
        email: &str,
        message: &str,
        seconds: i64,
        parent_oids: &[Oid],
    ) -> Oid {
        let tree_id = self.repo.treebuilder(None).expect("treebuilder").write().expect("tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");
        let parents: Vec<git2::Commit<'_>> = parent_oids
            .iter()
            .map(|&oid| self.repo.find_commit(oid).expect("find parent"))
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        let sig = Signature::new(name, email, &Time::new(seconds, 0)).expect("signature");
        self.repo
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .expect("commit")
    }
}

impl Default for TempGitRepo {
    fn default() -> Self {
        Self::new()
    }
}
