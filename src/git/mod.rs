//! Git history access
//!
//! This module provides a trait-based abstraction over the few Git reads the
//! changelog and version drivers need, with a real implementation on top of
//! `git2` and an in-memory one for tests.
//!
//! - [repository::Git2Repository]: backed by an on-disk repository
//! - [mock::MockRepository]: linear in-memory history
//!
//! Code should depend on the [Repository] trait so that drivers can be tested
//! without a repository on disk.
//!
//! ```rust
//! # use semantic_branch::git::{self, Repository};
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let commits = git::commits_since_base(repo, "origin/main")?;
//! let count = git::count_since_base(repo, "origin/main")?;
//! assert_eq!(commits.len() as u64, count);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::CommitMessage;
use crate::error::Result;
use git2::Oid;
use log::debug;

/// Commit information read from history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The complete commit message (subject and body)
    pub message: String,
}

impl CommitInfo {
    /// Convert into parser input, linking to `<repo_url>/commit/<hash>` when a URL is known
    pub fn to_commit_message(&self, repo_url: Option<&str>) -> CommitMessage {
        let message = CommitMessage::from_message(&self.hash, &self.message);
        match repo_url {
            Some(url) => message.with_url(commit_url(url, &self.hash)),
            None => message,
        }
    }
}

/// Web link of a commit
pub fn commit_url(repo_url: &str, hash: &str) -> String {
    format!("{}/commit/{}", repo_url.trim_end_matches('/'), hash)
}

/// Common git read operations
///
/// ## Thread Safety
///
/// Implementors must be `Send`; `git2` repositories are not `Sync`.
///
/// ## Error Handling
///
/// Methods return [crate::error::Result<T>]; implementations map `git2::Error`
/// into [crate::error::SemanticBranchError::Git].
pub trait Repository: Send {
    /// Resolve a revision (branch, remote branch, tag, sha or `HEAD`) to a commit OID
    fn resolve(&self, rev: &str) -> Result<Oid>;

    /// Best common ancestor of two commits
    fn merge_base(&self, one: Oid, two: Oid) -> Result<Oid>;

    /// Commits reachable from `to_oid` but not from `from_oid`, oldest first
    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>>;

    /// Look up a single commit
    fn find_commit(&self, oid: Oid) -> Result<CommitInfo>;
}

/// Commits on HEAD since it diverged from `base`, oldest first
pub fn commits_since_base<R: Repository + ?Sized>(repo: &R, base: &str) -> Result<Vec<CommitInfo>> {
    let head = repo.resolve("HEAD")?;
    let base_oid = repo.resolve(base)?;
    let fork_point = repo.merge_base(head, base_oid)?;
    debug!("HEAD {} diverged from {} at {}", head, base, fork_point);
    repo.get_commits_between(fork_point, head)
}

/// Number of commits on HEAD since it diverged from `base`
pub fn count_since_base<R: Repository + ?Sized>(repo: &R, base: &str) -> Result<u64> {
    Ok(commits_since_base(repo, base)?.len() as u64)
}

/// The commit HEAD points at (the squash commit in release mode)
pub fn head_commit<R: Repository + ?Sized>(repo: &R) -> Result<CommitInfo> {
    repo.find_commit(repo.resolve("HEAD")?)
}
