use crate::error::{Result, SemanticBranchError};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::collections::HashMap;

/// Mock repository with a single linear history, oldest commit first
pub struct MockRepository {
    history: Vec<(Oid, CommitInfo)>,
    refs: HashMap<String, Oid>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            history: Vec::new(),
            refs: HashMap::new(),
        }
    }

    /// Append a commit on top of the history; HEAD follows it.
    ///
    /// The OID is derived from the position so tests need not invent hashes.
    pub fn push_commit(&mut self, message: impl Into<String>) -> Oid {
        let index = self.history.len() + 1;
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&(index as u64).to_be_bytes());
        let oid = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());

        self.history.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.into(),
            },
        ));
        oid
    }

    /// Point a named reference at a commit
    pub fn set_ref(&mut self, name: impl Into<String>, oid: Oid) {
        self.refs.insert(name.into(), oid);
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.history
            .iter()
            .position(|(candidate, _)| *candidate == oid)
            .ok_or_else(|| SemanticBranchError::Git(git2::Error::from_str("commit not found")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn resolve(&self, rev: &str) -> Result<Oid> {
        if rev == "HEAD" {
            return self
                .history
                .last()
                .map(|(oid, _)| *oid)
                .ok_or_else(|| SemanticBranchError::Git(git2::Error::from_str("HEAD is unborn")));
        }
        self.refs.get(rev).copied().ok_or_else(|| {
            SemanticBranchError::Git(git2::Error::from_str(&format!(
                "revspec '{}' not found",
                rev
            )))
        })
    }

    fn merge_base(&self, one: Oid, two: Oid) -> Result<Oid> {
        // Linear history: the older commit is the ancestor of the other.
        let (a, b) = (self.position(one)?, self.position(two)?);
        Ok(self.history[a.min(b)].0)
    }

    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let (from, to) = (self.position(from_oid)?, self.position(to_oid)?);
        if from >= to {
            return Ok(Vec::new());
        }
        Ok(self.history[from + 1..=to]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        let index = self.position(oid)?;
        Ok(self.history[index].1.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git;

    #[test]
    fn test_mock_resolves_head_and_refs() {
        let mut repo = MockRepository::new();
        let first = repo.push_commit("chore: init");
        let second = repo.push_commit("feat: thing");
        repo.set_ref("origin/main", first);

        assert_eq!(repo.resolve("HEAD").unwrap(), second);
        assert_eq!(repo.resolve("origin/main").unwrap(), first);
        assert!(repo.resolve("missing").is_err());
    }

    #[test]
    fn test_mock_commits_since_base() {
        let mut repo = MockRepository::new();
        let base = repo.push_commit("chore: init");
        repo.push_commit("feat: one");
        repo.push_commit("fix: two");
        repo.set_ref("origin/main", base);

        let commits = git::commits_since_base(&repo, "origin/main").unwrap();
        let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["feat: one", "fix: two"]);
        assert_eq!(git::count_since_base(&repo, "origin/main").unwrap(), 2);
    }

    #[test]
    fn test_mock_head_on_base_has_no_commits() {
        let mut repo = MockRepository::new();
        let base = repo.push_commit("chore: init");
        repo.set_ref("origin/main", base);

        assert_eq!(git::count_since_base(&repo, "origin/main").unwrap(), 0);
    }

    #[test]
    fn test_mock_empty_repository_has_no_head() {
        let repo = MockRepository::default();
        assert!(git::head_commit(&repo).is_err());
    }

    #[test]
    fn test_mock_oids_are_distinct() {
        let mut repo = MockRepository::new();
        let a = repo.push_commit("a");
        let b = repo.push_commit("b");
        assert_ne!(a, b);
        assert_ne!(a, Oid::zero());
    }
}
