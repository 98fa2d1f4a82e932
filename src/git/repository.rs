use crate::error::Result;
use crate::git::CommitInfo;
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn commit_info(commit: &git2::Commit<'_>) -> CommitInfo {
        CommitInfo {
            hash: commit.id().to_string(),
            message: commit.message().unwrap_or("(empty message)").to_string(),
        }
    }
}

impl super::Repository for Git2Repository {
    fn resolve(&self, rev: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(rev)?;
        Ok(object.peel_to_commit()?.id())
    }

    fn merge_base(&self, one: Oid, two: Oid) -> Result<Oid> {
        Ok(self.repo.merge_base(one, two)?)
    }

    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        revwalk
            .map(|oid| -> Result<CommitInfo> {
                let commit = self.repo.find_commit(oid?)?;
                Ok(Self::commit_info(&commit))
            })
            .collect()
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;
        Ok(Self::commit_info(&commit))
    }
}
