use crate::domain::VersionBump;
use crate::error::{Result, SemanticBranchError};
use std::fmt;
use std::str::FromStr;

/// Versioning mode of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Release,
    Prerelease,
}

impl FromStr for Mode {
    type Err = SemanticBranchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "release" => Ok(Mode::Release),
            "prerelease" => Ok(Mode::Prerelease),
            other => Err(SemanticBranchError::input(format!(
                "Unknown mode '{}': expected 'release' or 'prerelease'",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Release => write!(f, "release"),
            Mode::Prerelease => write!(f, "prerelease"),
        }
    }
}

/// Outcome of evaluating a branch name against the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub bump: VersionBump,
    pub is_release_branch: bool,
    pub is_prerelease_branch: bool,
    pub ignored: bool,
}

impl MatchResult {
    /// Whether the branch is eligible to publish in the given mode
    pub fn is_deployable(&self, mode: Mode) -> bool {
        if self.ignored {
            return false;
        }
        match mode {
            Mode::Release => self.is_release_branch,
            Mode::Prerelease => self.is_prerelease_branch,
        }
    }
}
