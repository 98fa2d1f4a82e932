use crate::domain::{MatchResult, Mode, Version, VersionBump};
use crate::error::{Result, SemanticBranchError};
use log::debug;

/// Result of a version calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculation {
    pub version: Version,
    pub deploy: bool,
}

/// Parse a commit count supplied as text.
///
/// Negative, empty or non-numeric values are rejected.
pub fn parse_commit_count(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    match trimmed.parse::<i128>() {
        Ok(n) if n < 0 => Err(SemanticBranchError::input(format!(
            "Commit count must be non-negative, got {}",
            n
        ))),
        Ok(n) => u64::try_from(n).map_err(|_| {
            SemanticBranchError::input(format!("Commit count out of range: {}", trimmed))
        }),
        Err(_) => Err(SemanticBranchError::input(format!(
            "Invalid commit count: '{}'",
            trimmed
        ))),
    }
}

/// Computes the next version and deploy decision
pub struct VersionCalculator;

impl VersionCalculator {
    /// Apply the matched bump to `current`.
    ///
    /// # Arguments
    /// * `current` - Version stored in the manifest
    /// * `matched` - Rule evaluation for the branch, in the same mode
    /// * `mode` - Release or prerelease
    /// * `commit_count` - Required in prerelease mode, becomes the `.devN` counter
    ///
    /// # Returns
    /// * `Ok(Calculation)` - New version and deploy flag
    /// * `Err` - If prerelease mode is missing its commit count, or the bump overflows
    pub fn calculate(
        current: &Version,
        matched: &MatchResult,
        mode: Mode,
        commit_count: Option<u64>,
    ) -> Result<Calculation> {
        let counter = match (mode, commit_count) {
            (Mode::Prerelease, None) => {
                return Err(SemanticBranchError::input(
                    "Prerelease mode requires a commit count",
                ))
            }
            (Mode::Prerelease, Some(count)) => Some(count),
            (Mode::Release, _) => None,
        };

        let deploy = matched.is_deployable(mode);

        if matched.ignored {
            debug!("branch ignored in {} mode, keeping {}", mode, current);
            return Ok(Calculation {
                version: *current,
                deploy,
            });
        }

        let candidate = current.bump(matched.bump)?;
        let version = match counter {
            Some(count) => candidate.with_prerelease(count),
            None => candidate,
        };

        if matched.bump == VersionBump::None {
            debug!("no bump rule matched, version stays at {}", candidate);
        }

        Ok(Calculation { version, deploy })
    }
}
