use std::fmt;

/// Non-fatal conditions met while computing a changelog or version.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The branch has no commits of its own relative to the base
    NoCommits { branch: String, base: String },
    /// A squash commit body listed no entries; its subject was used instead
    EmptySquashBody { sha: String },
    /// No bump rule matched the branch, the version triple is unchanged
    NoBumpRule { branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoCommits { branch, base } => {
                write!(f, "No commits on '{}' since it diverged from '{}'", branch, base)
            }
            BoundaryWarning::EmptySquashBody { sha } => {
                let short_hash = if sha.len() > 7 { &sha[..7] } else { sha.as_str() };
                write!(
                    f,
                    "Squash commit {} lists no commits, using its subject",
                    short_hash
                )
            }
            BoundaryWarning::NoBumpRule { branch } => {
                write!(
                    f,
                    "Branch '{}' matches no major/minor/patch rule, version not bumped",
                    branch
                )
            }
        }
    }
}
