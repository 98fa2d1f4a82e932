//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod commit;
pub mod version;

pub use branch::{MatchResult, Mode};
pub use commit::{CommitEntry, CommitMessage, CommitType};
pub use version::{Version, VersionBump};
