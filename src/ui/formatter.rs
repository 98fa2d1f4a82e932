//! Pure formatting functions for UI output.
//!
//! Human-facing messages go to stderr so that stdout only carries results
//! (the `key=value` lines and the rendered changelog).

use crate::boundary::BoundaryWarning;
use crate::domain::{MatchResult, Version};
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display how the branch was classified.
///
/// # Arguments
/// * `branch` - Branch name that was evaluated
/// * `matched` - Rule evaluation result
pub fn display_match_summary(branch: &str, matched: &MatchResult) {
    eprintln!("\n{}", style(format!("Branch '{}'", branch)).bold());
    eprintln!("  bump:       {}", matched.bump);
    eprintln!("  release:    {}", matched.is_release_branch);
    eprintln!("  prerelease: {}", matched.is_prerelease_branch);
    if matched.ignored {
        eprintln!("  {}", style("ignored").dim());
    }
}

/// Machine-readable result lines, one `key=value` per line
pub fn format_outputs(version: &Version, deploy: bool) -> String {
    format!("version={}\ndeploy={}\n", version, deploy)
}
