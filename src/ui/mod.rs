//! User interface module - console output for the CLI.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_match_summary, display_status,
    display_success, format_outputs,
};
