//! User interface module - status output for CI logs.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_commit_range, display_error, display_proposed_tag,
    display_status, display_success, display_tag_list,
};
