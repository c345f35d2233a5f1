//! Terminal output helpers: status lines and diffs.

pub mod diff_viewer;
pub mod output_format;
