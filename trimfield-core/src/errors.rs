//! errors.rs - Custom error types for the trimfield-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific error types that callers can handle programmatically. Most of the
//! runtime paths (matching, cleaning, event handling) never fail; errors only
//! come from the settings store and from loading settings documents.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `trimfield-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrimfieldError {
    #[error("Failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings store at '{path}' does not contain a JSON object: {detail}", path = .0.display(), detail = .1)]
    StoreFormat(PathBuf, String),

    #[error("Failed to write settings: {0}")]
    StoreWrite(String),

    #[error("Failed to parse settings document: {0}")]
    SettingsFormat(String),

    #[error("Pattern length ({0}) exceeds maximum allowed ({1})")]
    PatternTooLong(usize, usize),

    #[error("Failed to compile URL pattern '{0}': {1}")]
    PatternCompile(String, regex::Error),
}
