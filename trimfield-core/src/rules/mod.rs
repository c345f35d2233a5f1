//! URL rule matching for trimfield.
//!
//! Patterns are glob-like strings in which `*` matches any run of characters.
//! They are compiled into case-insensitive regular expressions that may match
//! anywhere in the page URL, and cached per distinct pattern string.
//!
//! This module works closely with `settings` (which owns the pattern lists and
//! the activation mode) and is consulted by `session` before every blur or
//! paste is handled.

use serde_json::Value;

use crate::cleaner::trim_text;
use crate::settings::parse_list;

pub mod compiler;
pub mod derive;
pub mod matcher;

/// Normalizes a stored pattern list.
///
/// Accepts either an array (entries are stringified) or a single
/// newline-delimited string. Entries are trimmed and empty entries dropped.
/// Any other value yields an empty list.
pub fn normalize_patterns(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => normalize_entries(entries.iter().map(|entry| match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
        Value::String(text) => parse_list(text),
        _ => Vec::new(),
    }
}

/// Trims each entry and drops the empty ones, preserving order.
pub fn normalize_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| trim_text(entry.as_ref()).to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}
