//! compiler.rs - Translates URL patterns into regular expressions and caches them.
//!
//! A pattern is split on `*`, every piece is escaped, and the pieces are joined
//! with `.*`. The resulting expression is case-insensitive and unanchored, so
//! `example.com` matches any URL containing that text. Compiled patterns live
//! in a global, shared cache keyed by the pattern string. The cache is cleared
//! when it reaches [`MAX_CACHED_PATTERNS`] so long-lived processes stay bounded.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::TrimfieldError;

/// Maximum accepted length of a single pattern string.
pub const MAX_PATTERN_LENGTH: usize = 2048;

/// Upper bound on distinct cached patterns, failed ones included.
pub const MAX_CACHED_PATTERNS: usize = 1024;

/// Token substituted for each `*` wildcard.
const WILDCARD_TOKEN: &str = ".*";

lazy_static! {
    /// A thread-safe, global cache of compiled patterns.
    /// `None` records a pattern that failed to compile so it is not retried.
    static ref PATTERN_CACHE: RwLock<HashMap<String, Option<Arc<Regex>>>> = RwLock::new(HashMap::new());
}

/// Builds the regular expression source for a glob pattern.
pub fn pattern_to_regex_source(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<String>>()
        .join(WILDCARD_TOKEN)
}

/// Compiles a single glob pattern. This is the low-level, uncached entry point.
pub fn compile_pattern(pattern: &str) -> Result<Regex, TrimfieldError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(TrimfieldError::PatternTooLong(pattern.len(), MAX_PATTERN_LENGTH));
    }

    let source = pattern_to_regex_source(pattern);
    debug!("Compiling URL pattern '{}' as /{}/i", pattern, source);

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .size_limit(1 << 20)
        .build()
        .map_err(|e| TrimfieldError::PatternCompile(pattern.to_string(), e))
}

/// Gets a compiled pattern from the cache or compiles it if not found.
///
/// Returns `None` for patterns that cannot be compiled; those never match.
pub fn get_or_compile(pattern: &str) -> Option<Arc<Regex>> {
    {
        let cache = PATTERN_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = cache.get(pattern) {
            return entry.clone();
        }
    }

    let compiled = match compile_pattern(pattern) {
        Ok(regex) => Some(Arc::new(regex)),
        Err(e) => {
            warn!("{}. The pattern will never match.", e);
            None
        }
    };

    let mut cache = PATTERN_CACHE.write().unwrap_or_else(|e| e.into_inner());
    insert_bounded(&mut cache, pattern, compiled.clone(), MAX_CACHED_PATTERNS);
    compiled
}

/// Inserts into `cache`, clearing it first if a new key would exceed `capacity`.
fn insert_bounded<V>(cache: &mut HashMap<String, V>, key: &str, value: V, capacity: usize) {
    if cache.len() >= capacity && !cache.contains_key(key) {
        debug!("Pattern cache full ({} entries); clearing.", cache.len());
        cache.clear();
    }
    cache.insert(key.to_string(), value);
}
