// trimfield-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for using the matcher and cleaner in headless mode (non-UI).
//! Provides a one-shot call that checks the page rules and cleans a string.

use log::debug;

use crate::cleaner::clean;
use crate::rules::matcher::should_apply;
use crate::settings::Settings;

/// Result of a headless clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome {
    /// The text after cleaning, or the input unchanged when rules did not apply.
    pub text: String,
    /// Whether the URL rules allowed cleaning.
    pub applied: bool,
    /// Whether the text differs from the input.
    pub changed: bool,
}

/// Cleans `content` if the rules in `settings` apply to `url`.
///
/// # Arguments
///
/// * `settings` - The settings to apply.
/// * `url` - The page URL to check against the rules. `None` skips the check.
/// * `content` - The string to be cleaned.
pub fn headless_clean(settings: &Settings, url: Option<&str>, content: &str) -> CleanOutcome {
    let applied = url.map_or(true, |url| should_apply(settings, url));
    if !applied {
        debug!("Rules do not apply to {:?}; leaving input untouched.", url);
        return CleanOutcome { text: content.to_string(), applied, changed: false };
    }

    let text = clean(settings, content);
    let changed = text != content;
    CleanOutcome { text, applied, changed }
}
