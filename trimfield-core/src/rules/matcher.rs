//! Decides whether cleaning is active on a page.

use log::debug;

use crate::rules::compiler::get_or_compile;
use crate::rules::normalize_entries;
use crate::settings::{Mode, Settings};

/// Returns `true` if any pattern in `patterns` matches somewhere in `url`.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], url: &str) -> bool {
    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        !pattern.is_empty()
            && get_or_compile(pattern).is_some_and(|regex| regex.is_match(url))
    })
}

/// Whether cleaning should run on the page at `url` under `settings`.
///
/// * `all`: always.
/// * `allow`: only if the allow list is non-empty and one of its patterns matches.
/// * `deny`: unless one of the deny patterns matches.
pub fn should_apply(settings: &Settings, url: &str) -> bool {
    let decision = match settings.mode {
        Mode::All => true,
        Mode::Allow => {
            let allow = normalize_entries(&settings.allow_list);
            !allow.is_empty() && matches_any(&allow, url)
        }
        Mode::Deny => {
            let deny = normalize_entries(&settings.deny_list);
            !matches_any(&deny, url)
        }
    };
    debug!("should_apply(mode={}, url={}) = {}", settings.mode, url, decision);
    decision
}
