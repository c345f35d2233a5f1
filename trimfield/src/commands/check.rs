// trimfield/src/commands/check.rs
//! `check` command: report whether cleaning is active for a URL.

use anyhow::Result;
use std::io::Write;

use trimfield_core::{should_apply, Mode, Settings};

/// Writes `active` or `inactive`, followed by the reason, and returns the decision.
pub fn run_check<W: Write>(settings: &Settings, url: &str, writer: &mut W) -> Result<bool> {
    let active = should_apply(settings, url);
    let reason = match (settings.mode, active) {
        (Mode::All, _) => "mode is 'all'".to_string(),
        (Mode::Allow, true) => "URL matches the allow list".to_string(),
        (Mode::Allow, false) if settings.allow_list.is_empty() => "allow list is empty".to_string(),
        (Mode::Allow, false) => "URL matches no allow pattern".to_string(),
        (Mode::Deny, true) => "URL matches no deny pattern".to_string(),
        (Mode::Deny, false) => "URL matches the deny list".to_string(),
    };
    writeln!(writer, "{} ({})", if active { "active" } else { "inactive" }, reason)?;
    Ok(active)
}
