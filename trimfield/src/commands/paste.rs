// trimfield/src/commands/paste.rs
//! `paste` command: clean the clipboard text the way a paste would.

use anyhow::Result;
use log::{debug, info};
use std::io::Write;

use trimfield_core::{headless_clean, Settings};

use crate::utils::clipboard::{copy_to_clipboard, read_clipboard_text};

/// What happened to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteResult {
    /// The clipboard held no text.
    Empty,
    /// Paste cleaning is off, or the rules do not apply to the URL.
    Skipped,
    /// The text was already clean.
    Unchanged(String),
    /// The clipboard now holds the cleaned text.
    Cleaned(String),
}

/// Decides what a paste of `clipboard` would become, without touching the clipboard.
pub fn plan_paste(settings: &Settings, url: Option<&str>, clipboard: Option<String>) -> PasteResult {
    let Some(text) = clipboard.filter(|text| !text.is_empty()) else {
        return PasteResult::Empty;
    };
    if !settings.apply_on_paste {
        debug!("Paste cleaning is disabled.");
        return PasteResult::Skipped;
    }
    let outcome = headless_clean(settings, url, &text);
    if !outcome.applied {
        PasteResult::Skipped
    } else if outcome.changed {
        PasteResult::Cleaned(outcome.text)
    } else {
        PasteResult::Unchanged(outcome.text)
    }
}

/// Reads the clipboard, cleans it and writes the result back if it changed.
/// The resulting text is echoed to `writer`.
pub fn run_paste<W: Write>(settings: &Settings, url: Option<&str>, writer: &mut W) -> Result<PasteResult> {
    let result = plan_paste(settings, url, read_clipboard_text()?);
    match &result {
        PasteResult::Cleaned(text) => {
            copy_to_clipboard(text)?;
            info!("Clipboard text cleaned ({} bytes).", text.len());
            writeln!(writer, "{}", text)?;
        }
        PasteResult::Unchanged(text) => writeln!(writer, "{}", text)?,
        PasteResult::Empty | PasteResult::Skipped => {}
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimfield_core::Mode;

    #[test]
    fn cleans_when_enabled() {
        let result = plan_paste(&Settings::default(), None, Some("  hi  ".to_string()));
        assert_eq!(result, PasteResult::Cleaned("hi".to_string()));
    }

    #[test]
    fn empty_clipboard_is_reported() {
        assert_eq!(plan_paste(&Settings::default(), None, None), PasteResult::Empty);
        assert_eq!(plan_paste(&Settings::default(), None, Some(String::new())), PasteResult::Empty);
    }

    #[test]
    fn honours_toggle_and_rules() {
        let off = Settings { apply_on_paste: false, ..Settings::default() };
        assert_eq!(plan_paste(&off, None, Some(" x ".into())), PasteResult::Skipped);

        let allow = Settings {
            mode: Mode::Allow,
            allow_list: vec!["example.com".to_string()],
            ..Settings::default()
        };
        assert_eq!(
            plan_paste(&allow, Some("https://other.org/"), Some(" x ".into())),
            PasteResult::Skipped
        );
        assert_eq!(
            plan_paste(&allow, Some("https://example.com/"), Some("x".into())),
            PasteResult::Unchanged("x".to_string())
        );
    }
}
