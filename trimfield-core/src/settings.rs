//! Settings management for `trimfield-core`.
//!
//! This module defines the user-facing settings object: the activation mode,
//! the allow/deny pattern lists and the two cleaning toggles. Settings are
//! persisted as flat key-value items (see [`crate::store`]) and converted
//! leniently into the typed [`Settings`] struct, so that hand-edited or older
//! stored values never prevent the cleaner from running.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::cleaner::trim_text;
use crate::errors::TrimfieldError;
use crate::rules::normalize_patterns;
use crate::store::ChangeSet;

/// Flat key-value representation used by the settings store.
pub type Items = serde_json::Map<String, Value>;

pub const KEY_MODE: &str = "mode";
pub const KEY_ALLOW_LIST: &str = "allowList";
pub const KEY_DENY_LIST: &str = "denyList";
pub const KEY_COLLAPSE_NEWLINES: &str = "collapseNewlines";
pub const KEY_APPLY_ON_PASTE: &str = "applyOnPaste";

/// Governs which pattern list gates activation on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    /// Clean on every page.
    #[default]
    All,
    /// Clean only on pages matching the allow list.
    Allow,
    /// Clean everywhere except pages matching the deny list.
    Deny,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Allow => "allow",
            Mode::Deny => "deny",
        }
    }

    /// Reads a stored mode value. Anything unrecognised behaves as `all`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => s.parse().unwrap_or_default(),
            _ => Mode::All,
        }
    }

    /// The list that `add_to_list` style actions write to in this mode.
    pub fn target_list(&self) -> Option<ListKind> {
        match self {
            Mode::All => None,
            Mode::Allow => Some(ListKind::Allow),
            Mode::Deny => Some(ListKind::Deny),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Mode::All),
            "allow" => Ok(Mode::Allow),
            "deny" => Ok(Mode::Deny),
            other => Err(format!("unknown mode '{}'; expected one of: all, allow, deny", other)),
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

/// Identifies one of the two pattern lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Allow,
    Deny,
}

impl ListKind {
    pub fn key(&self) -> &'static str {
        match self {
            ListKind::Allow => KEY_ALLOW_LIST,
            ListKind::Deny => KEY_DENY_LIST,
        }
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" | "allowList" => Ok(ListKind::Allow),
            "deny" | "denyList" => Ok(ListKind::Deny),
            other => Err(format!("unknown list '{}'; expected 'allow' or 'deny'", other)),
        }
    }
}

/// The complete settings object consulted by the matcher and the cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Items", into = "Items")]
pub struct Settings {
    pub mode: Mode,
    /// Patterns consulted in `allow` mode. Order is kept for display only.
    pub allow_list: Vec<String>,
    /// Patterns consulted in `deny` mode.
    pub deny_list: Vec<String>,
    /// Collapse runs of blank lines into a single empty line.
    pub collapse_newlines: bool,
    /// Clean clipboard text before it is pasted.
    pub apply_on_paste: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::All,
            allow_list: Vec::new(),
            deny_list: Vec::new(),
            collapse_newlines: false,
            apply_on_paste: true,
        }
    }
}

impl From<Items> for Settings {
    fn from(items: Items) -> Self {
        Settings::from_items(&items)
    }
}

impl From<Settings> for Items {
    fn from(settings: Settings) -> Self {
        settings.to_items()
    }
}

impl Settings {
    /// The default settings as store items, used as the defaults argument of
    /// [`crate::store::SettingsStore::get`].
    pub fn default_items() -> Items {
        Settings::default().to_items()
    }

    /// Builds settings from stored items, starting from the defaults.
    pub fn from_items(items: &Items) -> Self {
        let mut settings = Settings::default();
        for (key, value) in items {
            if !settings.apply_item(key, Some(value)) {
                debug!("Ignoring unknown settings key '{}'.", key);
            }
        }
        settings
    }

    pub fn to_items(&self) -> Items {
        let mut items = Items::new();
        items.insert(KEY_MODE.to_string(), Value::String(self.mode.to_string()));
        items.insert(KEY_ALLOW_LIST.to_string(), string_array(&self.allow_list));
        items.insert(KEY_DENY_LIST.to_string(), string_array(&self.deny_list));
        items.insert(KEY_COLLAPSE_NEWLINES.to_string(), Value::Bool(self.collapse_newlines));
        items.insert(KEY_APPLY_ON_PASTE.to_string(), Value::Bool(self.apply_on_paste));
        items
    }

    pub fn list(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Allow => &self.allow_list,
            ListKind::Deny => &self.deny_list,
        }
    }

    /// Overwrites a single key. `None` means the key was removed from the
    /// store, which restores its default. Returns `false` for unknown keys.
    pub fn apply_item(&mut self, key: &str, value: Option<&Value>) -> bool {
        let defaults = Settings::default();
        match key {
            KEY_MODE => self.mode = value.map(Mode::from_value).unwrap_or(defaults.mode),
            KEY_ALLOW_LIST => {
                self.allow_list = value.map(normalize_patterns).unwrap_or(defaults.allow_list)
            }
            KEY_DENY_LIST => {
                self.deny_list = value.map(normalize_patterns).unwrap_or(defaults.deny_list)
            }
            KEY_COLLAPSE_NEWLINES => {
                self.collapse_newlines = value.map(truthy).unwrap_or(defaults.collapse_newlines)
            }
            KEY_APPLY_ON_PASTE => {
                self.apply_on_paste = value.map(truthy).unwrap_or(defaults.apply_on_paste)
            }
            _ => return false,
        }
        true
    }

    /// Folds a change notification into the cached settings.
    ///
    /// Returns `true` if at least one known key was updated.
    pub fn apply_changes(&mut self, change_set: &ChangeSet) -> bool {
        let mut changed = false;
        for (key, change) in &change_set.changes {
            if self.apply_item(key, change.new_value.as_ref()) {
                changed = true;
            } else {
                debug!("Ignoring change to unknown settings key '{}'.", key);
            }
        }
        changed
    }

    /// Loads settings from a YAML (or JSON) document on disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrimfieldError> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| TrimfieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Items = serde_yml::from_str(&text)
            .map_err(|e| TrimfieldError::SettingsFormat(format!("{}: {}", path.display(), e)))?;
        Ok(Settings::from_items(&items))
    }
}

/// Splits free text from a pattern textarea into trimmed, non-empty entries.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split('\n')
        .map(trim_text)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loose boolean conversion for stored toggles.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn string_array(entries: &[String]) -> Value {
    Value::Array(entries.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(value: Value) -> Items {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn defaults_match_extension_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mode, Mode::All);
        assert!(settings.allow_list.is_empty());
        assert!(!settings.collapse_newlines);
        assert!(settings.apply_on_paste);
    }

    #[test]
    fn unknown_mode_behaves_as_all() {
        let s = Settings::from_items(&items(json!({ "mode": "sometimes" })));
        assert_eq!(s.mode, Mode::All);
        let s = Settings::from_items(&items(json!({ "mode": 3 })));
        assert_eq!(s.mode, Mode::All);
    }

    #[test]
    fn lists_accept_arrays_and_newline_text() {
        let s = Settings::from_items(&items(json!({
            "allowList": ["  example.com ", "", "*.test/*"],
            "denyList": "a.com\r\n\n  b.com  \n",
        })));
        assert_eq!(s.allow_list, vec!["example.com", "*.test/*"]);
        assert_eq!(s.deny_list, vec!["a.com", "b.com"]);
    }

    #[test]
    fn non_list_values_become_empty() {
        let s = Settings::from_items(&items(json!({ "allowList": 42 })));
        assert!(s.allow_list.is_empty());
    }

    #[test]
    fn toggles_use_truthiness() {
        let s = Settings::from_items(&items(json!({
            "collapseNewlines": 1,
            "applyOnPaste": "",
        })));
        assert!(s.collapse_newlines);
        assert!(!s.apply_on_paste);
    }

    #[test]
    fn removed_key_restores_default() {
        let mut s = Settings::from_items(&items(json!({ "applyOnPaste": false, "mode": "deny" })));
        assert!(s.apply_item(KEY_APPLY_ON_PASTE, None));
        assert!(s.apply_item(KEY_MODE, None));
        assert!(s.apply_on_paste);
        assert_eq!(s.mode, Mode::All);
    }

    #[test]
    fn items_round_trip_through_serde() {
        let s = Settings {
            mode: Mode::Deny,
            deny_list: vec!["*://ads.example/*".to_string()],
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"denyList\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn parse_list_trims_and_drops_blank_lines() {
        assert_eq!(parse_list(" a \r\n\r\n b\n   \n"), vec!["a", "b"]);
        assert!(parse_list("").is_empty());
    }
}
