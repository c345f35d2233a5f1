//! The settings panel.
//!
//! [`SettingsPanel`] is the model behind the settings form: a mode selector,
//! two multi-line pattern lists, two toggles and the "add this page" actions.
//! Discrete controls write to the store immediately; the pattern textareas are
//! written after a short pause in typing, or as soon as they lose focus. Every
//! write reports its result on the status line.

pub mod status;

use log::{debug, warn};
use serde_json::Value;
use std::time::{Duration, Instant};

use trimfield_core::settings::{
    Items, KEY_APPLY_ON_PASTE, KEY_COLLAPSE_NEWLINES, KEY_MODE,
};
use trimfield_core::{domain_pattern, parse_list, ListKind, Mode, Settings, SettingsStore, TrimfieldError};

use crate::utils::debounce::Debouncer;
use status::{StatusLine, DEFAULT_STATUS_TIMEOUT};

/// Delay between the last keystroke in a pattern list and the write.
pub const LIST_SAVE_DELAY: Duration = Duration::from_millis(600);

pub const STATUS_LOADED: &str = "Loaded";
pub const STATUS_SAVED: &str = "Saved";
pub const STATUS_SAVE_FAILED: &str = "Save failed";
pub const STATUS_ALREADY_LISTED: &str = "Already in list";
pub const STATUS_SELECT_LIST_MODE: &str = "Select \"Allow\" or \"Deny\" mode to add to a list";
pub const STATUS_NO_TAB_URL: &str = "Cannot read active tab URL";

/// What the form currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub mode: Mode,
    pub allow_text: String,
    pub deny_text: String,
    pub collapse_newlines: bool,
    pub apply_on_paste: bool,
}

impl FormState {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            mode: settings.mode,
            allow_text: settings.allow_list.join("\n"),
            deny_text: settings.deny_list.join("\n"),
            collapse_newlines: settings.collapse_newlines,
            apply_on_paste: settings.apply_on_paste,
        }
    }

    pub fn list_text(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Allow => &self.allow_text,
            ListKind::Deny => &self.deny_text,
        }
    }

    fn list_text_mut(&mut self, kind: ListKind) -> &mut String {
        match kind {
            ListKind::Allow => &mut self.allow_text,
            ListKind::Deny => &mut self.deny_text,
        }
    }
}

/// Result of an "add to list" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(ListKind),
    AlreadyPresent,
    /// The selected mode has no list to add to.
    NoTargetList,
    SaveFailed,
}

/// The settings form bound to a store.
pub struct SettingsPanel<S: SettingsStore> {
    store: S,
    form: FormState,
    status: StatusLine,
    allow_edits: Debouncer<String>,
    deny_edits: Debouncer<String>,
}

impl<S: SettingsStore> SettingsPanel<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            form: FormState::from_settings(&Settings::default()),
            status: StatusLine::default(),
            allow_edits: Debouncer::new(LIST_SAVE_DELAY),
            deny_edits: Debouncer::new(LIST_SAVE_DELAY),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    fn into_store(self) -> S {
        self.store
    }

    /// The status message visible right now.
    pub fn status(&self) -> Option<&str> {
        self.status.message_at(Instant::now())
    }

    fn set_status(&mut self, message: &str, timeout: Duration) {
        self.status.set(message, timeout, Instant::now());
    }

    /// Reads the store and fills the form.
    pub fn load_and_populate(&mut self) -> Result<&FormState, TrimfieldError> {
        let settings = self.store.load_settings()?;
        self.form = FormState::from_settings(&settings);
        self.set_status(STATUS_LOADED, Duration::from_millis(800));
        Ok(&self.form)
    }

    /// Writes `changes` and reports the outcome on the status line.
    fn save(&mut self, changes: Items) -> bool {
        debug!("Saving settings keys: {:?}", changes.keys().collect::<Vec<_>>());
        match self.store.set(changes) {
            Ok(()) => {
                self.set_status(STATUS_SAVED, DEFAULT_STATUS_TIMEOUT);
                true
            }
            Err(e) => {
                warn!("Saving settings failed: {}", e);
                self.set_status(STATUS_SAVE_FAILED, DEFAULT_STATUS_TIMEOUT);
                false
            }
        }
    }

    fn save_one(&mut self, key: &str, value: Value) -> bool {
        let mut changes = Items::new();
        changes.insert(key.to_string(), value);
        self.save(changes)
    }

    pub fn select_mode(&mut self, mode: Mode) -> bool {
        self.form.mode = mode;
        self.save_one(KEY_MODE, Value::String(mode.to_string()))
    }

    pub fn set_collapse_newlines(&mut self, enabled: bool) -> bool {
        self.form.collapse_newlines = enabled;
        self.save_one(KEY_COLLAPSE_NEWLINES, Value::Bool(enabled))
    }

    pub fn set_apply_on_paste(&mut self, enabled: bool) -> bool {
        self.form.apply_on_paste = enabled;
        self.save_one(KEY_APPLY_ON_PASTE, Value::Bool(enabled))
    }

    fn edits(&mut self, kind: ListKind) -> &mut Debouncer<String> {
        match kind {
            ListKind::Allow => &mut self.allow_edits,
            ListKind::Deny => &mut self.deny_edits,
        }
    }

    fn save_list_text(&mut self, kind: ListKind, text: &str) -> bool {
        let entries = parse_list(text).into_iter().map(Value::String).collect();
        self.save_one(kind.key(), Value::Array(entries))
    }

    /// Records typing in a pattern list. The write happens on a later
    /// [`tick`](Self::tick) once the text has been stable for [`LIST_SAVE_DELAY`].
    pub fn edit_list(&mut self, kind: ListKind, text: &str, now: Instant) {
        *self.form.list_text_mut(kind) = text.to_string();
        self.edits(kind).schedule(text.to_string(), now);
    }

    /// Performs any debounced list writes that are due. Returns how many ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut saved = 0;
        for kind in [ListKind::Allow, ListKind::Deny] {
            if let Some(text) = self.edits(kind).poll(now) {
                self.save_list_text(kind, &text);
                saved += 1;
            }
        }
        saved
    }

    /// A pattern list lost focus: write its current text right away.
    pub fn commit_list(&mut self, kind: ListKind) -> bool {
        self.edits(kind).flush();
        let text = self.form.list_text(kind).to_string();
        self.save_list_text(kind, &text)
    }

    /// Appends `pattern` to the list used by the selected mode.
    pub fn add_to_list(&mut self, pattern: &str) -> AddOutcome {
        let Some(kind) = self.form.mode.target_list() else {
            self.set_status(STATUS_SELECT_LIST_MODE, Duration::from_millis(2000));
            return AddOutcome::NoTargetList;
        };

        let mut list = match self.store.load_settings() {
            Ok(settings) => settings.list(kind).to_vec(),
            Err(e) => {
                warn!("Could not read settings before adding a pattern: {}", e);
                self.set_status(STATUS_SAVE_FAILED, DEFAULT_STATUS_TIMEOUT);
                return AddOutcome::SaveFailed;
            }
        };

        if list.iter().any(|existing| existing == pattern) {
            self.set_status(STATUS_ALREADY_LISTED, Duration::from_millis(1000));
            return AddOutcome::AlreadyPresent;
        }

        list.push(pattern.to_string());
        let value = Value::Array(list.iter().cloned().map(Value::String).collect());
        if !self.save_one(kind.key(), value) {
            return AddOutcome::SaveFailed;
        }
        *self.form.list_text_mut(kind) = list.join("\n");
        AddOutcome::Added(kind)
    }

    /// Replaces every setting with `settings`, as an import would.
    pub fn import_settings(&mut self, settings: &Settings) -> bool {
        if !self.save(settings.to_items()) {
            return false;
        }
        self.form = FormState::from_settings(settings);
        true
    }

    /// Removes every stored key so that all settings read as defaults.
    pub fn reset_to_defaults(&mut self) -> bool {
        let keys: Vec<String> = Settings::default_items().keys().cloned().collect();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        match self.store.remove(&keys) {
            Ok(()) => {
                self.form = FormState::from_settings(&Settings::default());
                self.set_status(STATUS_SAVED, DEFAULT_STATUS_TIMEOUT);
                true
            }
            Err(e) => {
                warn!("Resetting settings failed: {}", e);
                self.set_status(STATUS_SAVE_FAILED, DEFAULT_STATUS_TIMEOUT);
                false
            }
        }
    }

    /// Adds the active tab's full URL.
    pub fn add_tab_url(&mut self, tab_url: Option<&str>) -> Option<AddOutcome> {
        let url = self.require_tab_url(tab_url)?;
        Some(self.add_to_list(&url))
    }

    /// Adds a `*://host/*` pattern for the active tab.
    pub fn add_tab_domain(&mut self, tab_url: Option<&str>) -> Option<AddOutcome> {
        let url = self.require_tab_url(tab_url)?;
        Some(self.add_to_list(&domain_pattern(&url)))
    }

    fn require_tab_url(&mut self, tab_url: Option<&str>) -> Option<String> {
        match tab_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Some(url.to_string()),
            None => {
                self.set_status(STATUS_NO_TAB_URL, DEFAULT_STATUS_TIMEOUT);
                None
            }
        }
    }
}
