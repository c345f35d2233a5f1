//! The per-page content session.
//!
//! A [`ContentSession`] is the state a content script keeps for one page: the
//! cached settings (loaded at startup and refreshed by store notifications),
//! whether field listeners have been installed, and the registry of fields
//! that have a listener attached. Browser events are handed to it as plain
//! structs and it answers with the edit the page should perform, if any.
//!
//! Everything here is synchronous and runs on one thread; readers always see
//! the settings as of the last processed notification.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cleaner::clean;
use crate::dom::{Element, ElementId, FieldKind, FieldSelector};
use crate::errors::TrimfieldError;
use crate::rules::matcher::should_apply;
use crate::settings::Settings;
use crate::store::{ChangeReceiver, ChangeSet, SettingsStore, StorageArea};

/// A field lost focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurEvent {
    pub target: ElementId,
    /// The field's current value; `None` for elements without a string value.
    #[serde(default)]
    pub value: Option<String>,
}

/// Text is about to be pasted into a field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteEvent {
    pub target: ElementId,
    /// Plain-text clipboard payload, if the clipboard could be read.
    #[serde(default)]
    pub clipboard: Option<String>,
    /// Current value of a text control.
    #[serde(default)]
    pub value: Option<String>,
    /// Selection bounds within `value`, in characters.
    #[serde(default)]
    pub selection_start: Option<usize>,
    #[serde(default)]
    pub selection_end: Option<usize>,
}

/// One batch of tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    #[serde(default)]
    pub added_nodes: Vec<Element>,
}

/// What the page should do after a blur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Select the whole field, insert `value` in its place, then blur again.
    ReplaceAll { value: String },
}

/// What the page should do with a paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PasteOutcome {
    /// Let the browser paste normally.
    Default,
    /// Suppress the default paste and insert `text` instead.
    Insert {
        text: String,
        /// Resulting value of a text control.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// Caret position after insertion, in characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caret: Option<usize>,
    },
}

/// Fields with a listener attached, deduplicated by identity.
#[derive(Debug, Clone, Default)]
pub struct AttachmentRegistry {
    fields: HashMap<ElementId, FieldKind>,
}

impl AttachmentRegistry {
    /// Returns `true` if the field was not attached before.
    pub fn attach(&mut self, id: ElementId, kind: FieldKind) -> bool {
        if self.fields.contains_key(&id) {
            return false;
        }
        self.fields.insert(id, kind);
        true
    }

    pub fn kind_of(&self, id: ElementId) -> Option<FieldKind> {
        self.fields.get(&id).copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.fields.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Content-script state for a single page.
#[derive(Debug)]
pub struct ContentSession {
    page_url: String,
    settings: Settings,
    initialized: bool,
    selector: FieldSelector,
    registry: AttachmentRegistry,
    changes: Option<ChangeReceiver>,
}

impl ContentSession {
    /// A session with default settings that has not loaded anything yet.
    pub fn new(page_url: &str, settings: Settings) -> Self {
        Self {
            page_url: page_url.to_string(),
            settings,
            initialized: false,
            selector: FieldSelector,
            registry: AttachmentRegistry::default(),
            changes: None,
        }
    }

    /// Loads settings from `store`, subscribes to its changes and installs
    /// listeners if cleaning is active on this page.
    pub fn start<S: SettingsStore>(
        store: &mut S,
        page_url: &str,
        document: &Element,
    ) -> Result<Self, TrimfieldError> {
        let settings = store.load_settings()?;
        debug!("Initial settings for {}: {:?}", page_url, settings);

        let mut session = ContentSession::new(page_url, settings);
        session.changes = Some(store.subscribe());
        if session.is_active() {
            session.init(document);
        } else {
            info!("Cleaning is not active on {}; waiting for settings changes.", page_url);
        }
        Ok(session)
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn registry(&self) -> &AttachmentRegistry {
        &self.registry
    }

    /// Whether the cached settings enable cleaning on this page right now.
    pub fn is_active(&self) -> bool {
        should_apply(&self.settings, &self.page_url)
    }

    /// Attaches every field in `document` and starts observing mutations.
    pub fn init(&mut self, document: &Element) {
        let attached = self.attach_all(document);
        self.initialized = true;
        info!("Attached to {} field(s) on {}.", attached, self.page_url);
    }

    fn attach_all(&mut self, root: &Element) -> usize {
        let mut attached = 0;
        for el in self.selector.fields_in(root) {
            if let Some(kind) = self.selector.kind_of(el) {
                if self.registry.attach(el.id, kind) {
                    attached += 1;
                }
            }
        }
        attached
    }

    /// Folds a store notification into the cached settings.
    ///
    /// Listeners are installed the first time the page becomes active. They
    /// are never removed; each event re-checks activation instead.
    pub fn on_storage_changed(&mut self, change_set: &ChangeSet, document: &Element) {
        if change_set.area != StorageArea::Sync {
            return;
        }
        if !self.settings.apply_changes(change_set) {
            return;
        }
        debug!("Settings changed: {:?}", self.settings);

        if !self.initialized && self.is_active() {
            self.init(document);
        }
    }

    /// Drains notifications queued by the store since the last call.
    /// Returns the number of change sets processed.
    pub fn process_pending_changes(&mut self, document: &Element) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.changes.as_mut() {
            while let Ok(change_set) = rx.try_recv() {
                pending.push(change_set);
            }
        }
        let count = pending.len();
        for change_set in pending {
            self.on_storage_changed(&change_set, document);
        }
        count
    }

    /// Attaches listeners to fields added by a batch of mutations.
    /// Returns the number of newly attached fields.
    pub fn on_mutations(&mut self, records: &[MutationRecord]) -> usize {
        if !self.initialized {
            return 0;
        }
        let attached: usize = records
            .iter()
            .flat_map(|record| record.added_nodes.iter())
            .map(|node| self.attach_all(node))
            .sum();
        if attached > 0 {
            debug!("Attached to {} new field(s).", attached);
        }
        attached
    }

    /// Handles a field losing focus.
    pub fn on_blur(&self, event: &BlurEvent) -> Option<FieldEdit> {
        if !self.registry.contains(event.target) || !self.is_active() {
            return None;
        }
        let before = event.value.as_deref()?;
        let after = clean(&self.settings, before);
        if after == before {
            return None;
        }
        debug!("Blur on {} changed value {:?} -> {:?}", event.target, before, after);
        Some(FieldEdit::ReplaceAll { value: after })
    }

    /// Handles a paste into a field.
    pub fn on_paste(&self, event: &PasteEvent) -> PasteOutcome {
        let Some(kind) = self.registry.kind_of(event.target) else {
            return PasteOutcome::Default;
        };
        if !self.is_active() || !self.settings.apply_on_paste {
            return PasteOutcome::Default;
        }
        let text = match event.clipboard.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!("No clipboard text for paste on {}.", event.target);
                return PasteOutcome::Default;
            }
        };

        let cleaned = clean(&self.settings, text);
        debug!("Paste on {} cleaned {:?} -> {:?}", event.target, text, cleaned);

        match kind {
            FieldKind::TextControl => {
                let value = event.value.as_deref().unwrap_or_default();
                let (new_value, caret) =
                    splice_selection(value, event.selection_start, event.selection_end, &cleaned);
                PasteOutcome::Insert { text: cleaned, value: Some(new_value), caret: Some(caret) }
            }
            FieldKind::Editable => PasteOutcome::Insert { text: cleaned, value: None, caret: None },
        }
    }
}

/// Replaces the selected character range of `value` with `insert`.
///
/// Missing bounds default to the end of the value; bounds are clamped and
/// ordered. Returns the new value and the caret position after the insert.
pub fn splice_selection(
    value: &str,
    start: Option<usize>,
    end: Option<usize>,
    insert: &str,
) -> (String, usize) {
    let len = value.chars().count();
    let start = start.unwrap_or(len).min(len);
    let end = end.unwrap_or(len).min(len).max(start);

    let byte_at = |char_idx: usize| {
        value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(value.len())
    };
    let (head, tail) = (&value[..byte_at(start)], &value[byte_at(end)..]);

    let mut out = String::with_capacity(head.len() + insert.len() + tail.len());
    out.push_str(head);
    out.push_str(insert);
    out.push_str(tail);
    (out, start + insert.chars().count())
}
