//! Persistent key-value settings storage with change notifications.
//!
//! The [`SettingsStore`] trait mirrors a browser extension's synced storage
//! area: values are read with defaults, written as partial updates, and every
//! write that actually changes something is broadcast to subscribers as a
//! [`ChangeSet`]. Two implementations are provided: [`FileStore`], which keeps
//! a JSON object on disk, and [`MemoryStore`], used for replays and tests.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::errors::TrimfieldError;
use crate::settings::{Items, Settings};

const STORE_DIR_NAME: &str = "trimfield";
const STORE_FILE_NAME: &str = "settings.json";
const STORE_FILE_TMP_SUFFIX: &str = ".tmp";

/// Which storage area a change originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    #[default]
    Sync,
    Local,
}

/// The before/after values of a single key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    /// `None` when the key was removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// A batch of key changes produced by one write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub area: StorageArea,
    pub changes: BTreeMap<String, StorageChange>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Receiving half of a store subscription.
pub type ChangeReceiver = mpsc::UnboundedReceiver<ChangeSet>;

/// Key-value settings persistence.
pub trait SettingsStore {
    /// Returns the stored items overlaid on `defaults`.
    fn get(&self, defaults: &Items) -> Result<Items, TrimfieldError>;

    /// Writes a partial update and notifies subscribers of the keys that changed.
    fn set(&mut self, changes: Items) -> Result<(), TrimfieldError>;

    /// Removes keys, restoring their defaults for subsequent reads.
    fn remove(&mut self, keys: &[&str]) -> Result<(), TrimfieldError>;

    /// Registers for change notifications.
    fn subscribe(&mut self) -> ChangeReceiver;

    /// Convenience: reads the typed settings with the standard defaults.
    fn load_settings(&self) -> Result<Settings, TrimfieldError> {
        Ok(Settings::from_items(&self.get(&Settings::default_items())?))
    }
}

/// Fan-out list of subscription senders. Closed receivers are pruned on send.
#[derive(Debug, Default)]
struct Subscribers {
    senders: Vec<mpsc::UnboundedSender<ChangeSet>>,
}

impl Subscribers {
    fn subscribe(&mut self) -> ChangeReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    fn notify(&mut self, change_set: ChangeSet) {
        if change_set.is_empty() {
            return;
        }
        debug!("Notifying {} subscriber(s) of {} changed key(s).", self.senders.len(), change_set.changes.len());
        self.senders.retain(|tx| tx.send(change_set.clone()).is_ok());
    }
}

/// Applies `updates` to `current` in place and reports which keys changed.
/// A `None` update removes the key.
fn merge_updates(
    current: &mut Items,
    updates: impl IntoIterator<Item = (String, Option<Value>)>,
    area: StorageArea,
) -> ChangeSet {
    let mut change_set = ChangeSet { area, changes: BTreeMap::new() };
    for (key, new_value) in updates {
        let old_value = match &new_value {
            Some(value) => current.insert(key.clone(), value.clone()),
            None => current.remove(&key),
        };
        if old_value != new_value {
            change_set.changes.insert(key, StorageChange { old_value, new_value });
        }
    }
    change_set
}

fn overlay(defaults: &Items, stored: &Items) -> Items {
    let mut items = defaults.clone();
    for (key, value) in stored {
        items.insert(key.clone(), value.clone());
    }
    items
}

/// An in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Items,
    area: StorageArea,
    fail_writes: bool,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`.
    pub fn with_items(items: Items) -> Self {
        Self { items, ..Self::default() }
    }

    /// Makes every subsequent write fail, as a full or unavailable backend would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn items(&self) -> &Items {
        &self.items
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, defaults: &Items) -> Result<Items, TrimfieldError> {
        Ok(overlay(defaults, &self.items))
    }

    fn set(&mut self, changes: Items) -> Result<(), TrimfieldError> {
        if self.fail_writes {
            return Err(TrimfieldError::StoreWrite("memory store is read-only".to_string()));
        }
        let change_set = merge_updates(
            &mut self.items,
            changes.into_iter().map(|(k, v)| (k, Some(v))),
            self.area,
        );
        self.subscribers.notify(change_set);
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), TrimfieldError> {
        if self.fail_writes {
            return Err(TrimfieldError::StoreWrite("memory store is read-only".to_string()));
        }
        let change_set = merge_updates(
            &mut self.items,
            keys.iter().map(|k| (k.to_string(), None)),
            self.area,
        );
        self.subscribers.notify(change_set);
        Ok(())
    }

    fn subscribe(&mut self) -> ChangeReceiver {
        self.subscribers.subscribe()
    }
}

/// A store backed by a JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    subscribers: Subscribers,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), subscribers: Subscribers::default() }
    }

    /// `<config dir>/trimfield/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(STORE_DIR_NAME).join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TrimfieldError {
        TrimfieldError::Io { path: self.path.clone(), source }
    }

    /// Reads the stored items. A missing or empty file holds no items.
    pub fn read_items(&self) -> Result<Items, TrimfieldError> {
        if !self.path.exists() {
            debug!("Settings store {} does not exist yet.", self.path.display());
            return Ok(Items::new());
        }

        let mut f = OpenOptions::new().read(true).open(&self.path).map_err(|e| self.io_error(e))?;
        fs2::FileExt::lock_shared(&f).map_err(|e| self.io_error(e))?;
        let mut raw = Vec::new();
        let read = f.read_to_end(&mut raw);
        fs2::FileExt::unlock(&f).map_err(|e| self.io_error(e))?;
        read.map_err(|e| self.io_error(e))?;

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Items::new());
        }

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(items)) => Ok(items),
            Ok(other) => Err(TrimfieldError::StoreFormat(
                self.path.clone(),
                format!("found {}", json_kind(&other)),
            )),
            Err(e) => Err(TrimfieldError::StoreFormat(self.path.clone(), e.to_string())),
        }
    }

    fn write_items(&self, items: &Items) -> Result<(), TrimfieldError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(items)
            .map_err(|e| TrimfieldError::StoreWrite(e.to_string()))?;

        let tmp_path = self.path.with_extension(format!(
            "{}{}",
            self.path.extension().map(|s| s.to_string_lossy()).unwrap_or_default(),
            STORE_FILE_TMP_SUFFIX
        ));
        {
            let mut tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)
                .map_err(|e| self.io_error(e))?;
            fs2::FileExt::lock_exclusive(&tmp).map_err(|e| self.io_error(e))?;
            let written = tmp.write_all(&json).and_then(|_| tmp.flush());
            fs2::FileExt::unlock(&tmp).map_err(|e| self.io_error(e))?;
            written.map_err(|e| self.io_error(e))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn update(
        &mut self,
        updates: impl IntoIterator<Item = (String, Option<Value>)>,
    ) -> Result<(), TrimfieldError> {
        let mut items = self.read_items()?;
        let change_set = merge_updates(&mut items, updates, StorageArea::Sync);
        if change_set.is_empty() {
            debug!("Settings write changed nothing; skipping disk write.");
            return Ok(());
        }
        self.write_items(&items)?;
        self.subscribers.notify(change_set);
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, defaults: &Items) -> Result<Items, TrimfieldError> {
        Ok(overlay(defaults, &self.read_items()?))
    }

    fn set(&mut self, changes: Items) -> Result<(), TrimfieldError> {
        self.update(changes.into_iter().map(|(k, v)| (k, Some(v))))
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), TrimfieldError> {
        self.update(keys.iter().map(|k| (k.to_string(), None)))
    }

    fn subscribe(&mut self) -> ChangeReceiver {
        self.subscribers.subscribe()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(value: Value) -> Items {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn get_overlays_defaults() {
        let store = MemoryStore::with_items(items(json!({ "mode": "deny" })));
        let got = store.get(&Settings::default_items()).unwrap();
        assert_eq!(got["mode"], json!("deny"));
        assert_eq!(got["applyOnPaste"], json!(true));
    }

    #[test]
    fn set_notifies_only_changed_keys() {
        let mut store = MemoryStore::with_items(items(json!({ "mode": "all" })));
        let mut rx = store.subscribe();

        store.set(items(json!({ "mode": "all", "collapseNewlines": true }))).unwrap();
        let cs = rx.try_recv().unwrap();
        assert_eq!(cs.area, StorageArea::Sync);
        assert_eq!(cs.changes.len(), 1);
        let change = &cs.changes["collapseNewlines"];
        assert_eq!(change.old_value, None);
        assert_eq!(change.new_value, Some(json!(true)));

        store.set(items(json!({ "mode": "all" }))).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn remove_reports_removed_value() {
        let mut store = MemoryStore::with_items(items(json!({ "mode": "allow" })));
        let mut rx = store.subscribe();
        store.remove(&["mode", "missing"]).unwrap();
        let cs = rx.try_recv().unwrap();
        assert_eq!(cs.changes.len(), 1);
        assert_eq!(cs.changes["mode"].old_value, Some(json!("allow")));
        assert_eq!(cs.changes["mode"].new_value, None);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = MemoryStore::new();
        let rx = store.subscribe();
        drop(rx);
        store.set(items(json!({ "mode": "deny" }))).unwrap();
        assert!(store.subscribers.senders.is_empty());
    }

    #[test]
    fn failing_writes_leave_items_untouched() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.set(items(json!({ "mode": "deny" }))),
            Err(TrimfieldError::StoreWrite(_))
        ));
        assert!(store.items().is_empty());
    }

    #[test]
    fn change_set_serializes_in_storage_shape() {
        let mut changes = BTreeMap::new();
        changes.insert(
            "mode".to_string(),
            StorageChange { old_value: None, new_value: Some(json!("deny")) },
        );
        let cs = ChangeSet { area: StorageArea::Sync, changes };
        let text = serde_json::to_string(&cs).unwrap();
        assert_eq!(text, r#"{"area":"sync","changes":{"mode":{"newValue":"deny"}}}"#);
    }
}
