// trimfield-core/tests/store_integration_tests.rs
use anyhow::Result;
use serde_json::json;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use test_log::test;

use trimfield_core::settings::{Items, Mode, Settings};
use trimfield_core::store::{FileStore, SettingsStore};
use trimfield_core::TrimfieldError;

fn items(value: serde_json::Value) -> Items {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_missing_store_reads_defaults() -> Result<()> {
    let dir = tempdir()?;
    let store = FileStore::new(dir.path().join("nested").join("settings.json"));
    let settings = store.load_settings()?;
    assert_eq!(settings, Settings::default());
    Ok(())
}

#[test]
fn test_set_persists_and_notifies() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    let mut store = FileStore::new(&path);
    let mut rx = store.subscribe();

    store.set(items(json!({ "mode": "allow", "allowList": ["*://example.com/*"] })))?;

    let reopened = FileStore::new(&path);
    let settings = reopened.load_settings()?;
    assert_eq!(settings.mode, Mode::Allow);
    assert_eq!(settings.allow_list, vec!["*://example.com/*"]);

    let change_set = rx.try_recv()?;
    assert_eq!(change_set.changes.len(), 2);
    assert_eq!(change_set.changes["mode"].new_value, Some(json!("allow")));
    Ok(())
}

#[test]
fn test_unchanged_write_is_not_broadcast() -> Result<()> {
    let dir = tempdir()?;
    let mut store = FileStore::new(dir.path().join("settings.json"));
    store.set(items(json!({ "collapseNewlines": true })))?;

    let mut rx = store.subscribe();
    store.set(items(json!({ "collapseNewlines": true })))?;
    assert!(rx.try_recv().is_err());
    Ok(())
}

#[test]
fn test_remove_restores_default() -> Result<()> {
    let dir = tempdir()?;
    let mut store = FileStore::new(dir.path().join("settings.json"));
    store.set(items(json!({ "applyOnPaste": false })))?;
    assert!(!store.load_settings()?.apply_on_paste);

    store.remove(&["applyOnPaste"])?;
    assert!(store.load_settings()?.apply_on_paste);
    Ok(())
}

#[test]
fn test_corrupt_store_is_an_error() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"[1, 2, 3]")?;
    let store = FileStore::new(file.path());
    assert!(matches!(store.load_settings(), Err(TrimfieldError::StoreFormat(_, _))));

    let mut file = NamedTempFile::new()?;
    file.write_all(b"{ not json")?;
    let store = FileStore::new(file.path());
    assert!(matches!(store.load_settings(), Err(TrimfieldError::StoreFormat(_, _))));
    Ok(())
}

#[test]
fn test_empty_store_file_reads_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"  \n")?;
    let store = FileStore::new(file.path());
    assert_eq!(store.load_settings()?, Settings::default());
    Ok(())
}

#[test]
fn test_load_settings_from_yaml_file() -> Result<()> {
    let yaml_content = r#"
mode: deny
denyList: |
  *://bank.example/*

  intranet.local
collapseNewlines: true
unknownKey: 12
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let settings = Settings::load_from_file(file.path())?;
    assert_eq!(settings.mode, Mode::Deny);
    assert_eq!(settings.deny_list, vec!["*://bank.example/*", "intranet.local"]);
    assert!(settings.collapse_newlines);
    assert!(settings.apply_on_paste);
    Ok(())
}

#[test]
fn test_load_settings_rejects_non_mapping_documents() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"- just\n- a list\n")?;
    assert!(matches!(
        Settings::load_from_file(file.path()),
        Err(TrimfieldError::SettingsFormat(_))
    ));
    Ok(())
}
