// trimfield/src/commands/settings.rs
//! `settings` command: view and edit the stored settings through the panel model.

use anyhow::{bail, Context, Result};
use log::info;
use std::io::Write;
use std::time::Instant;

use trimfield_core::{FileStore, Settings, SettingsStore};

use crate::cli::{FlagName, SettingsCommand};
use crate::commands::status_msg;
use crate::panel::{AddOutcome, FormState, SettingsPanel, STATUS_SAVED, STATUS_SAVE_FAILED};
use crate::ui::output_format::MessageKind;

/// Runs one `settings` subcommand against `store`.
pub fn run_settings<W: Write>(
    store: FileStore,
    command: &SettingsCommand,
    writer: &mut W,
    quiet: bool,
) -> Result<()> {
    let store_path = store.path().to_path_buf();
    let mut panel = SettingsPanel::new(store);
    panel
        .load_and_populate()
        .with_context(|| format!("Failed to load settings from {}", store_path.display()))?;

    match command {
        SettingsCommand::Show { json } => {
            if *json {
                let items = panel.store().get(&Settings::default_items())?;
                writeln!(writer, "{}", serde_json::to_string_pretty(&items)?)?;
            } else {
                write_form(writer, panel.form())?;
            }
            return Ok(());
        }
        SettingsCommand::Mode { mode } => {
            panel.select_mode(*mode);
        }
        SettingsCommand::List { list, patterns } => {
            panel.edit_list(*list, patterns, Instant::now());
            panel.commit_list(*list);
        }
        SettingsCommand::Flag { name, state } => {
            match name {
                FlagName::CollapseNewlines => panel.set_collapse_newlines(state.enabled()),
                FlagName::ApplyOnPaste => panel.set_apply_on_paste(state.enabled()),
            };
        }
        SettingsCommand::AddUrl { url } => {
            report_add(panel.add_tab_url(Some(url)), quiet);
        }
        SettingsCommand::AddDomain { url } => {
            report_add(panel.add_tab_domain(Some(url)), quiet);
        }
        SettingsCommand::Import { path } => {
            let settings = Settings::load_from_file(path)?;
            info!("Importing settings from {}", path.display());
            panel.import_settings(&settings);
        }
        SettingsCommand::Reset => {
            panel.reset_to_defaults();
        }
    }

    finish(&panel, quiet)
}

fn report_add(outcome: Option<AddOutcome>, quiet: bool) {
    if let Some(AddOutcome::Added(kind)) = outcome {
        status_msg(MessageKind::Info, format!("Added to the {} list.", kind.key()), quiet);
    }
}

/// Prints the panel's status line and fails if the last write did not land.
fn finish(panel: &SettingsPanel<FileStore>, quiet: bool) -> Result<()> {
    match panel.status() {
        Some(STATUS_SAVE_FAILED) => bail!("{} (store: {})", STATUS_SAVE_FAILED, panel.store().path().display()),
        Some(STATUS_SAVED) => status_msg(MessageKind::Success, STATUS_SAVED, quiet),
        Some(message) => status_msg(MessageKind::Warn, message, quiet),
        None => {}
    }
    Ok(())
}

fn write_form<W: Write>(writer: &mut W, form: &FormState) -> Result<()> {
    writeln!(writer, "mode: {}", form.mode)?;
    writeln!(writer, "collapseNewlines: {}", form.collapse_newlines)?;
    writeln!(writer, "applyOnPaste: {}", form.apply_on_paste)?;
    for (label, text) in [("allowList", &form.allow_text), ("denyList", &form.deny_text)] {
        if text.is_empty() {
            writeln!(writer, "{}: (empty)", label)?;
        } else {
            writeln!(writer, "{}:", label)?;
            for line in text.lines() {
                writeln!(writer, "  {}", line)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FlagState;
    use tempfile::tempdir;
    use trimfield_core::{ListKind, Mode};

    fn run(store: &std::path::Path, command: SettingsCommand) -> Result<String> {
        let mut out = Vec::new();
        run_settings(FileStore::new(store), &command, &mut out, true)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn edits_are_persisted() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");

        run(&path, SettingsCommand::Mode { mode: Mode::Allow })?;
        run(&path, SettingsCommand::List { list: ListKind::Allow, patterns: "a.com\n\n b.com ".into() })?;
        run(&path, SettingsCommand::Flag { name: FlagName::ApplyOnPaste, state: FlagState::Off })?;
        run(&path, SettingsCommand::AddDomain { url: "https://c.com/path".into() })?;

        let settings = FileStore::new(&path).load_settings()?;
        assert_eq!(settings.mode, Mode::Allow);
        assert_eq!(settings.allow_list, vec!["a.com", "b.com", "*://c.com/*"]);
        assert!(!settings.apply_on_paste);
        Ok(())
    }

    #[test]
    fn show_lists_defaults() -> Result<()> {
        let dir = tempdir()?;
        let out = run(&dir.path().join("settings.json"), SettingsCommand::Show { json: false })?;
        assert!(out.contains("mode: all"));
        assert!(out.contains("applyOnPaste: true"));
        assert!(out.contains("allowList: (empty)"));
        Ok(())
    }

    #[test]
    fn unwritable_store_fails() -> Result<()> {
        let dir = tempdir()?;
        // A directory in place of the store file can be neither read nor replaced.
        let path = dir.path().join("settings.json");
        std::fs::create_dir(&path)?;
        let mut out = Vec::new();
        let result = run_settings(
            FileStore::new(&path),
            &SettingsCommand::Mode { mode: Mode::Deny },
            &mut out,
            true,
        );
        assert!(result.is_err());
        Ok(())
    }
}
