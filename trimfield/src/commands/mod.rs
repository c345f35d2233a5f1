// trimfield/src/commands/mod.rs
//! Command implementations for the trimfield CLI.

pub mod check;
pub mod clean;
pub mod paste;
pub mod replay;
pub mod settings;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use trimfield_core::FileStore;

use crate::ui::output_format::{self, MessageKind};

/// Opens the settings store at `path`, or at the default location.
pub fn open_store(path: Option<PathBuf>) -> Result<FileStore> {
    let path = match path {
        Some(path) => path,
        None => FileStore::default_path()
            .context("Could not determine a config directory; pass --store or set TRIMFIELD_STORE")?,
    };
    debug!("Using settings store at {}", path.display());
    Ok(FileStore::new(path))
}

/// Reads all input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            debug!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Helper for printing a status message to stderr.
pub fn status_msg(kind: MessageKind, msg: impl AsRef<str>, quiet: bool) {
    if quiet && kind != MessageKind::Error {
        return;
    }
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_message(&mut io::stderr(), kind, msg.as_ref(), supports_color);
}
