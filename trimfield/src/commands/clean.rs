// trimfield/src/commands/clean.rs
//! `clean` command: tidy text from a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use trimfield_core::{headless_clean, CleanOutcome, Settings};

use crate::ui::diff_viewer;

/// Options for a single `clean` run.
pub struct CleanOptions {
    pub input: String,
    pub output_path: Option<PathBuf>,
    pub url: Option<String>,
    pub diff: bool,
    pub collapse_newlines: bool,
}

/// Cleans `opts.input` with `settings` and writes the result.
pub fn run_clean(settings: &Settings, opts: &CleanOptions) -> Result<CleanOutcome> {
    info!("Starting clean operation.");

    let mut settings = settings.clone();
    if opts.collapse_newlines {
        settings.collapse_newlines = true;
    }

    let outcome = headless_clean(&settings, opts.url.as_deref(), &opts.input);
    debug!(
        "Input cleaned. Original length: {}, cleaned length: {}, applied: {}",
        opts.input.len(),
        outcome.text.len(),
        outcome.applied
    );

    match &opts.output_path {
        Some(path) => {
            info!("Writing cleaned content to file: {}", path.display());
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_result(&mut file, opts, &outcome, false)?;
        }
        None => {
            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            let mut writer = stdout.lock();
            write_result(&mut writer, opts, &outcome, supports_color)?;
        }
    }

    info!("Clean operation completed.");
    Ok(outcome)
}

fn write_result<W: Write>(
    writer: &mut W,
    opts: &CleanOptions,
    outcome: &CleanOutcome,
    supports_color: bool,
) -> Result<()> {
    if opts.diff {
        diff_viewer::print_diff(&opts.input, &outcome.text, writer, supports_color)?;
    } else if outcome.applied {
        writeln!(writer, "{}", outcome.text)?;
    } else {
        // Untouched input is passed through byte for byte.
        write!(writer, "{}", outcome.text)?;
    }
    Ok(())
}
