// trimfield/src/main.rs
//! trimfield entry point.
//!
//! Parses the command line, sets up logging and dispatches to the command
//! implementations in [`trimfield::commands`].

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use log::debug;
use std::io;

use trimfield::cli::{Cli, Commands};
use trimfield::commands::{self, check, clean, paste, replay, settings, status_msg};
use trimfield::logger;
use trimfield::ui::output_format::{self, MessageKind};
use trimfield_core::{MemoryStore, SettingsStore};

fn main() {
    if let Err(e) = run() {
        let supports_color = io::stderr().is_terminal();
        let _ = output_format::print_error_message(&mut io::stderr(), &format!("{:#}", e), supports_color);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug, cli.disable_debug));
    debug!("Parsed arguments: {:?}", cli);

    let store = commands::open_store(cli.store.clone())?;

    match &cli.command {
        Commands::Clean(args) => {
            let settings = store.load_settings()?;
            let opts = clean::CleanOptions {
                input: commands::read_input(args.input_file.as_deref())?,
                output_path: args.output.clone(),
                url: args.url.clone(),
                diff: args.diff,
                collapse_newlines: args.collapse_newlines,
            };
            let outcome = clean::run_clean(&settings, &opts)?;
            if !outcome.applied {
                status_msg(MessageKind::Info, "Rules do not apply to this URL; input left unchanged.", cli.quiet);
            }
        }
        Commands::Check { url } => {
            let settings = store.load_settings()?;
            check::run_check(&settings, url, &mut io::stdout().lock())?;
        }
        Commands::Paste { url } => {
            let settings = store.load_settings()?;
            match paste::run_paste(&settings, url.as_deref(), &mut io::stdout().lock())? {
                paste::PasteResult::Empty => {
                    status_msg(MessageKind::Warn, "Clipboard holds no text.", cli.quiet)
                }
                paste::PasteResult::Skipped => {
                    status_msg(MessageKind::Info, "Paste cleaning does not apply; clipboard left unchanged.", cli.quiet)
                }
                paste::PasteResult::Unchanged(_) => {
                    status_msg(MessageKind::Info, "Clipboard text was already clean.", cli.quiet)
                }
                paste::PasteResult::Cleaned(_) => {
                    status_msg(MessageKind::Success, "Clipboard text cleaned.", cli.quiet)
                }
            }
        }
        Commands::Replay(args) => {
            let input = commands::read_input(args.input_file.as_deref())?;
            let mut memory = MemoryStore::with_items(
                store
                    .read_items()
                    .with_context(|| format!("Failed to read settings from {}", store.path().display()))?,
            );
            replay::run_replay(&mut memory, &args.url, &input, &mut io::stdout().lock())?;
        }
        Commands::Settings(command) => {
            settings::run_settings(store, command, &mut io::stdout().lock(), cli.quiet)?;
        }
    }

    Ok(())
}
