// trimfield/src/cli.rs
//! This file defines the command-line interface (CLI) for the trimfield application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trimfield_core::{ListKind, Mode};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "trimfield",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Trim and tidy text for form fields, gated by per-site URL rules",
    long_about = "trimfield trims surrounding whitespace from text and optionally collapses runs of blank lines. Cleaning can be limited to, or excluded from, pages whose URL matches wildcard patterns. Settings are kept in a small JSON store shared by every command.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging for the trimfield crates.
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Explicitly disable debug logging, even if RUST_LOG is set to DEBUG
    #[arg(long = "disable-debug", global = true, help = "Disable debug logging, overriding RUST_LOG.")]
    pub disable_debug: bool,

    /// Path of the settings store.
    #[arg(
        long = "store",
        value_name = "FILE",
        env = "TRIMFIELD_STORE",
        global = true,
        help = "Path of the JSON settings store (defaults to the user config directory)."
    )]
    pub store: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `trimfield` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cleans an input file or stdin with the stored settings.
    #[command(about = "Cleans an input file or stdin with the stored settings.")]
    Clean(CleanCommand),

    /// Reports whether cleaning is active for a URL.
    #[command(about = "Reports whether cleaning is active for a URL.")]
    Check {
        /// The page URL to test against the rules.
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Cleans the system clipboard text in place.
    #[command(about = "Cleans the system clipboard text in place, as a paste would.")]
    Paste {
        /// Only clean if the rules apply to this page URL.
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },

    /// Replays recorded page events against a content session.
    #[command(about = "Replays JSON-line page events (document, blur, paste, mutation, storage) against a content session.")]
    Replay(ReplayCommand),

    /// Views and edits the settings.
    #[command(subcommand, about = "Views and edits the settings.")]
    Settings(SettingsCommand),
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write cleaned output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Only clean if the rules apply to this page URL.
    #[arg(long, value_name = "URL", help = "Only clean if the rules apply to this page URL.")]
    pub url: Option<String>,

    /// Show a unified diff of the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Collapse blank lines for this run regardless of the stored setting.
    #[arg(long = "collapse-newlines", help = "Collapse runs of blank lines for this run.")]
    pub collapse_newlines: bool,
}

/// Arguments for the `replay` command.
#[derive(Parser, Debug)]
pub struct ReplayCommand {
    /// URL of the page the events were recorded on.
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// Path to a JSON-lines event file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: Option<PathBuf>,
}

/// Subcommands for the `settings` command.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    #[command(about = "Shows the current settings.")]
    Show {
        /// Print the raw store items as JSON.
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Selects the activation mode.")]
    Mode {
        #[arg(value_name = "MODE", value_parser = parse_mode)]
        mode: Mode,
    },
    #[command(about = "Replaces a pattern list with newline-separated patterns.")]
    List {
        /// Which list to replace: 'allow' or 'deny'.
        #[arg(value_name = "LIST", value_parser = parse_list_kind)]
        list: ListKind,
        /// Newline-separated patterns; blank lines are ignored.
        #[arg(value_name = "PATTERNS")]
        patterns: String,
    },
    #[command(about = "Turns a cleaning option on or off.")]
    Flag {
        #[arg(value_name = "NAME", value_enum)]
        name: FlagName,
        #[arg(value_name = "STATE", value_enum)]
        state: FlagState,
    },
    #[command(about = "Adds a page URL to the list for the current mode.")]
    AddUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
    #[command(about = "Adds a '*://host/*' pattern for a URL to the list for the current mode.")]
    AddDomain {
        #[arg(value_name = "URL")]
        url: String,
    },
    #[command(about = "Imports settings from a YAML or JSON file.")]
    Import {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    #[command(about = "Restores every setting to its default.")]
    Reset,
}

/// The two boolean cleaning options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FlagName {
    /// Collapse runs of blank lines.
    CollapseNewlines,
    /// Clean clipboard text before pasting.
    ApplyOnPaste,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FlagState {
    On,
    Off,
}

impl FlagState {
    pub fn enabled(self) -> bool {
        self == FlagState::On
    }
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse()
}

fn parse_list_kind(s: &str) -> Result<ListKind, String> {
    s.parse()
}
