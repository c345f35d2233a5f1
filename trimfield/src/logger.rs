// trimfield/src/logger.rs
//! Logging setup for the trimfield binary.
//!
//! Log output goes to stderr through `env_logger`. Without flags the level is
//! taken from `RUST_LOG`, falling back to `warn`.

use env_logger::{Builder, Env};
use log::LevelFilter;

const TRIMFIELD_TARGETS: &[&str] = &["trimfield", "trimfield_core"];

/// Initializes the global logger.
///
/// `level` forces a level for the trimfield crates; `None` defers to `RUST_LOG`.
/// Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        for target in TRIMFIELD_TARGETS {
            builder.filter_module(target, level);
        }
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

/// Maps the global CLI flags to a forced level.
pub fn level_from_flags(quiet: bool, debug: bool, disable_debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug && !disable_debug {
        Some(LevelFilter::Debug)
    } else if disable_debug {
        Some(LevelFilter::Info)
    } else {
        None
    }
}
