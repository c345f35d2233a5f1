// trimfield/src/lib.rs
//! # trimfield CLI Application
//!
//! This crate provides the command-line front end for `trimfield-core`:
//! cleaning text from files, stdin or the clipboard, checking which pages the
//! URL rules enable, replaying recorded page events against a content session,
//! and editing the shared settings store through the settings panel model.
//!
//! License: MIT OR Apache-2.0

pub mod cli;
pub mod commands;
pub mod logger;
pub mod panel;
pub mod ui;
pub mod utils;
