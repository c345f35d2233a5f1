//! Small helpers shared by the commands and the settings panel.

pub mod clipboard;
pub mod debounce;
