//! Formatting of user-facing messages on the terminal.
//!
//! Messages go to the given writer (stderr in practice) and are colored only
//! when the caller says the stream supports it.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Severity of a message, which picks its color and prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

impl MessageKind {
    fn prefix(&self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Success => "ok",
            MessageKind::Warn => "warning",
            MessageKind::Error => "error",
        }
    }
}

/// Writes `[prefix] message` followed by a newline.
pub fn print_message<W: Write>(
    writer: &mut W,
    kind: MessageKind,
    message: &str,
    supports_color: bool,
) -> io::Result<()> {
    let prefix = kind.prefix();
    if !supports_color {
        return writeln!(writer, "[{}] {}", prefix, message);
    }
    match kind {
        MessageKind::Info => writeln!(writer, "[{}] {}", prefix.cyan(), message),
        MessageKind::Success => writeln!(writer, "[{}] {}", prefix.green(), message),
        MessageKind::Warn => writeln!(writer, "[{}] {}", prefix.yellow(), message.yellow()),
        MessageKind::Error => writeln!(writer, "[{}] {}", prefix.red().bold(), message.red()),
    }
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Error, message, supports_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut out = Vec::new();
        print_message(&mut out, MessageKind::Success, "Saved", false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[ok] Saved\n");
    }

    #[test]
    fn colored_output_contains_message() {
        let mut out = Vec::new();
        print_error_message(&mut out, "Save failed", true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("Save failed"));
    }
}
