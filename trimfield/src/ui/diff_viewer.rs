//! Unified diff rendering for `clean --diff`.
//!
//! Shows exactly which lines cleaning removed (red) and what replaced them (green).

use diffy::{create_patch, Line as DiffLine};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes a line-level diff of `original` against `cleaned`.
pub fn print_diff<W: Write>(
    original: &str,
    cleaned: &str,
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    let patch = create_patch(original, cleaned);

    if supports_color {
        writeln!(writer, "{}", "--- Diff View ---".yellow().bold())?;
    } else {
        writeln!(writer, "--- Diff View ---")?;
    }

    let mut changes = 0;
    for hunk in patch.hunks() {
        for line_change in hunk.lines() {
            match line_change {
                DiffLine::Delete(s) => {
                    changes += 1;
                    let line = format!("-{}", s.trim_end_matches('\n'));
                    if supports_color {
                        writeln!(writer, "{}", line.red())?;
                    } else {
                        writeln!(writer, "{}", line)?;
                    }
                }
                DiffLine::Insert(s) => {
                    changes += 1;
                    let line = format!("+{}", s.trim_end_matches('\n'));
                    if supports_color {
                        writeln!(writer, "{}", line.green())?;
                    } else {
                        writeln!(writer, "{}", line)?;
                    }
                }
                DiffLine::Context(s) => {
                    writeln!(writer, " {}", s.trim_end_matches('\n'))?;
                }
            }
        }
    }

    if changes == 0 {
        writeln!(writer, "No changes.")?;
    }
    writeln!(writer, "--- End Diff ---")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_removed_and_added_lines() {
        let mut out = Vec::new();
        print_diff("  a  \n\n\nb\n", "a\n\nb\n", &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-  a  "));
        assert!(text.contains("+a"));
        assert!(text.ends_with("--- End Diff ---\n"));
    }

    #[test]
    fn reports_no_changes() {
        let mut out = Vec::new();
        print_diff("same\n", "same\n", &mut out, false).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No changes."));
    }
}
