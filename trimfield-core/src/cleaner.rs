//! Text cleaning: trimming and blank-line collapsing.
//!
//! [`clean`] is what runs when a field loses focus or when clipboard text is
//! pasted. It trims surrounding Unicode whitespace and, when the
//! `collapse_newlines` setting is on, squeezes each run of blank lines down to
//! a single empty line. Cleaning is idempotent, so callers compare the result
//! with the original to decide whether an edit is needed.

use serde_json::Value;

use crate::settings::Settings;

/// Characters removed by trimming: Unicode whitespace plus the byte order mark.
pub fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Strips leading and trailing [`is_trim_char`] characters.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_trim_char)
}

/// A line is blank if nothing but trimmable characters remain.
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(is_trim_char)
}

/// Splits on `\n`; any carriage returns ending a line belong to the break.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.trim_end_matches('\r'))
}

/// Collapses each run of blank lines into exactly one empty line.
///
/// Non-blank lines are kept verbatim and the output is joined with `\n`.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut last_blank = false;

    for line in split_lines(text) {
        if is_blank_line(line) {
            if !last_blank {
                out.push("");
                last_blank = true;
            }
        } else {
            out.push(line);
            last_blank = false;
        }
    }

    out.join("\n")
}

/// Cleans `text` according to `settings`.
pub fn clean(settings: &Settings, text: &str) -> String {
    let trimmed = trim_text(text);
    if settings.collapse_newlines {
        collapse_blank_lines(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Cleans string values and hands every other value back unchanged.
pub fn clean_value(settings: &Settings, value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(clean(settings, text)),
        other => other.clone(),
    }
}
