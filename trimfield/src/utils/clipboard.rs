//! System clipboard access.
//!
//! Only available with the `clipboard` feature; without it every call fails
//! with a descriptive error so callers can fall back.

use anyhow::Result;

/// Reads plain text from the system clipboard.
///
/// Returns `Ok(None)` when the clipboard holds no text.
#[cfg(feature = "clipboard")]
pub fn read_clipboard_text() -> Result<Option<String>> {
    use anyhow::Context;

    let mut clipboard = arboard::Clipboard::new().context("Failed to open the system clipboard")?;
    match clipboard.get_text() {
        Ok(text) => Ok(Some(text)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(anyhow::anyhow!("Failed to read clipboard text: {}", e)),
    }
}

/// Replaces the system clipboard contents with `text`.
#[cfg(feature = "clipboard")]
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    use anyhow::Context;

    let mut clipboard = arboard::Clipboard::new().context("Failed to open the system clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write clipboard text")?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub fn read_clipboard_text() -> Result<Option<String>> {
    anyhow::bail!("trimfield was built without clipboard support (enable the `clipboard` feature)")
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_to_clipboard(_text: &str) -> Result<()> {
    anyhow::bail!("trimfield was built without clipboard support (enable the `clipboard` feature)")
}
