//! Copying calculator results to the system clipboard.

use super::evaluation::CalcResult;
use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy the result of a successful calculation.
///
/// Returns `Ok(false)` without touching the clipboard when the result has
/// no copyable value (an error label, `Undefined` or `Infinity`).
pub fn copy_result(result: &CalcResult) -> Result<bool> {
    let Some(text) = result.clipboard() else {
        return Ok(false);
    };
    copy_to_clipboard(text)?;
    Ok(true)
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")
}
