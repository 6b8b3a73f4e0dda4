//! Worksheet naming rules

use crate::error::{Error, Result};
use crate::MAX_SHEET_NAME_LEN;

/// Characters a worksheet name may not contain
pub const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Check a worksheet name against the workbook naming rules.
///
/// Names must be non-empty, at most [`MAX_SHEET_NAME_LEN`] characters and
/// free of [`INVALID_SHEET_NAME_CHARS`].
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }
    Ok(())
}
