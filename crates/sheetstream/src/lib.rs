//! # sheetstream
//!
//! Stream spreadsheet rows as style-aware rich text.
//!
//! Worksheets are read one row at a time; every cell comes back as a
//! [`RichText`] whose runs carry the text produced by the cell's number
//! format and the font of its style, with theme and indexed colors resolved
//! to plain `RRGGBB` values.
//!
//! ## Features
//!
//! - Forward-only row streaming over XLSX worksheets, large parts spooled
//!   to a temporary file
//! - Shared and inline strings, including rich shared string runs
//! - Number formats: sections, grouping, percentages, fractions,
//!   scientific notation, dates and elapsed times
//! - Theme colors with tint, custom indexed palettes
//! - Hyperlink extraction
//!
//! ## Example
//!
//! ```no_run
//! use sheetstream::prelude::*;
//!
//! let workbook = sheetstream::open("report.xlsx")?;
//! for name in workbook.sheet_names() {
//!     let mut rows = workbook.rows(name)?;
//!     while rows.next_row()? {
//!         for cell in rows.values()? {
//!             let bold = cell.runs.iter().any(|run| run.font.as_ref().is_some_and(|f| f.bold));
//!             println!("{} (bold: {})", cell.text(), bold);
//!         }
//!     }
//! }
//! # Ok::<(), XlsxError>(())
//! ```

pub mod prelude;

// Re-export core types
pub use sheetstream_core::{
    apply_tint,
    format_value,
    strip_alpha,
    validate_sheet_name,
    CellAddress,
    CellKind,
    ColorScheme,
    ColorSpec,
    // Error types
    Error,
    Font,
    NumberFormat,
    RawCell,
    Result,
    // Rich text
    RichText,
    RichTextRun,
    SchemeColor,
    Underline,
    INDEXED_PALETTE,

    MAX_COLS,
    // Constants
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
    SCHEME_SLOTS,
};

// Re-export XLSX types
pub use sheetstream_xlsx::{
    CellResolver, ColorResolver, FormatError, Formatted, OpenOptions, RowOptions, RowStream,
    SharedStringItem, SharedStringTable, StyleSheet, ValueFormatter, Workbook, XlsxError,
    XlsxResult,
};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a spreadsheet file with default options
pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook<BufReader<File>>> {
    open_with_options(path, OpenOptions::default())
}

/// Open a spreadsheet file.
///
/// The format is chosen by extension; only `.xlsx` and `.xlsm` are
/// supported.
pub fn open_with_options<P: AsRef<Path>>(
    path: P,
    options: OpenOptions,
) -> XlsxResult<Workbook<BufReader<File>>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Workbook::open_with_options(path, options),
        _ => Err(XlsxError::InvalidFormat(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}
