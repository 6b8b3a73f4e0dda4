//! # sheetstream-core
//!
//! Core data structures for the sheetstream spreadsheet reader.
//!
//! This crate provides the format-independent types used throughout
//! sheetstream:
//! - [`RawCell`] and [`CellKind`] - A cell as found in a worksheet row
//! - [`RichText`] - Cell values as styled runs
//! - [`Font`], [`ColorSpec`], [`ColorScheme`] - Run styling and colors
//! - [`NumberFormat`] and [`format::format_value`] - Number format rendering
//!
//! ## Example
//!
//! ```rust
//! use sheetstream_core::{apply_tint, Font, RichText};
//!
//! let accent = apply_tint("4472C4", 0.0).unwrap();
//! let value = RichText::plain("Total").apply(Some(&Font::new().with_bold(true).with_color(accent)));
//!
//! assert_eq!(value.to_string(), "Total");
//! assert!(value.runs[0].font.as_ref().unwrap().bold);
//! ```

pub mod cell;
pub mod error;
pub mod format;
pub mod rich;
pub mod sheet;
pub mod style;

// Re-exports for convenience
pub use cell::{CellAddress, CellKind, RawCell};
pub use error::{Error, Result};
pub use format::format_value;
pub use rich::{RichText, RichTextRun};
pub use sheet::validate_sheet_name;

pub use style::{
    apply_tint, strip_alpha, ColorScheme, ColorSpec, Font, NumberFormat, SchemeColor, Underline,
    INDEXED_PALETTE, SCHEME_SLOTS,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
