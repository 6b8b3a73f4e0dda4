//! # sheetstream-xlsx
//!
//! Streaming XLSX (Office Open XML) row reader for sheetstream.
//!
//! A [`Workbook`] loads the shared strings, styles and theme of a package
//! once; [`RowStream`]s then pull one worksheet row at a time and return
//! each cell as style-aware [`RichText`](sheetstream_core::RichText).

pub mod color;
pub mod error;
pub mod formatter;
pub mod hyperlinks;
pub mod options;
pub mod resolve;
pub mod rows;
pub mod shared_strings;
pub mod styles;
pub mod theme;
pub mod workbook;

mod xml;

pub use color::ColorResolver;
pub use error::{FormatError, XlsxError, XlsxResult};
pub use formatter::{Formatted, ValueFormatter};
pub use options::OpenOptions;
pub use resolve::CellResolver;
pub use rows::{RowOptions, RowStream};
pub use shared_strings::{RunProperties, SharedRun, SharedStringItem, SharedStringTable};
pub use styles::{CellXf, FontRecord, StyleSheet};
pub use theme::parse_theme;
pub use workbook::Workbook;
