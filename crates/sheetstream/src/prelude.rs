//! Prelude module - common imports for sheetstream users
//!
//! ```rust
//! use sheetstream::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    // Colors
    ColorSpec,
    // Error types
    Error,
    Font,
    FormatError,

    OpenOptions,
    Result,

    // Rich text
    RichText,
    RichTextRun,
    RowOptions,
    RowStream,
    Underline,
    // Main types
    Workbook,
    XlsxError,
    XlsxResult,
};
