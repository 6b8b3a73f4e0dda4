//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading a workbook.
///
/// These abort the operation that raised them; a stream that returned one
/// should be closed.
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// No worksheet with this name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet name breaks the naming rules
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetstream_core::Error),
}

/// A formatting failure that still leaves the literal value usable.
///
/// Returned next to the unformatted value, never instead of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The style sheet could not be read
    #[error("styles unavailable: {0}")]
    StylesUnavailable(String),

    /// A `t="d"` cell did not hold an ISO 8601 date
    #[error("invalid date value: {0}")]
    InvalidDate(String),
}
