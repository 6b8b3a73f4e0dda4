//! Reading tests - stream packages built by `Package` and check the cells.

mod formatting;
mod hyperlinks;
mod rows;
mod workbook;
