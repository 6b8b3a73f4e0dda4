//! Cell-related types
//!
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellKind`] - The declared type of a cell in worksheet XML
//! - [`RawCell`] - One undecoded `<c>` element

mod address;
mod raw;

pub use address::CellAddress;
pub use raw::{CellKind, RawCell};
