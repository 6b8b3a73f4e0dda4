//! End-to-end tests for sheetstream-xlsx.
//!
//! Each test builds the exact package it needs in memory with
//! [`Package`](common::Package), opens it through [`Workbook`], and streams
//! it back. Nothing outside the process is required.

mod common;
mod reading;

// Re-export common utilities for submodules
pub use common::*;
