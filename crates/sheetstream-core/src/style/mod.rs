//! Style types consumed by value resolution
//!
//! - [`ColorSpec`] - Symbolic color references and the tint transform
//! - [`ColorScheme`] - A theme's 12-slot color scheme
//! - [`Font`] - Resolved font attributes of a run
//! - [`NumberFormat`] - Number format codes

mod color;
mod font;
mod number_format;
mod theme;

pub use color::{apply_tint, strip_alpha, ColorSpec, INDEXED_PALETTE};
pub use font::{Font, Underline};
pub use number_format::NumberFormat;
pub use theme::{ColorScheme, SchemeColor, SCHEME_SLOTS};
