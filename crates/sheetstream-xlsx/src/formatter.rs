//! Style application: number formats and cell fonts

use std::sync::Arc;

use sheetstream_core::{format_value, CellKind, Font, RichText, Underline};

use crate::color::ColorResolver;
use crate::error::FormatError;
use crate::styles::{FontRecord, StyleSheet};

/// A rendered value plus the degradation error, if any.
///
/// `value` always holds something displayable: on error it is the literal
/// cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    /// Rendered value
    pub value: RichText,
    /// Why formatting fell back to the literal value
    pub error: Option<FormatError>,
}

impl Formatted {
    /// A fully formatted value
    pub fn ok(value: RichText) -> Self {
        Self { value, error: None }
    }

    /// A literal value with the reason it was not formatted
    pub fn degraded(value: RichText, error: FormatError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Convert into a `Result`, dropping the fallback value on error
    pub fn into_result(self) -> Result<RichText, FormatError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// Applies cell styles (number format and font) to cell values
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    styles: Result<Arc<StyleSheet>, FormatError>,
    colors: ColorResolver,
    date1904: bool,
    raw: bool,
}

impl ValueFormatter {
    /// Create a formatter.
    ///
    /// `styles` is an error when the style sheet could not be read; every
    /// styled value then comes back literal with that error.
    pub fn new(
        styles: Result<Arc<StyleSheet>, FormatError>,
        colors: ColorResolver,
        date1904: bool,
        raw: bool,
    ) -> Self {
        Self {
            styles,
            colors,
            date1904,
            raw,
        }
    }

    /// Whether values are returned as stored
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Whether the workbook uses the 1904 date system
    pub fn date1904(&self) -> bool {
        self.date1904
    }

    /// The color resolver used for fonts
    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    /// Render `value` with the number format and font of `style`.
    ///
    /// Raw mode and style 0 pass the value through. A missing `cellXfs` or
    /// an out-of-range style also pass through, without error.
    pub fn apply_style(&self, value: &str, style: u32, kind: CellKind) -> Formatted {
        self.apply(value, style, kind, true)
    }

    /// Like [`apply_style`](Self::apply_style) without the number format
    pub fn apply_font(&self, value: &str, style: u32) -> Formatted {
        self.apply(value, style, CellKind::Default, false)
    }

    fn apply(&self, value: &str, style: u32, kind: CellKind, number_format: bool) -> Formatted {
        let literal = || RichText::plain(value);
        if self.raw || style == 0 {
            return Formatted::ok(literal());
        }
        let styles = match &self.styles {
            Ok(styles) => styles,
            Err(err) => return Formatted::degraded(literal(), err.clone()),
        };
        let Some(xf) = styles.cell_xf(style) else {
            return Formatted::ok(literal());
        };

        let text = match styles.number_format(xf.num_fmt_id).code() {
            Some(code) if number_format => format_value(value, code, self.date1904, kind),
            _ => value.to_string(),
        };
        let font = xf
            .font_id
            .and_then(|id| styles.font(id))
            .map(|record| self.font(record));

        Formatted::ok(RichText::plain(text).apply(font.as_ref()))
    }

    /// Build a run font from a style sheet font
    fn font(&self, record: &FontRecord) -> Font {
        Font {
            bold: record.bold,
            italic: record.italic,
            strike: record.strike,
            underline: if record.underline.is_some() {
                Underline::Single
            } else {
                Underline::None
            },
            color: record.color.as_ref().and_then(|c| self.colors.font_color(c)),
            name: record.name.clone(),
            size: record.size,
        }
    }
}
