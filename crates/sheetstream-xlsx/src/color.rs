//! Symbolic color resolution

use std::sync::Arc;

use sheetstream_core::{apply_tint, strip_alpha, ColorScheme, ColorSpec, SchemeColor, INDEXED_PALETTE};

/// Resolves [`ColorSpec`]s to `RRGGBB` strings against a workbook's theme
/// and indexed palette.
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    theme: Option<Arc<ColorScheme>>,
    indexed: Option<Arc<Vec<String>>>,
}

impl ColorResolver {
    /// Create a resolver; either table may be absent
    pub fn new(theme: Option<Arc<ColorScheme>>, indexed: Option<Arc<Vec<String>>>) -> Self {
        Self { theme, indexed }
    }

    /// The theme color scheme, if the workbook has one
    pub fn theme(&self) -> Option<&ColorScheme> {
        self.theme.as_deref()
    }

    /// Resolve a color to `RRGGBB`.
    ///
    /// Returns `None` for automatic colors, unknown slots or indices,
    /// and theme references when there is no theme.
    pub fn resolve(&self, spec: &ColorSpec) -> Option<String> {
        match spec {
            ColorSpec::Auto => None,
            ColorSpec::Rgb(hex) => literal(hex),
            ColorSpec::Theme { slot, tint } => {
                let rgb = self.theme.as_ref()?.slot(*slot as usize).and_then(SchemeColor::rgb)?;
                apply_tint(rgb, *tint)
            }
            ColorSpec::Indexed { index, tint } => {
                let base = match self.indexed.as_ref() {
                    Some(custom) => custom.get(*index as usize).map(String::as_str),
                    None => INDEXED_PALETTE.get(*index as usize).copied(),
                }?;
                apply_tint(strip_alpha(base), *tint)
            }
        }
    }

    /// Resolve a color outside of a font.
    ///
    /// Theme slots 0 and 1 are never looked up here.
    pub fn resolve_document(&self, spec: &ColorSpec) -> Option<String> {
        match spec {
            ColorSpec::Theme { slot: 0 | 1, .. } => None,
            _ => self.resolve(spec),
        }
    }

    /// Color for a font: the window color keeps the font uncolored
    pub fn font_color(&self, spec: &ColorSpec) -> Option<String> {
        if spec.is_window_color() {
            return None;
        }
        self.resolve(spec)
    }
}

fn literal(hex: &str) -> Option<String> {
    match hex.len() {
        6 => Some(hex.to_string()),
        8 => Some(strip_alpha(hex).to_string()),
        _ => None,
    }
}
