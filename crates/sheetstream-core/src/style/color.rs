//! Color references and the tint transform

use std::fmt;

/// A symbolic color as written in style sheets and run properties.
///
/// XML `<color>` elements may carry several attributes at once; they are
/// collapsed with the precedence `rgb > theme > indexed > auto`
/// (see [`ColorSpec::from_attributes`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorSpec {
    /// Automatic/default color
    #[default]
    Auto,

    /// Literal `RRGGBB` or `AARRGGBB` hex
    Rgb(String),

    /// Theme color scheme slot (0-11) with a tint in -1.0..=1.0
    Theme {
        /// Slot index: 0 = dk1, 1 = lt1, 2 = dk2, 3 = lt2, 4-9 = accent1-6,
        /// 10 = hlink, 11 = folHlink
        slot: u8,
        /// Luminance adjustment
        tint: f64,
    },

    /// Legacy indexed palette entry with a tint
    Indexed {
        /// Palette index
        index: u32,
        /// Luminance adjustment
        tint: f64,
    },
}

impl ColorSpec {
    /// Theme slot of the system window (light 1) color
    pub const WINDOW_SLOT: u8 = 1;

    /// Create a literal color
    pub fn rgb<S: Into<String>>(hex: S) -> Self {
        ColorSpec::Rgb(hex.into())
    }

    /// Create a theme color
    pub const fn theme(slot: u8, tint: f64) -> Self {
        ColorSpec::Theme { slot, tint }
    }

    /// Create an indexed color
    pub const fn indexed(index: u32, tint: f64) -> Self {
        ColorSpec::Indexed { index, tint }
    }

    /// Collapse the attributes of a `<color>` element into one spec
    pub fn from_attributes(
        rgb: Option<&str>,
        theme: Option<u8>,
        tint: Option<f64>,
        indexed: Option<u32>,
    ) -> Self {
        let tint = tint.unwrap_or(0.0);
        if let Some(rgb) = rgb.filter(|s| !s.is_empty()) {
            return ColorSpec::Rgb(rgb.trim_start_matches('#').to_string());
        }
        if let Some(slot) = theme {
            return ColorSpec::Theme { slot, tint };
        }
        if let Some(index) = indexed {
            return ColorSpec::Indexed { index, tint };
        }
        ColorSpec::Auto
    }

    /// True exactly for a reference to theme slot 1, the system window color.
    ///
    /// Fonts whose color is the window color keep no explicit color instead
    /// of being resolved against the theme.
    pub fn is_window_color(&self) -> bool {
        matches!(self, ColorSpec::Theme { slot, .. } if *slot == Self::WINDOW_SLOT)
    }

    /// Tint carried by theme and indexed references
    pub fn tint(&self) -> f64 {
        match self {
            ColorSpec::Theme { tint, .. } | ColorSpec::Indexed { tint, .. } => *tint,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Auto => write!(f, "auto"),
            ColorSpec::Rgb(hex) => write!(f, "#{}", hex),
            ColorSpec::Theme { slot, tint } => write!(f, "theme({}, {})", slot, tint),
            ColorSpec::Indexed { index, tint } => write!(f, "indexed({}, {})", index, tint),
        }
    }
}

/// Built-in legacy palette used when a style sheet has no `<indexedColors>`.
pub static INDEXED_PALETTE: [&str; 64] = [
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF", // 0-7
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF", // 8-15
    "800000", "008000", "000080", "808000", "800080", "008080", "C0C0C0", "808080", // 16-23
    "9999FF", "993366", "FFFFCC", "CCFFFF", "660066", "FF8080", "0066CC", "CCCCFF", // 24-31
    "000080", "FF00FF", "FFFF00", "00FFFF", "800080", "800000", "008080", "0000FF", // 32-39
    "00CCFF", "CCFFFF", "CCFFCC", "FFFF99", "99CCFF", "FF99CC", "CC99FF", "FFCC99", // 40-47
    "3366FF", "33CCCC", "99CC00", "FFCC00", "FF9900", "FF6600", "666699", "969696", // 48-55
    "003366", "339966", "003300", "333300", "993300", "993366", "333399", "333333", // 56-63
];

/// Drop an opaque `FF` alpha byte from an `AARRGGBB` value.
///
/// Any other value, including one with a translucent alpha, passes through.
pub fn strip_alpha(hex: &str) -> &str {
    match hex.strip_prefix("FF") {
        Some(rgb) if hex.len() == 8 => rgb,
        _ => hex,
    }
}

/// Apply a luminance tint to an `RRGGBB` (or `AARRGGBB`) color.
///
/// The color is converted to HSL and its lightness adjusted:
/// `l * (1 + tint)` when darkening, `l * (1 - tint) + tint` when lightening.
/// Returns the uppercase `RRGGBB` result, or `None` for malformed input.
pub fn apply_tint(hex: &str, tint: f64) -> Option<String> {
    let hex = strip_alpha(hex);
    let (r, g, b) = parse_rgb(hex)?;
    if tint == 0.0 {
        return Some(format!("{:02X}{:02X}{:02X}", r, g, b));
    }

    let tint = tint.clamp(-1.0, 1.0);
    let (h, s, mut l) = rgb_to_hsl(r, g, b);
    if tint < 0.0 {
        l *= 1.0 + tint;
    } else {
        l = l * (1.0 - tint) + tint;
    }
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(format!("{:02X}{:02X}{:02X}", r, g, b))
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };
    let channel = |v: f64| (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
