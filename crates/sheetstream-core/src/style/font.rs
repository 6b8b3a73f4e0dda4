//! Resolved font attributes of a rich text run

/// Font treatment of one run.
///
/// `color` is always a final `RRGGBB` value; theme and indexed references
/// are resolved before a `Font` is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Font {
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Strikethrough
    pub strike: bool,
    /// Underline style
    pub underline: Underline,
    /// Resolved `RRGGBB` color
    pub color: Option<String>,
    /// Font family name, when the run names one
    pub name: Option<String>,
    /// Size in points, when the run sets one
    pub size: Option<f64>,
}

impl Font {
    /// Create a font with no attributes set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set strikethrough
    pub fn with_strike(mut self, strike: bool) -> Self {
        self.strike = strike;
        self
    }

    /// Set underline
    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Set color
    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    /// No underline
    #[default]
    None,
    /// Single underline
    Single,
    /// Double underline
    Double,
    /// Single accounting underline (extends to cell width)
    SingleAccounting,
    /// Double accounting underline
    DoubleAccounting,
}

impl Underline {
    /// Parse the `val` of a `<u>` element; unknown tokens read as single
    pub fn from_xlsx(s: &str) -> Self {
        match s {
            "none" => Underline::None,
            "double" => Underline::Double,
            "singleAccounting" => Underline::SingleAccounting,
            "doubleAccounting" => Underline::DoubleAccounting,
            _ => Underline::Single,
        }
    }

    /// The OOXML token for this style
    pub fn as_str(&self) -> &'static str {
        match self {
            Underline::None => "none",
            Underline::Single => "single",
            Underline::Double => "double",
            Underline::SingleAccounting => "singleAccounting",
            Underline::DoubleAccounting => "doubleAccounting",
        }
    }

    /// Whether any underline is drawn
    pub fn is_set(&self) -> bool {
        !matches!(self, Underline::None)
    }
}
