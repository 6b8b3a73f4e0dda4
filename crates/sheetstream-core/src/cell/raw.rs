//! Raw worksheet cells

/// Declared type of a cell, from the `t` attribute of `<c>`.
///
/// | code        | kind                        |
/// |-------------|-----------------------------|
/// | `b`         | [`CellKind::Boolean`]       |
/// | `d`         | [`CellKind::Date`]          |
/// | `s`         | [`CellKind::SharedString`]  |
/// | `inlineStr` | [`CellKind::InlineString`]  |
/// | other/none  | [`CellKind::Default`]       |
///
/// `n`, `str` (formula string) and `e` (error) all decode as plain
/// numeric-or-string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    /// Boolean stored as `0`/`1`
    Boolean,
    /// ISO 8601 date/time
    Date,
    /// Index into the shared string table
    SharedString,
    /// String carried in an `<is>` child
    InlineString,
    /// Number or literal string
    #[default]
    Default,
}

impl CellKind {
    /// Classify a `t` attribute value
    pub fn from_type_code(code: Option<&str>) -> Self {
        match code {
            Some("b") => CellKind::Boolean,
            Some("d") => CellKind::Date,
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            _ => CellKind::Default,
        }
    }

    /// Whether the value is text that number formats must not reinterpret
    pub fn is_text(&self) -> bool {
        matches!(self, CellKind::SharedString | CellKind::InlineString)
    }
}

/// One `<c>` element as read from worksheet XML, before any resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCell {
    /// The `r` attribute, if present
    pub reference: Option<String>,
    /// Declared type
    pub kind: CellKind,
    /// Text of the `<v>` child
    pub value: String,
    /// Flattened text of the `<is>` child
    pub inline: Option<String>,
    /// Style index (`s` attribute); 0 means no style
    pub style: u32,
    /// Whether an `<f>` child was present
    pub has_formula: bool,
}

impl RawCell {
    /// Create a cell of the given kind holding `value`
    pub fn new(kind: CellKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            ..Default::default()
        }
    }

    /// Set the style index
    pub fn with_style(mut self, style: u32) -> Self {
        self.style = style;
        self
    }

    /// Set the cell reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
