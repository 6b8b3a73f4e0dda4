//! Theme color scheme

/// Element names of the 12 color scheme slots, in theme index order.
pub const SCHEME_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5",
    "accent6", "hlink", "folHlink",
];

/// One color scheme entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeColor {
    /// `<a:sysClr>`: a named system color with its last known value
    System {
        /// System color name, e.g. `windowText`
        name: String,
        /// `lastClr` attribute
        last_color: Option<String>,
    },
    /// `<a:srgbClr>`: a direct `RRGGBB` value
    Srgb(String),
}

impl SchemeColor {
    /// The `RRGGBB` value this entry stands for, if known
    pub fn rgb(&self) -> Option<&str> {
        match self {
            SchemeColor::System { last_color, .. } => last_color.as_deref(),
            SchemeColor::Srgb(val) => Some(val),
        }
    }
}

/// The `<a:clrScheme>` of a workbook theme.
///
/// Slots are indexed as in [`SCHEME_SLOTS`]; style sheets refer to them
/// with `theme="N"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorScheme {
    /// Scheme name (e.g., "Office")
    pub name: Option<String>,
    slots: [Option<SchemeColor>; 12],
}

impl ColorScheme {
    /// Create an empty scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// The default Office scheme
    pub fn office() -> Self {
        let mut scheme = Self {
            name: Some("Office".to_string()),
            ..Self::default()
        };
        scheme.set_slot(
            0,
            SchemeColor::System {
                name: "windowText".to_string(),
                last_color: Some("000000".to_string()),
            },
        );
        scheme.set_slot(
            1,
            SchemeColor::System {
                name: "window".to_string(),
                last_color: Some("FFFFFF".to_string()),
            },
        );
        let srgb = [
            "44546A", "E7E6E6", "4472C4", "ED7D31", "A5A5A5", "FFC000", "5B9BD5", "70AD47",
            "0563C1", "954F72",
        ];
        for (offset, val) in srgb.iter().enumerate() {
            scheme.set_slot(offset + 2, SchemeColor::Srgb(val.to_string()));
        }
        scheme
    }

    /// Index of a slot element name (`dk1` = 0, ..., `folHlink` = 11)
    pub fn slot_index(name: &str) -> Option<usize> {
        SCHEME_SLOTS.iter().position(|slot| *slot == name)
    }

    /// Entry at a slot index
    pub fn slot(&self, index: usize) -> Option<&SchemeColor> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Replace the entry at a slot index; out-of-range indices are ignored
    pub fn set_slot(&mut self, index: usize, color: SchemeColor) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(color);
        }
    }
}
