//! Number format codes

/// Number format referenced by a cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// Built-in format codes keyed by `numFmtId`.
static BUILTIN_CODES: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mm:ss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

impl NumberFormat {
    /// 0 - General
    pub const ID_GENERAL: u32 = 0;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    /// Classify a `numFmtId`, preferring a custom code declared for it
    pub fn from_id(id: u32, custom: Option<&str>) -> Self {
        match custom {
            Some(code) => NumberFormat::Custom(code.to_string()),
            None if id == Self::ID_GENERAL => NumberFormat::General,
            None => NumberFormat::BuiltIn(id),
        }
    }

    /// Look up a built-in format code by ID
    pub fn builtin_code(id: u32) -> Option<&'static str> {
        BUILTIN_CODES
            .iter()
            .find(|(builtin, _)| *builtin == id)
            .map(|(_, code)| *code)
    }

    /// The format code, if this format has one
    pub fn code(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::BuiltIn(id) => Self::builtin_code(*id),
            NumberFormat::Custom(s) => Some(s),
        }
    }

    /// Whether the format renders dates or times
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(s) => crate::format::has_date_tokens(s),
            NumberFormat::General => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(NumberFormat::builtin_code(2), Some("0.00"));
        assert_eq!(NumberFormat::builtin_code(49), Some("@"));
        assert_eq!(NumberFormat::builtin_code(5), None);
    }

    #[test]
    fn test_custom_overrides_builtin() {
        let fmt = NumberFormat::from_id(2, Some("0.000"));
        assert_eq!(fmt.code(), Some("0.000"));
        assert_eq!(NumberFormat::from_id(2, None).code(), Some("0.00"));
        assert_eq!(NumberFormat::from_id(0, None), NumberFormat::General);
        assert_eq!(NumberFormat::from_id(164, None).code(), None);
    }

    #[test]
    fn test_is_date_format() {
        assert!(NumberFormat::BuiltIn(14).is_date_format());
        assert!(!NumberFormat::BuiltIn(2).is_date_format());
        assert!(NumberFormat::Custom("yyyy-mm-dd".into()).is_date_format());
        assert!(!NumberFormat::Custom("0.00\"days\"".into()).is_date_format());
    }
}
