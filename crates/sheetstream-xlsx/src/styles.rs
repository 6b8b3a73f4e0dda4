//! Style sheet lookup tables (`xl/styles.xml`)
//!
//! Only the parts needed to render values are kept: number format codes,
//! fonts, the `cellXfs` records that tie them to a style index, and a
//! custom indexed color palette.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use sheetstream_core::{ColorSpec, NumberFormat};

use crate::error::XlsxResult;
use crate::xml::{attr, attr_parse, TokenReader};

/// A font entry as declared in `<fonts>`.
///
/// The flags record the presence of `<b>`, `<i>` and `<strike>`: any
/// occurrence switches the flag on, whatever its `val` says.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontRecord {
    /// `<b>` present
    pub bold: bool,
    /// `<i>` present
    pub italic: bool,
    /// `<strike>` present
    pub strike: bool,
    /// `val` of `<u>`, when the element carries one
    pub underline: Option<String>,
    /// Color reference
    pub color: Option<ColorSpec>,
    /// `<name val>`
    pub name: Option<String>,
    /// `<sz val>`
    pub size: Option<f64>,
}

/// One `<xf>` of `<cellXfs>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellXf {
    /// `numFmtId`
    pub num_fmt_id: u32,
    /// `fontId`
    pub font_id: Option<u32>,
}

/// Parsed style sheet
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// Custom number format codes by id
    pub num_fmts: HashMap<u32, String>,
    /// Fonts in declaration order
    pub fonts: Vec<FontRecord>,
    /// Cell formats; `None` when the sheet has no `<cellXfs>`
    pub cell_xfs: Option<Vec<CellXf>>,
    /// Custom indexed palette from `<colors><indexedColors>`
    pub indexed_colors: Option<Vec<String>>,
}

impl StyleSheet {
    /// Cell format for a style index
    pub fn cell_xf(&self, style: u32) -> Option<&CellXf> {
        self.cell_xfs.as_ref()?.get(style as usize)
    }

    /// Number format for an id: a custom code, else the built-in one
    pub fn number_format(&self, id: u32) -> NumberFormat {
        NumberFormat::from_id(id, self.num_fmts.get(&id).map(String::as_str))
    }

    /// Font by id
    pub fn font(&self, id: u32) -> Option<&FontRecord> {
        self.fonts.get(id as usize)
    }

    /// Parse `styles.xml`
    pub fn parse<B: BufRead>(source: B) -> XlsxResult<Self> {
        let mut reader = TokenReader::new(source);
        let mut sheet = StyleSheet::default();

        let mut in_fonts = false;
        let mut in_cell_xfs = false;
        let mut in_indexed = false;
        let mut current_font: Option<FontRecord> = None;

        loop {
            match reader.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"fonts" => in_fonts = true,
                    b"font" if in_fonts => current_font = Some(FontRecord::default()),
                    b"cellXfs" => {
                        in_cell_xfs = true;
                        sheet.cell_xfs.get_or_insert_with(Vec::new);
                    }
                    b"xf" if in_cell_xfs => {
                        sheet.cell_xfs.get_or_insert_with(Vec::new).push(parse_xf(&e));
                    }
                    b"indexedColors" => in_indexed = true,
                    // dxfs carry fonts of their own
                    b"dxfs" | b"extLst" => reader.skip_element(e.local_name().as_ref())?,
                    _ => {
                        if let Some(font) = current_font.as_mut() {
                            apply_font_child(font, &e);
                        }
                    }
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"numFmt" => {
                        if let (Some(id), Some(code)) =
                            (attr_parse::<u32>(&e, b"numFmtId"), attr(&e, b"formatCode"))
                        {
                            sheet.num_fmts.insert(id, code);
                        }
                    }
                    b"font" if in_fonts => sheet.fonts.push(FontRecord::default()),
                    b"xf" if in_cell_xfs => {
                        sheet.cell_xfs.get_or_insert_with(Vec::new).push(parse_xf(&e));
                    }
                    b"cellXfs" => {
                        sheet.cell_xfs.get_or_insert_with(Vec::new);
                    }
                    b"rgbColor" if in_indexed => {
                        let rgb = attr(&e, b"rgb").unwrap_or_default();
                        sheet.indexed_colors.get_or_insert_with(Vec::new).push(rgb);
                    }
                    _ => {
                        if let Some(font) = current_font.as_mut() {
                            apply_font_child(font, &e);
                        }
                    }
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"fonts" => in_fonts = false,
                    b"font" => {
                        if let Some(font) = current_font.take() {
                            sheet.fonts.push(font);
                        }
                    }
                    b"cellXfs" => in_cell_xfs = false,
                    b"indexedColors" => in_indexed = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(sheet)
    }
}

fn parse_xf(e: &BytesStart<'_>) -> CellXf {
    CellXf {
        num_fmt_id: attr_parse(e, b"numFmtId").unwrap_or(0),
        font_id: attr_parse(e, b"fontId"),
    }
}

fn apply_font_child(font: &mut FontRecord, e: &BytesStart<'_>) {
    match e.local_name().as_ref() {
        b"b" => font.bold = true,
        b"i" => font.italic = true,
        b"strike" => font.strike = true,
        b"u" => font.underline = attr(e, b"val"),
        b"color" => font.color = Some(parse_color(e)),
        b"name" => font.name = attr(e, b"val"),
        b"sz" => font.size = attr_parse(e, b"val"),
        _ => {}
    }
}

/// Collapse the attributes of a `<color>` element.
///
/// Priority: rgb > theme > indexed > auto
pub(crate) fn parse_color(e: &BytesStart<'_>) -> ColorSpec {
    ColorSpec::from_attributes(
        attr(e, b"rgb").as_deref(),
        attr_parse(e, b"theme"),
        attr_parse(e, b"tint"),
        attr_parse(e, b"indexed"),
    )
}
