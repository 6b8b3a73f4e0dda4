//! Tests for styled values: number formats, fonts, theme colors and rich
//! shared strings.

use crate::{shared_strings, worksheet, Package, OFFICE_THEME};
use pretty_assertions::assert_eq;
use sheetstream_core::{Font, RichText, RichTextRun, Underline};
use sheetstream_xlsx::{FormatError, OpenOptions};

const STYLES: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="2">
    <numFmt numFmtId="164" formatCode="#,##0.00"/>
    <numFmt numFmtId="165" formatCode="yyyy-mm-dd"/>
  </numFmts>
  <fonts count="4">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/></font>
    <font><b/><sz val="11"/><color theme="4"/><name val="Calibri"/></font>
    <font><i/><u val="single"/><color theme="0" tint="0.5"/></font>
    <font><strike/><color rgb="FFFF0000"/></font>
  </fonts>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0"/>
    <xf numFmtId="164" fontId="1" applyNumberFormat="1" applyFont="1"/>
    <xf numFmtId="165" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="10" fontId="2" applyNumberFormat="1" applyFont="1"/>
    <xf numFmtId="0" fontId="3" applyFont="1"/>
  </cellXfs>
</styleSheet>"##;

fn styled(sheet_data: &str) -> Package {
    Package::new()
        .sheet("Sheet1", worksheet(sheet_data, ""))
        .styles(STYLES)
        .theme(OFFICE_THEME)
}

fn first_row(package: &Package) -> Vec<RichText> {
    let workbook = package.open();
    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    rows.values().unwrap()
}

#[test]
fn test_number_format_with_theme_font() {
    let cells = first_row(&styled(r#"<row r="1"><c r="A1" s="1"><v>1234.5</v></c></row>"#));
    assert_eq!(
        cells[0].runs,
        vec![RichTextRun::styled(
            "1,234.50",
            Font::new().with_bold(true).with_color("4472C4")
        )]
    );
}

#[test]
fn test_window_color_font_stays_uncolored() {
    let cells = first_row(&styled(r#"<row r="1"><c r="A1" s="2"><v>45000</v></c></row>"#));
    assert_eq!(cells[0].runs, vec![RichTextRun::styled("2023-03-15", Font::new())]);
}

#[test]
fn test_tinted_theme_color_and_underline() {
    let cells = first_row(&styled(r#"<row r="1"><c r="A1" s="3"><v>0.125</v></c></row>"#));
    assert_eq!(
        cells[0].runs,
        vec![RichTextRun::styled(
            "12.50%",
            Font::new()
                .with_italic(true)
                .with_underline(Underline::Single)
                .with_color("808080")
        )]
    );
}

#[test]
fn test_shared_string_gets_cell_style() {
    let package = styled(r#"<row r="1"><c r="A1" t="s" s="4"><v> 1 </v></c></row>"#).shared_strings(
        shared_strings("<si><t>unused</t></si><si><t>Total</t></si>"),
    );
    let cells = first_row(&package);
    assert_eq!(
        cells[0].runs,
        vec![RichTextRun::styled(
            "Total",
            Font::new().with_strike(true).with_color("FF0000")
        )]
    );
}

#[test]
fn test_rich_shared_string_keeps_runs() {
    let package = styled(r#"<row r="1"><c r="A1" t="s" s="1"><v>0</v></c></row>"#).shared_strings(
        shared_strings(
            r#"<si><r><rPr><b/><color theme="4"/></rPr><t>Hello</t></r><r><t xml:space="preserve"> World</t></r></si>"#,
        ),
    );
    let cells = first_row(&package);
    assert_eq!(
        cells[0].runs,
        vec![
            RichTextRun::styled("Hello", Font::new().with_bold(true).with_color("4472C4")),
            RichTextRun::new(" World"),
        ]
    );
    assert_eq!(cells[0].text(), "Hello World");
}

#[test]
fn test_boolean_and_date_cells() {
    let cells = first_row(&styled(
        r#"<row r="1"><c r="A1" t="b" s="1"><v>1</v></c><c r="B1" t="d" s="2"><v>2023-03-15T00:00:00Z</v></c></row>"#,
    ));
    assert_eq!(
        cells[0].runs,
        vec![RichTextRun::styled("TRUE", Font::new().with_bold(true).with_color("4472C4"))]
    );
    assert_eq!(cells[1].text(), "2023-03-15");
}

#[test]
fn test_date1904_workbook() {
    let package = styled(r#"<row r="1"><c r="A1" s="2"><v>0</v></c></row>"#).date1904();
    assert!(package.open().date1904());
    assert_eq!(first_row(&package)[0].text(), "1904-01-01");
}

#[test]
fn test_unreadable_styles_keep_literal_values() {
    let package = Package::new()
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="A1" s="1"><v>1234.5</v></c></row>"#, ""),
        )
        .styles("<styleSheet><fonts><font></b></font></fonts>");
    let workbook = package.open();
    assert!(matches!(workbook.styles(), Err(FormatError::StylesUnavailable(_))));

    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    assert_eq!(rows.values().unwrap()[0], RichText::plain("1234.5"));
}

#[test]
fn test_broken_theme_drops_theme_colors() {
    let package = Package::new()
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="A1" s="1"><v>2</v></c></row>"#, ""),
        )
        .styles(STYLES)
        .theme("<a:theme><a:clrScheme></a:theme>");
    let workbook = package.open();
    assert!(workbook.theme().is_none());

    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    assert_eq!(
        rows.values().unwrap()[0].runs,
        vec![RichTextRun::styled("2.00", Font::new().with_bold(true))]
    );
}

#[test]
fn test_resolver_follows_open_options() {
    let workbook = Package::new()
        .sheet("Sheet1", worksheet("", ""))
        .open();
    assert!(!workbook.resolver().formatter().is_raw());

    let workbook = Package::new()
        .sheet("Sheet1", worksheet("", ""))
        .open_with(OpenOptions::new().raw_cell_value(true));
    assert!(workbook.resolver().formatter().is_raw());
}
