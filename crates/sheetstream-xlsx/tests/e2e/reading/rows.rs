//! Tests for row streaming: sparse layout, cursor semantics and spooling.

use crate::{shared_strings, texts, worksheet, Package};
use pretty_assertions::assert_eq;
use sheetstream_core::RichText;
use sheetstream_xlsx::{OpenOptions, XlsxError};

fn sample() -> Package {
    Package::new()
        .sheet(
            "Sheet1",
            worksheet(
                r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1"><v>3</v></c></row>
<row r="3" ht="20" customHeight="1"><c r="B3" t="inlineStr"><is><t>inline</t></is></c><c r="C3"><f>SUM(C1:C2)</f><v></v></c></row>
<row r="4"><c r="A4" t="b"><v>0</v></c><c r="B4"><v>0.30000000000000004</v></c></row>"#,
                "",
            ),
        )
        .shared_strings(shared_strings("<si><t>name</t></si>"))
}

#[test]
fn test_sparse_rows_and_columns() {
    let workbook = sample().open();
    let rows = texts(workbook.rows("Sheet1").unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["name".to_string(), String::new(), "3".to_string()],
            vec![],
            vec![String::new(), "inline".to_string(), String::new()],
            vec!["FALSE".to_string(), "0.3".to_string()],
        ]
    );
}

#[test]
fn test_gap_cells_are_empty_rich_text() {
    let workbook = sample().open();
    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    let cells = rows.values().unwrap();
    assert_eq!(cells[1], RichText::empty());
}

#[test]
fn test_values_twice_returns_same_row() {
    let workbook = sample().open();
    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    assert!(rows.next_row().unwrap());
    assert!(rows.next_row().unwrap());
    assert_eq!(rows.current_row(), 3);
    let first = rows.values().unwrap();
    let second = rows.values().unwrap();
    assert_eq!(first, second);
    assert_eq!(rows.row_options().height, Some(20.0));
    assert!(rows.row_options().custom_height);
    assert!(rows.next_row().unwrap());
    assert_eq!(rows.current_row(), 4);
}

#[test]
fn test_skipping_values_moves_on() {
    let workbook = sample().open();
    let mut rows = workbook.rows("Sheet1").unwrap();
    for _ in 0..4 {
        assert!(rows.next_row().unwrap());
    }
    let cells: Vec<String> = rows.values().unwrap().iter().map(RichText::text).collect();
    assert_eq!(cells, vec!["FALSE", "0.3"]);
    assert!(!rows.next_row().unwrap());
}

#[test]
fn test_spooled_sheet_matches_memory() {
    let package = sample();
    let in_memory = texts(package.open().rows("Sheet1").unwrap());
    let spooled = texts(
        package
            .open_with(OpenOptions::new().unzip_xml_size_limit(0))
            .rows("Sheet1")
            .unwrap(),
    );
    assert_eq!(in_memory, spooled);
}

#[test]
fn test_raw_cell_values() {
    let workbook = sample().open_with(OpenOptions::new().raw_cell_value(true));
    let rows = texts(workbook.rows("Sheet1").unwrap());
    assert_eq!(rows[3], vec!["0".to_string(), "0.30000000000000004".to_string()]);
}

#[test]
fn test_malformed_reference_fails_stream() {
    let workbook = Package::new()
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="A"><v>1</v></c></row><row r="2"><c r="A2"><v>2</v></c></row>"#, ""),
        )
        .open();
    let mut rows = workbook.rows("Sheet1").unwrap();
    assert!(rows.next_row().unwrap());
    let err = rows.values().unwrap_err();
    assert!(matches!(err, XlsxError::Core(sheetstream_core::Error::InvalidAddress(_))));
    assert!(!rows.next_row().unwrap());
}

#[test]
fn test_prefixed_elements() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?><x:worksheet xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:sheetData><x:row r="1"><x:c r="B1"><x:v>7</x:v></x:c></x:row></x:sheetData></x:worksheet>"#;
    let workbook = Package::new().sheet("Sheet1", xml.to_string()).open();
    assert_eq!(
        texts(workbook.rows("Sheet1").unwrap()),
        vec![vec![String::new(), "7".to_string()]]
    );
}

#[test]
fn test_streams_are_independent() {
    let workbook = sample().open();
    let mut first = workbook.rows("Sheet1").unwrap();
    let mut second = workbook.rows("Sheet1").unwrap();
    assert!(first.next_row().unwrap());
    assert!(first.next_row().unwrap());
    assert!(second.next_row().unwrap());
    assert_eq!(first.current_row(), 2);
    assert_eq!(second.current_row(), 1);
    assert_eq!(second.values().unwrap()[0].text(), "name");
    first.close();
    assert!(!first.next_row().unwrap());
    assert!(second.next_row().unwrap());
}
