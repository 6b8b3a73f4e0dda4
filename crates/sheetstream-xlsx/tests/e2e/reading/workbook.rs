//! Tests for opening packages and looking up sheets.

use std::io::Cursor;

use crate::{temp_fixture_path, texts, worksheet, Package};
use pretty_assertions::assert_eq;
use sheetstream_xlsx::{OpenOptions, Workbook, XlsxError};

fn two_sheets() -> Package {
    Package::new()
        .sheet("Data", worksheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#, ""))
        .sheet("Q&amp;A", worksheet(r#"<row r="1"><c r="A1"><v>2</v></c></row>"#, ""))
}

#[test]
fn test_sheet_names_in_order() {
    let workbook = two_sheets().open();
    assert_eq!(workbook.sheet_names(), vec!["Data", "Q&A"]);
    assert!(!workbook.date1904());
    assert!(workbook.shared_strings().is_empty());
}

#[test]
fn test_sheet_lookup_errors() {
    let workbook = two_sheets().open();
    assert!(matches!(workbook.rows("Missing"), Err(XlsxError::SheetNotFound(name)) if name == "Missing"));
    assert!(matches!(workbook.rows(""), Err(XlsxError::InvalidSheetName(_))));
    assert!(matches!(workbook.rows("a/b"), Err(XlsxError::InvalidSheetName(_))));
    assert!(matches!(
        workbook.rows(&"x".repeat(32)),
        Err(XlsxError::InvalidSheetName(_))
    ));
    assert!(matches!(workbook.hyperlinks("Missing"), Err(XlsxError::SheetNotFound(_))));
}

#[test]
fn test_sheet_lookup_ignores_case() {
    let workbook = two_sheets().open();
    assert_eq!(texts(workbook.rows("data").unwrap()), vec![vec!["1".to_string()]]);
    assert_eq!(workbook.rows("Q&A").unwrap().sheet_name(), "Q&A");
}

#[test]
fn test_missing_content_types() {
    let bytes = two_sheets().without_content_types().build();
    let err = Workbook::from_reader(Cursor::new(bytes), OpenOptions::default()).err();
    assert!(matches!(err, Some(XlsxError::InvalidFormat(_))));
}

#[test]
fn test_not_a_zip() {
    let err = Workbook::from_reader(Cursor::new(b"not a zip".to_vec()), OpenOptions::default()).err();
    assert!(matches!(err, Some(XlsxError::Zip(_))));
}

#[test]
fn test_replace_sheet_xml() {
    let workbook = two_sheets().open();
    let before = workbook.rows("Data").unwrap();

    workbook
        .replace_sheet_xml(
            "Data",
            worksheet(r#"<row r="2"><c r="B2"><v>replaced</v></c></row>"#, ""),
        )
        .unwrap();

    assert_eq!(texts(before), vec![vec!["1".to_string()]]);
    assert_eq!(
        texts(workbook.rows("Data").unwrap()),
        vec![vec![], vec![String::new(), "replaced".to_string()]]
    );
    assert!(matches!(
        workbook.replace_sheet_xml("Nope", Vec::new()),
        Err(XlsxError::SheetNotFound(_))
    ));
}

#[test]
fn test_open_from_path() {
    let (_dir, path) = temp_fixture_path();
    std::fs::write(&path, two_sheets().build()).unwrap();

    let workbook = Workbook::open(&path).unwrap();
    assert_eq!(texts(workbook.rows("Q&A").unwrap()), vec![vec!["2".to_string()]]);

    let workbook = Workbook::open_with_options(&path, OpenOptions::new().unzip_xml_size_limit(0)).unwrap();
    assert_eq!(workbook.options().unzip_xml_size_limit, 0);
    assert_eq!(texts(workbook.rows("Data").unwrap()), vec![vec!["1".to_string()]]);
}

#[test]
fn test_open_missing_file() {
    let (_dir, path) = temp_fixture_path();
    assert!(matches!(Workbook::open(&path), Err(XlsxError::Io(_))));
}

#[test]
fn test_workbook_is_shared_across_threads() {
    let workbook = two_sheets().open();
    std::thread::scope(|scope| {
        let data = scope.spawn(|| texts(workbook.rows("Data").unwrap()));
        let qa = scope.spawn(|| texts(workbook.rows("Q&A").unwrap()));
        assert_eq!(data.join().unwrap(), vec![vec!["1".to_string()]]);
        assert_eq!(qa.join().unwrap(), vec![vec!["2".to_string()]]);
    });
}
