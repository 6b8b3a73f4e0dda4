//! Tests for reading hyperlinks.

use std::collections::HashMap;

use crate::{worksheet, Package};
use pretty_assertions::assert_eq;

const HYPERLINK_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

fn linked() -> Package {
    Package::new()
        .sheet(
            "Links",
            worksheet(
                r#"<row r="1"><c r="A1"><v>1</v></c></row><row r="2"><c r="B2"><v>2</v></c></row>"#,
                r#"<hyperlinks><hyperlink ref="B2" r:id="rId3"/><hyperlink ref="C4" r:id="rId9"/><hyperlink ref="D5" location="Links!A1"/><hyperlink r:id="rId3"/></hyperlinks>"#,
            ),
        )
        .sheet_rels(&format!(
            r#"<Relationship Id="rId3" Type="{}" Target="https://example.com/report?q=1&amp;p=2" TargetMode="External"/>"#,
            HYPERLINK_REL
        ))
}

#[test]
fn test_hyperlink_ids() {
    let workbook = linked().open();
    assert_eq!(
        workbook.hyperlink_ids("Links").unwrap(),
        HashMap::from([
            ("B2".to_string(), "rId3".to_string()),
            ("C4".to_string(), "rId9".to_string()),
        ])
    );
}

#[test]
fn test_hyperlink_targets() {
    let workbook = linked().open();
    assert_eq!(
        workbook.hyperlinks("Links").unwrap(),
        HashMap::from([(
            "B2".to_string(),
            "https://example.com/report?q=1&p=2".to_string()
        )])
    );
    assert_eq!(
        workbook.relationship_target("Links", "rId3").unwrap().as_deref(),
        Some("https://example.com/report?q=1&p=2")
    );
    assert_eq!(workbook.relationship_target("Links", "rId9").unwrap(), None);
}

#[test]
fn test_stream_collects_hyperlinks() {
    let workbook = linked().open();
    let mut rows = workbook.rows("Links").unwrap();
    assert!(rows.hyperlinks().is_empty());
    while rows.next_row().unwrap() {
        rows.values().unwrap();
    }
    assert_eq!(rows.hyperlinks(), &workbook.hyperlink_ids("Links").unwrap());
}

#[test]
fn test_sheet_without_hyperlinks() {
    let workbook = Package::new()
        .sheet("Plain", worksheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#, ""))
        .open();
    assert!(workbook.hyperlink_ids("Plain").unwrap().is_empty());
    assert!(workbook.hyperlinks("Plain").unwrap().is_empty());
    assert_eq!(workbook.relationship_target("Plain", "rId1").unwrap(), None);
}
