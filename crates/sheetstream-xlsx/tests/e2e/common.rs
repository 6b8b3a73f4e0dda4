//! Common utilities for E2E tests.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use sheetstream_xlsx::{OpenOptions, RowStream, Workbook};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Office theme with the default color scheme
pub const OFFICE_THEME: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
  </a:themeElements>
</a:theme>"#;

/// Wrap `<row>` elements (and anything after `<sheetData>`) into a worksheet
pub fn worksheet(sheet_data: &str, after: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}"><sheetData>{}</sheetData>{}</worksheet>"#,
        REL_NS, sheet_data, after
    )
}

/// Wrap `<si>` elements into a shared string table
pub fn shared_strings(items: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
        items
    )
}

struct Sheet {
    name: String,
    xml: String,
    rels: Option<String>,
}

/// An in-memory XLSX package builder
#[derive(Default)]
pub struct Package {
    sheets: Vec<Sheet>,
    shared_strings: Option<String>,
    styles: Option<String>,
    theme: Option<String>,
    date1904: bool,
    omit_content_types: bool,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, xml: String) -> Self {
        self.sheets.push(Sheet {
            name: name.to_string(),
            xml,
            rels: None,
        });
        self
    }

    /// Relationships of the last added sheet, as `<Relationship>` elements
    pub fn sheet_rels(mut self, relationships: &str) -> Self {
        if let Some(sheet) = self.sheets.last_mut() {
            sheet.rels = Some(format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                relationships
            ));
        }
        self
    }

    pub fn shared_strings(mut self, xml: String) -> Self {
        self.shared_strings = Some(xml);
        self
    }

    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    pub fn theme(mut self, xml: &str) -> Self {
        self.theme = Some(xml.to_string());
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub fn without_content_types(mut self) -> Self {
        self.omit_content_types = true;
        self
    }

    /// Zip the package
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            let mut put = |path: &str, data: &str| {
                zip.start_file(path, options).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            };

            if !self.omit_content_types {
                put("[Content_Types].xml", CONTENT_TYPES);
            }
            put("_rels/.rels", ROOT_RELS);

            let mut sheets = String::new();
            let mut rels = String::new();
            for (idx, sheet) in self.sheets.iter().enumerate() {
                let n = idx + 1;
                sheets.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    sheet.name, n, n
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    n, REL_NS, n
                ));
            }
            let mut next_id = self.sheets.len() + 1;
            for (kind, target, present) in [
                ("sharedStrings", "sharedStrings.xml", self.shared_strings.is_some()),
                ("styles", "styles.xml", self.styles.is_some()),
                ("theme", "theme/theme1.xml", self.theme.is_some()),
            ] {
                if present {
                    rels.push_str(&format!(
                        r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
                        next_id, REL_NS, kind, target
                    ));
                    next_id += 1;
                }
            }

            let workbook_pr = if self.date1904 {
                r#"<workbookPr date1904="1"/>"#
            } else {
                "<workbookPr/>"
            };
            put(
                "xl/workbook.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}">{}<sheets>{}</sheets></workbook>"#,
                    REL_NS, workbook_pr, sheets
                ),
            );
            put(
                "xl/_rels/workbook.xml.rels",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                    rels
                ),
            );

            for (idx, sheet) in self.sheets.iter().enumerate() {
                put(&format!("xl/worksheets/sheet{}.xml", idx + 1), &sheet.xml);
                if let Some(sheet_rels) = &sheet.rels {
                    put(&format!("xl/worksheets/_rels/sheet{}.xml.rels", idx + 1), sheet_rels);
                }
            }
            if let Some(xml) = &self.shared_strings {
                put("xl/sharedStrings.xml", xml);
            }
            if let Some(xml) = &self.styles {
                put("xl/styles.xml", xml);
            }
            if let Some(xml) = &self.theme {
                put("xl/theme/theme1.xml", xml);
            }

            zip.finish().unwrap();
        }
        buf
    }

    pub fn open(&self) -> Workbook<Cursor<Vec<u8>>> {
        self.open_with(OpenOptions::default())
    }

    pub fn open_with(&self, options: OpenOptions) -> Workbook<Cursor<Vec<u8>>> {
        Workbook::from_reader(Cursor::new(self.build()), options).unwrap()
    }
}

/// Text of every row of a stream
pub fn texts(rows: RowStream) -> Vec<Vec<String>> {
    rows.map(|row| row.unwrap().iter().map(|cell| cell.text()).collect())
        .collect()
}

/// A path in a fresh temporary directory; the directory lives as long as
/// the returned guard
pub fn temp_fixture_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.xlsx");
    (dir, path)
}
