//! Shared string table (`xl/sharedStrings.xml`)

use std::io::BufRead;
use std::sync::{PoisonError, RwLock};

use quick_xml::events::{BytesStart, Event};
use sheetstream_core::{ColorSpec, Underline};

use crate::error::XlsxResult;
use crate::styles::parse_color;
use crate::xml::{attr, attr_parse, decode_excel_escapes, TokenReader};

/// Run properties (`<rPr>`) of a rich shared string run.
///
/// Unlike style sheet fonts, run booleans honor `val="0"`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunProperties {
    /// `<b>`
    pub bold: Option<bool>,
    /// `<i>`
    pub italic: Option<bool>,
    /// `<strike>`
    pub strike: Option<bool>,
    /// `<u>`; a bare `<u/>` is single
    pub underline: Option<Underline>,
    /// `<color>`
    pub color: Option<ColorSpec>,
    /// `<rFont val>`
    pub name: Option<String>,
    /// `<sz val>`
    pub size: Option<f64>,
}

/// One `<r>` of a rich shared string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SharedRun {
    /// Run text
    pub text: String,
    /// Run properties, when the run has `<rPr>`
    pub properties: Option<RunProperties>,
}

impl SharedRun {
    /// Create a run
    pub fn new<S: Into<String>>(text: S, properties: Option<RunProperties>) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }
}

/// One `<si>` entry
#[derive(Debug, Clone, PartialEq)]
pub enum SharedStringItem {
    /// Plain `<t>` text
    Plain(String),
    /// Formatted runs
    Rich(Vec<SharedRun>),
}

impl SharedStringItem {
    /// Concatenated text
    pub fn text(&self) -> String {
        match self {
            SharedStringItem::Plain(text) => text.clone(),
            SharedStringItem::Rich(runs) => runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }
}

/// The workbook's shared string table.
///
/// Loaded once when the workbook opens and read by every row stream;
/// entries may still be appended through [`push`](Self::push).
#[derive(Debug, Default)]
pub struct SharedStringTable {
    items: RwLock<Vec<SharedStringItem>>,
}

impl SharedStringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from entries
    pub fn from_items(items: Vec<SharedStringItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Entry at a zero-based index
    pub fn get(&self, index: usize) -> Option<SharedStringItem> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(index).cloned()
    }

    /// Append an entry, returning its index
    pub fn push(&self, item: SharedStringItem) -> usize {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.push(item);
        items.len() - 1
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse `sharedStrings.xml`.
    ///
    /// Phonetic runs (`<rPh>`) are dropped and `_xHHHH_` escapes decoded.
    pub fn parse<B: BufRead>(source: B) -> XlsxResult<Self> {
        let mut reader = TokenReader::new(source);
        let mut items = Vec::new();

        let mut plain = String::new();
        let mut runs: Vec<SharedRun> = Vec::new();
        let mut current_run: Option<SharedRun> = None;
        let mut properties: Option<RunProperties> = None;
        let mut in_si = false;

        loop {
            match reader.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        plain.clear();
                        runs.clear();
                    }
                    b"rPh" | b"phoneticPr" => reader.skip_element(e.local_name().as_ref())?,
                    b"r" if in_si => current_run = Some(SharedRun::default()),
                    b"rPr" if current_run.is_some() => properties = Some(RunProperties::default()),
                    b"t" if in_si => {
                        let text = decode_excel_escapes(&reader.read_text(b"t")?);
                        match current_run.as_mut() {
                            Some(run) => run.text.push_str(&text),
                            None => plain.push_str(&text),
                        }
                    }
                    _ => {
                        if let Some(props) = properties.as_mut() {
                            apply_run_property(props, &e);
                        }
                    }
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"si" {
                        items.push(SharedStringItem::Plain(String::new()));
                    } else if let Some(props) = properties.as_mut() {
                        apply_run_property(props, &e);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"rPr" => {
                        if let Some(run) = current_run.as_mut() {
                            run.properties = properties.take();
                        }
                    }
                    b"r" => {
                        if let Some(run) = current_run.take() {
                            runs.push(run);
                        }
                    }
                    b"si" => {
                        in_si = false;
                        if runs.is_empty() {
                            items.push(SharedStringItem::Plain(std::mem::take(&mut plain)));
                        } else {
                            items.push(SharedStringItem::Rich(std::mem::take(&mut runs)));
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self::from_items(items))
    }
}

fn apply_run_property(props: &mut RunProperties, e: &BytesStart<'_>) {
    let flag = || attr(e, b"val").map_or(true, |v| v != "0" && v != "false");
    match e.local_name().as_ref() {
        b"b" => props.bold = Some(flag()),
        b"i" => props.italic = Some(flag()),
        b"strike" => props.strike = Some(flag()),
        b"u" => {
            props.underline = Some(attr(e, b"val").map_or(Underline::Single, |v| Underline::from_xlsx(&v)))
        }
        b"color" => props.color = Some(parse_color(e)),
        b"rFont" => props.name = attr(e, b"val"),
        b"sz" => props.size = attr_parse(e, b"val"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>Hello</t></si>
  <si><r><rPr><b/><sz val="11"/><color theme="1"/><rFont val="Calibri"/></rPr><t>Hello</t></r><r><t xml:space="preserve"> World</t></r></si>
  <si><t>Total</t><rPh sb="0" eb="1"><t>ignored</t></rPh></si>
  <si><t>line1_x000a_line2</t></si>
  <si/>
</sst>"#;

    #[test]
    fn test_parse_plain_and_rich() {
        let table = SharedStringTable::parse(SST.as_bytes()).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(0), Some(SharedStringItem::Plain("Hello".into())));
        assert_eq!(
            table.get(1),
            Some(SharedStringItem::Rich(vec![
                SharedRun::new(
                    "Hello",
                    Some(RunProperties {
                        bold: Some(true),
                        size: Some(11.0),
                        color: Some(ColorSpec::theme(1, 0.0)),
                        name: Some("Calibri".into()),
                        ..Default::default()
                    })
                ),
                SharedRun::new(" World", None),
            ]))
        );
        assert_eq!(table.get(5), None);
    }

    #[test]
    fn test_phonetic_runs_ignored() {
        let table = SharedStringTable::parse(SST.as_bytes()).unwrap();
        assert_eq!(table.get(2), Some(SharedStringItem::Plain("Total".into())));
    }

    #[test]
    fn test_escapes_and_empty_items() {
        let table = SharedStringTable::parse(SST.as_bytes()).unwrap();
        assert_eq!(table.get(3).map(|i| i.text()).as_deref(), Some("line1\nline2"));
        assert_eq!(table.get(4), Some(SharedStringItem::Plain(String::new())));
    }

    #[test]
    fn test_run_flags_honor_val() {
        let xml = r#"<sst><si><r><rPr><b val="0"/><i val="1"/><u/></rPr><t>x</t></r></si><si><r><rPr><u val="double"/></rPr><t>y</t></r></si></sst>"#;
        let table = SharedStringTable::parse(xml.as_bytes()).unwrap();
        let Some(SharedStringItem::Rich(runs)) = table.get(0) else {
            panic!("expected rich item");
        };
        let props = runs[0].properties.clone().unwrap();
        assert_eq!(props.bold, Some(false));
        assert_eq!(props.italic, Some(true));
        assert_eq!(props.underline, Some(Underline::Single));

        let Some(SharedStringItem::Rich(runs)) = table.get(1) else {
            panic!("expected rich item");
        };
        assert_eq!(runs[0].properties.as_ref().and_then(|p| p.underline), Some(Underline::Double));
    }

    #[test]
    fn test_push_appends() {
        let table = SharedStringTable::new();
        assert!(table.is_empty());
        assert_eq!(table.push(SharedStringItem::Plain("a".into())), 0);
        assert_eq!(table.push(SharedStringItem::Plain("b".into())), 1);
        assert_eq!(table.get(1).map(|i| i.text()).as_deref(), Some("b"));
    }
}
