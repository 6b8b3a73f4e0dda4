//! Hyperlink collection from worksheet XML

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};

use crate::error::XlsxResult;
use crate::xml::{attr, TokenReader};

/// `ref` and `r:id` of a `<hyperlink>`; `None` unless both are present
pub(crate) fn hyperlink_ref(e: &BytesStart<'_>) -> Option<(String, String)> {
    Some((attr(e, b"ref")?, attr(e, b"id")?))
}

/// Collect cell reference to relationship id pairs from a worksheet.
///
/// `<sheetData>` is skipped without being decoded.
pub(crate) fn scan_hyperlinks<B: BufRead>(source: B) -> XlsxResult<HashMap<String, String>> {
    let mut reader = TokenReader::new(source);
    let mut links = HashMap::new();

    loop {
        match reader.next()? {
            Event::Start(e) if e.local_name().as_ref() == b"sheetData" => {
                reader.skip_element(b"sheetData")?;
            }
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"hyperlink" => {
                if let Some((cell, id)) = hyperlink_ref(&e) {
                    links.insert(cell, id);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"worksheet" => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(links)
}
