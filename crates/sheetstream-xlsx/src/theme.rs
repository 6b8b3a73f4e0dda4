//! Theme color scheme (`xl/theme/theme1.xml`)

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use sheetstream_core::{ColorScheme, SchemeColor};

use crate::error::XlsxResult;
use crate::xml::{attr, TokenReader};

/// Parse the `<a:clrScheme>` of a theme part.
///
/// Slots the part does not define stay empty.
pub fn parse_theme<B: BufRead>(source: B) -> XlsxResult<ColorScheme> {
    let mut reader = TokenReader::new(source);
    let mut scheme = ColorScheme::new();
    let mut in_scheme = false;
    let mut slot: Option<usize> = None;

    loop {
        match reader.next()? {
            Event::Start(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"clrScheme" => {
                        in_scheme = true;
                        scheme.name = attr(&e, b"name");
                    }
                    other if in_scheme => {
                        if let Some(index) = std::str::from_utf8(other)
                            .ok()
                            .and_then(ColorScheme::slot_index)
                        {
                            slot = Some(index);
                        } else if let (Some(index), Some(color)) = (slot, scheme_color(&e)) {
                            scheme.set_slot(index, color);
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) if in_scheme => {
                if let (Some(index), Some(color)) = (slot, scheme_color(&e)) {
                    scheme.set_slot(index, color);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                // only the first scheme counts
                b"clrScheme" => break,
                name if std::str::from_utf8(name)
                    .ok()
                    .and_then(ColorScheme::slot_index)
                    .is_some() =>
                {
                    slot = None
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scheme)
}

fn scheme_color(e: &BytesStart<'_>) -> Option<SchemeColor> {
    match e.local_name().as_ref() {
        b"srgbClr" => attr(e, b"val").map(SchemeColor::Srgb),
        b"sysClr" => Some(SchemeColor::System {
            name: attr(e, b"val").unwrap_or_default(),
            last_color: attr(e, b"lastClr"),
        }),
        _ => None,
    }
}
