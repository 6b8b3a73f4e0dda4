//! Pull-based XML token reader shared by all part parsers

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XlsxResult;

/// A `quick_xml` reader with a one-token lookahead slot.
///
/// Events are returned owned so a token can be handed back with
/// [`push_back`](Self::push_back) and read again by the next call.
pub(crate) struct TokenReader<B: BufRead> {
    reader: Reader<B>,
    buf: Vec<u8>,
    peeked: Option<Event<'static>>,
}

impl<B: BufRead> TokenReader<B> {
    pub(crate) fn new(source: B) -> Self {
        let mut reader = Reader::from_reader(source);
        // whitespace is significant in `xml:space="preserve"` text
        reader.trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            peeked: None,
        }
    }

    /// Next token, taking the lookahead slot first
    pub(crate) fn next(&mut self) -> XlsxResult<Event<'static>> {
        if let Some(event) = self.peeked.take() {
            return Ok(event);
        }
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf)?;
        Ok(event.into_owned())
    }

    /// Put a token back; the next call to [`next`](Self::next) returns it
    pub(crate) fn push_back(&mut self, event: Event<'static>) {
        self.peeked = Some(event);
    }

    /// Skip to the end of an element whose start was just read
    pub(crate) fn skip_element(&mut self, name: &[u8]) -> XlsxResult<()> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                Event::Start(e) if e.local_name().as_ref() == name => depth += 1,
                Event::End(e) if e.local_name().as_ref() == name => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Event::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    /// Text content up to the end of the element whose start was just read
    pub(crate) fn read_text(&mut self, name: &[u8]) -> XlsxResult<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(e) => text.push_str(&e.unescape()?),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
                Event::End(e) if e.local_name().as_ref() == name => return Ok(text),
                Event::Eof => return Ok(text),
                _ => {}
            }
        }
    }
}

/// Unescaped value of the attribute with local name `key`.
///
/// Matching by local name lets `r:id` be found as `id`.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute parsed into any `FromStr` type
pub(crate) fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// OOXML boolean: `1`/`true` are true
pub(crate) fn attr_bool(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attr(e, key).map(|v| v == "1" || v == "true")
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                result.push(ch);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}
