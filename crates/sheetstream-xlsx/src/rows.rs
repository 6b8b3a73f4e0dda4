//! Forward-only row stream over one worksheet

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};

use log::{debug, trace};
use quick_xml::events::{BytesStart, Event};
use sheetstream_core::{CellAddress, CellKind, RawCell, RichText};

use crate::error::XlsxResult;
use crate::hyperlinks::hyperlink_ref;
use crate::resolve::CellResolver;
use crate::xml::{attr, attr_bool, attr_parse, TokenReader};

/// The bytes of a worksheet part, in memory or spooled to a temp file
pub(crate) enum SheetSource {
    Memory(Cursor<Vec<u8>>),
    Spooled(BufReader<File>),
}

impl Read for SheetSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SheetSource::Memory(cursor) => cursor.read(buf),
            SheetSource::Spooled(file) => file.read(buf),
        }
    }
}

impl BufRead for SheetSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SheetSource::Memory(cursor) => cursor.fill_buf(),
            SheetSource::Spooled(file) => file.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SheetSource::Memory(cursor) => cursor.consume(amt),
            SheetSource::Spooled(file) => file.consume(amt),
        }
    }
}

/// Row-level attributes of the current row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowOptions {
    /// Height in points (`ht`)
    pub height: Option<f64>,
    /// `customHeight`
    pub custom_height: bool,
    /// `hidden`
    pub hidden: bool,
    /// Row style (`s`), when `customFormat` is set
    pub style: Option<u32>,
}

impl RowOptions {
    fn from_row(e: &BytesStart<'_>) -> Self {
        let custom_format = attr_bool(e, b"customFormat").unwrap_or(false);
        Self {
            height: attr_parse(e, b"ht"),
            custom_height: attr_bool(e, b"customHeight").unwrap_or(false),
            hidden: attr_bool(e, b"hidden").unwrap_or(false),
            style: attr_parse(e, b"s").filter(|_| custom_format),
        }
    }
}

/// A forward-only cursor over the rows of one worksheet.
///
/// [`next_row`](Self::next_row) moves to the next row number and
/// [`values`](Self::values) decodes the row under the cursor. Row numbers
/// without a `<row>` element read as empty rows.
///
/// ```no_run
/// use sheetstream_xlsx::Workbook;
///
/// let workbook = Workbook::open("report.xlsx")?;
/// let mut rows = workbook.rows("Sheet1")?;
/// while rows.next_row()? {
///     let cells = rows.values()?;
///     println!("{}", cells.iter().map(|c| c.text()).collect::<Vec<_>>().join("\t"));
/// }
/// rows.close();
/// # Ok::<(), sheetstream_xlsx::XlsxError>(())
/// ```
pub struct RowStream {
    sheet: String,
    reader: Option<TokenReader<SheetSource>>,
    resolver: CellResolver,
    /// Row number the caller is positioned on (1-based, 0 before the first call)
    seek_row: u32,
    /// Row number of the last `<row>` start read
    physical_row: u32,
    /// The start of row `physical_row` sits undecoded in the lookahead slot
    row_pending: bool,
    cached: Option<(u32, Vec<RichText>)>,
    row_options: RowOptions,
    hyperlinks: HashMap<String, String>,
    exhausted: bool,
}

impl RowStream {
    pub(crate) fn new(sheet: &str, source: SheetSource, resolver: CellResolver) -> Self {
        debug!("opening row stream for sheet {:?}", sheet);
        Self {
            sheet: sheet.to_string(),
            reader: Some(TokenReader::new(source)),
            resolver,
            seek_row: 0,
            physical_row: 0,
            row_pending: false,
            cached: None,
            row_options: RowOptions::default(),
            hyperlinks: HashMap::new(),
            exhausted: false,
        }
    }

    /// Name of the worksheet this stream reads
    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// 1-based row number under the cursor; 0 before the first `next_row`
    pub fn current_row(&self) -> u32 {
        self.seek_row
    }

    /// Attributes of the current row; defaults for rows without an element
    pub fn row_options(&self) -> RowOptions {
        if self.physical_row == self.seek_row {
            self.row_options
        } else {
            RowOptions::default()
        }
    }

    /// Hyperlinks seen so far: cell reference to relationship id.
    ///
    /// `<hyperlinks>` follows `<sheetData>`, so the map is complete once the
    /// stream is exhausted.
    pub fn hyperlinks(&self) -> &HashMap<String, String> {
        &self.hyperlinks
    }

    /// Advance to the next row number.
    ///
    /// Returns `false` once the worksheet has no row at or after it.
    pub fn next_row(&mut self) -> XlsxResult<bool> {
        self.seek_row = self.seek_row.saturating_add(1);
        if self.physical_row >= self.seek_row {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        match self.advance() {
            Ok(found) => Ok(found),
            Err(err) => {
                self.fail();
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> XlsxResult<bool> {
        let Some(reader) = self.reader.as_mut() else {
            self.exhausted = true;
            return Ok(false);
        };

        loop {
            let event = reader.next()?;
            let row_start = match &event {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => Some((attr_parse::<u32>(e, b"r"), RowOptions::from_row(e))),
                    b"hyperlink" => {
                        if let Some((cell, id)) = hyperlink_ref(e) {
                            self.hyperlinks.insert(cell, id);
                        }
                        None
                    }
                    _ => None,
                },
                Event::End(e) if e.local_name().as_ref() == b"worksheet" => break,
                Event::Eof => break,
                _ => None,
            };
            let Some((number, options)) = row_start else {
                continue;
            };

            if self.row_pending {
                // the caller moved past this row without decoding it
                self.row_pending = false;
                if matches!(event, Event::Start(_)) {
                    reader.skip_element(b"row")?;
                }
                continue;
            }
            self.physical_row = number.unwrap_or(self.physical_row + 1);
            self.row_options = options;
            self.row_pending = true;
            reader.push_back(event);
            return Ok(true);
        }

        debug!("sheet {:?} exhausted after row {}", self.sheet, self.physical_row);
        self.exhausted = true;
        Ok(self.physical_row >= self.seek_row)
    }

    /// Decode the row under the cursor.
    ///
    /// Returns an empty vector when the cursor is on a row the document
    /// does not contain. Repeated calls at one position return the same
    /// cells.
    pub fn values(&mut self) -> XlsxResult<Vec<RichText>> {
        if let Some((row, cells)) = &self.cached {
            if *row == self.seek_row {
                return Ok(cells.clone());
            }
        }
        if self.physical_row != self.seek_row || !self.row_pending {
            return Ok(Vec::new());
        }
        match self.decode_row() {
            Ok(cells) => {
                self.cached = Some((self.seek_row, cells.clone()));
                Ok(cells)
            }
            Err(err) => {
                self.fail();
                Err(err)
            }
        }
    }

    fn decode_row(&mut self) -> XlsxResult<Vec<RichText>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Vec::new());
        };
        self.row_pending = false;

        let mut cells = Vec::new();
        if !matches!(reader.next()?, Event::Start(_)) {
            return Ok(cells);
        }

        let mut column = 0u32;
        loop {
            match reader.next()? {
                Event::Start(e) if e.local_name().as_ref() == b"c" => {
                    let cell = read_cell(reader, &e, true)?;
                    push_cell(&self.resolver, &mut cells, &mut column, cell)?;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                    let cell = read_cell(reader, &e, false)?;
                    push_cell(&self.resolver, &mut cells, &mut column, cell)?;
                }
                Event::End(e) if e.local_name().as_ref() == b"row" => break,
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(cells)
    }

    fn fail(&mut self) {
        self.exhausted = true;
        self.row_pending = false;
        self.reader = None;
    }

    /// Release the worksheet source; later calls report no rows
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("closing row stream for sheet {:?}", self.sheet);
        }
        self.exhausted = true;
        self.row_pending = false;
    }
}

impl Iterator for RowStream {
    type Item = XlsxResult<Vec<RichText>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_row() {
            Ok(true) => Some(self.values()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read one `<c>` element whose start was just consumed
fn read_cell(
    reader: &mut TokenReader<SheetSource>,
    start: &BytesStart<'_>,
    has_children: bool,
) -> XlsxResult<RawCell> {
    let mut cell = RawCell {
        reference: attr(start, b"r"),
        kind: CellKind::from_type_code(attr(start, b"t").as_deref()),
        style: attr_parse(start, b"s").unwrap_or(0),
        ..RawCell::default()
    };
    if !has_children {
        return Ok(cell);
    }

    loop {
        match reader.next()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"v" => cell.value = reader.read_text(b"v")?,
                b"f" => {
                    cell.has_formula = true;
                    reader.skip_element(b"f")?;
                }
                b"is" => cell.inline = Some(read_inline(reader)?),
                other => reader.skip_element(other)?,
            },
            Event::Empty(e) if e.local_name().as_ref() == b"f" => cell.has_formula = true,
            Event::End(e) if e.local_name().as_ref() == b"c" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(cell)
}

/// Text of an `<is>` payload, without phonetic runs
fn read_inline(reader: &mut TokenReader<SheetSource>) -> XlsxResult<String> {
    let mut text = String::new();
    loop {
        match reader.next()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => text.push_str(&reader.read_text(b"t")?),
                b"rPh" => reader.skip_element(b"rPh")?,
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"is" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(crate::xml::decode_excel_escapes(&text))
}

/// Resolve a cell and place it at its column, padding gaps
fn push_cell(
    resolver: &CellResolver,
    cells: &mut Vec<RichText>,
    column: &mut u32,
    cell: RawCell,
) -> XlsxResult<()> {
    *column = match cell.reference.as_deref() {
        Some(reference) => CellAddress::parse(reference)?.column_number(),
        None => *column + 1,
    };

    let formatted = resolver.resolve(&cell);
    if let Some(err) = &formatted.error {
        debug!("cell {:?} kept literal: {}", cell.reference, err);
    }
    let value = formatted.value;
    if value.is_empty() && !cell.has_formula {
        return Ok(());
    }

    trace!("cell {:?} -> column {}", cell.reference, column);
    while (cells.len() as u32) + 1 < *column {
        cells.push(RichText::empty());
    }
    cells.push(value);
    Ok(())
}
