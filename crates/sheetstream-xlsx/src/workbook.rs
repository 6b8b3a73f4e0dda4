//! Workbook package loader
//!
//! Opens the zip container, follows the workbook relationships to the
//! worksheet, shared string, style and theme parts, and hands out
//! [`RowStream`]s over individual worksheets.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, trace, warn};
use quick_xml::events::Event;
use sheetstream_core::{validate_sheet_name, ColorScheme};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::color::ColorResolver;
use crate::error::{FormatError, XlsxError, XlsxResult};
use crate::formatter::ValueFormatter;
use crate::hyperlinks::scan_hyperlinks;
use crate::options::OpenOptions;
use crate::resolve::CellResolver;
use crate::rows::{RowStream, SheetSource};
use crate::shared_strings::SharedStringTable;
use crate::styles::StyleSheet;
use crate::theme::parse_theme;
use crate::xml::{attr, attr_bool, TokenReader};

const CONTENT_TYPES: &str = "[Content_Types].xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const DEFAULT_STYLES: &str = "xl/styles.xml";
const DEFAULT_THEME: &str = "xl/theme/theme1.xml";

/// One `<Relationship>` of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Package path for internal targets, the literal target otherwise
    pub target: String,
}

/// Parse a `.rels` part; internal targets are resolved against `base_dir`
pub(crate) fn parse_relationships<B: io::BufRead>(
    source: B,
    base_dir: &str,
) -> XlsxResult<Vec<Relationship>> {
    let mut reader = TokenReader::new(source);
    let mut rels = Vec::new();

    loop {
        match reader.next()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) else {
                    continue;
                };
                let external = attr(&e, b"TargetMode").is_some_and(|mode| mode == "External");
                let target = if external {
                    target
                } else {
                    resolve_target(base_dir, &target)
                };
                rels.push(Relationship {
                    id,
                    rel_type: attr(&e, b"Type").unwrap_or_default(),
                    target,
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rels)
}

/// Resolve a relationship target to a package path
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`
pub(crate) fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Read a whole part; `None` when the archive has no such entry
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> XlsxResult<Option<Vec<u8>>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn required_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> XlsxResult<Vec<u8>> {
    read_part(archive, path)?.ok_or_else(|| XlsxError::MissingPart(path.to_string()))
}

struct SheetEntry {
    name: String,
    path: String,
    /// Replacement XML that takes the place of the archived part
    pending: Mutex<Option<Vec<u8>>>,
}

/// `date1904` and the declared sheets (name, relationship id)
fn parse_workbook_xml(bytes: &[u8]) -> XlsxResult<(bool, Vec<(String, String)>)> {
    let mut reader = TokenReader::new(bytes);
    let mut date1904 = false;
    let mut sheets = Vec::new();

    loop {
        match reader.next()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookPr" => date1904 = attr_bool(&e, b"date1904").unwrap_or(false),
                b"sheet" => {
                    if let (Some(name), Some(id)) = (attr(&e, b"name"), attr(&e, b"id")) {
                        sheets.push((name, id));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((date1904, sheets))
}

/// An opened workbook.
///
/// Shared strings, styles and the theme are loaded once at open; worksheet
/// parts are read when a stream or hyperlink pass asks for them.
///
/// `Workbook` is `Sync` for `Send` readers, so streams over different
/// sheets may be opened from several threads.
pub struct Workbook<R: Read + Seek> {
    archive: Mutex<ZipArchive<R>>,
    options: OpenOptions,
    sheets: Vec<SheetEntry>,
    date1904: bool,
    shared_strings: Arc<SharedStringTable>,
    styles: Result<Arc<StyleSheet>, FormatError>,
    colors: ColorResolver,
}

impl Workbook<BufReader<File>> {
    /// Open a workbook from a file path with default options
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::open_with_options(path, OpenOptions::default())
    }

    /// Open a workbook from a file path
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: OpenOptions) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }
}

impl<R: Read + Seek> Workbook<R> {
    /// Open a workbook from any seekable reader
    pub fn from_reader(reader: R, options: OpenOptions) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        if archive.by_name(CONTENT_TYPES).is_err() {
            return Err(XlsxError::InvalidFormat(format!("Missing {}", CONTENT_TYPES)));
        }

        let (date1904, declared) = parse_workbook_xml(&required_part(&mut archive, WORKBOOK)?)?;
        let rels_bytes = required_part(&mut archive, WORKBOOK_RELS)?;
        let rels = parse_relationships(rels_bytes.as_slice(), part_dir(WORKBOOK))?;

        let target = |suffix: &str, default: &str| {
            rels.iter()
                .find(|rel| rel.rel_type.ends_with(suffix))
                .map_or_else(|| default.to_string(), |rel| rel.target.clone())
        };

        let mut sheets = Vec::with_capacity(declared.len());
        for (name, id) in declared {
            match rels.iter().find(|rel| rel.id == id && rel.rel_type.ends_with("/worksheet")) {
                Some(rel) => sheets.push(SheetEntry {
                    name,
                    path: rel.target.clone(),
                    pending: Mutex::new(None),
                }),
                None => debug!("sheet {:?}: no worksheet relationship {:?}", name, id),
            }
        }

        let shared_strings = match read_part(&mut archive, &target("/sharedStrings", DEFAULT_SHARED_STRINGS))? {
            Some(bytes) => SharedStringTable::parse(bytes.as_slice())?,
            None => SharedStringTable::new(),
        };

        let styles = match read_part(&mut archive, &target("/styles", DEFAULT_STYLES))? {
            Some(bytes) => StyleSheet::parse(bytes.as_slice()).map(Arc::new).map_err(|err| {
                warn!("styles could not be read, values stay unformatted: {}", err);
                FormatError::StylesUnavailable(err.to_string())
            }),
            None => Ok(Arc::new(StyleSheet::default())),
        };

        let theme = match read_part(&mut archive, &target("/theme", DEFAULT_THEME)) {
            Ok(Some(bytes)) => match parse_theme(bytes.as_slice()) {
                Ok(scheme) => Some(Arc::new(scheme)),
                Err(err) => {
                    warn!("theme could not be read, theme colors are dropped: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("theme could not be read, theme colors are dropped: {}", err);
                None
            }
        };

        let indexed = styles
            .as_ref()
            .ok()
            .and_then(|sheet| sheet.indexed_colors.clone())
            .map(Arc::new);

        debug!(
            "opened workbook: {} sheets, {} shared strings, date1904={}",
            sheets.len(),
            shared_strings.len(),
            date1904
        );

        Ok(Self {
            archive: Mutex::new(archive),
            options,
            sheets,
            date1904,
            shared_strings: Arc::new(shared_strings),
            styles,
            colors: ColorResolver::new(theme, indexed),
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    /// Whether the workbook uses the 1904 date system
    pub fn date1904(&self) -> bool {
        self.date1904
    }

    /// Options the workbook was opened with
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// The shared string table
    pub fn shared_strings(&self) -> &Arc<SharedStringTable> {
        &self.shared_strings
    }

    /// The style sheet, or why it could not be read
    pub fn styles(&self) -> Result<&StyleSheet, &FormatError> {
        self.styles.as_deref()
    }

    /// The theme color scheme, if the workbook has a readable one
    pub fn theme(&self) -> Option<&ColorScheme> {
        self.colors.theme()
    }

    /// A cell resolver over this workbook's tables
    pub fn resolver(&self) -> CellResolver {
        let formatter = ValueFormatter::new(
            self.styles.clone(),
            self.colors.clone(),
            self.date1904,
            self.options.raw_cell_value,
        );
        CellResolver::new(formatter, Arc::clone(&self.shared_strings))
    }

    /// Open a row stream over a worksheet.
    ///
    /// # Errors
    ///
    /// `InvalidSheetName` or `SheetNotFound` before any part is read;
    /// `MissingPart` when the worksheet part is absent from the archive.
    pub fn rows(&self, sheet: &str) -> XlsxResult<RowStream> {
        let entry = self.sheet(sheet)?;
        let source = self.sheet_source(entry)?;
        Ok(RowStream::new(&entry.name, source, self.resolver()))
    }

    /// Hyperlinks of a worksheet: cell reference to relationship id
    pub fn hyperlink_ids(&self, sheet: &str) -> XlsxResult<HashMap<String, String>> {
        let entry = self.sheet(sheet)?;
        scan_hyperlinks(self.sheet_source(entry)?)
    }

    /// Hyperlinks of a worksheet: cell reference to target.
    ///
    /// Links whose relationship cannot be found are left out.
    pub fn hyperlinks(&self, sheet: &str) -> XlsxResult<HashMap<String, String>> {
        let entry = self.sheet(sheet)?;
        let rels = self.sheet_relationships(entry)?;
        let links = scan_hyperlinks(self.sheet_source(entry)?)?;

        Ok(links
            .into_iter()
            .filter_map(|(cell, id)| match rels.iter().find(|rel| rel.id == id) {
                Some(rel) => Some((cell, rel.target.clone())),
                None => {
                    debug!("sheet {:?}: hyperlink {} has no relationship {:?}", entry.name, cell, id);
                    None
                }
            })
            .collect())
    }

    /// Target of a relationship of a worksheet
    pub fn relationship_target(&self, sheet: &str, id: &str) -> XlsxResult<Option<String>> {
        let entry = self.sheet(sheet)?;
        Ok(self
            .sheet_relationships(entry)?
            .into_iter()
            .find(|rel| rel.id == id)
            .map(|rel| rel.target))
    }

    /// Replace the XML of a worksheet.
    ///
    /// Streams opened afterwards read `xml`; open streams are unaffected.
    pub fn replace_sheet_xml<X: Into<Vec<u8>>>(&self, sheet: &str, xml: X) -> XlsxResult<()> {
        let entry = self.sheet(sheet)?;
        let mut pending = entry.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = Some(xml.into());
        Ok(())
    }

    fn sheet(&self, name: &str) -> XlsxResult<&SheetEntry> {
        validate_sheet_name(name).map_err(|err| match err {
            sheetstream_core::Error::InvalidSheetName(msg) => XlsxError::InvalidSheetName(msg),
            other => other.into(),
        })?;
        let lower = name.to_lowercase();
        self.sheets
            .iter()
            .find(|sheet| sheet.name.to_lowercase() == lower)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    fn sheet_relationships(&self, entry: &SheetEntry) -> XlsxResult<Vec<Relationship>> {
        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        match read_part(&mut *archive, &rels_path(&entry.path))? {
            Some(bytes) => parse_relationships(bytes.as_slice(), part_dir(&entry.path)),
            None => Ok(Vec::new()),
        }
    }

    /// Snapshot the worksheet XML for a reader
    fn sheet_source(&self, entry: &SheetEntry) -> XlsxResult<SheetSource> {
        let pending = entry.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bytes) = pending.as_ref() {
            return Ok(SheetSource::Memory(Cursor::new(bytes.clone())));
        }

        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = match archive.by_name(&entry.path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(XlsxError::MissingPart(entry.path.clone())),
            Err(err) => return Err(err.into()),
        };

        if file.size() > self.options.unzip_xml_size_limit {
            trace!(
                "spooling {} ({} bytes) to a temporary file",
                entry.path,
                file.size()
            );
            let mut spool = tempfile::tempfile()?;
            io::copy(&mut file, &mut spool)?;
            spool.seek(SeekFrom::Start(0))?;
            Ok(SheetSource::Spooled(BufReader::new(spool)))
        } else {
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            Ok(SheetSource::Memory(Cursor::new(bytes)))
        }
    }
}
