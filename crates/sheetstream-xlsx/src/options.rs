//! Workbook open options

/// Options for opening a workbook
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Return cell values as stored, without number formats or styles
    pub raw_cell_value: bool,
    /// Worksheet parts larger than this many uncompressed bytes are
    /// spooled to a temporary file instead of memory (default: 16 MiB)
    pub unzip_xml_size_limit: u64,
}

impl OpenOptions {
    /// Default spool threshold
    pub const DEFAULT_UNZIP_XML_SIZE_LIMIT: u64 = 16 * 1024 * 1024;

    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set raw cell value mode
    pub fn raw_cell_value(mut self, raw: bool) -> Self {
        self.raw_cell_value = raw;
        self
    }

    /// Set the spool threshold in bytes
    pub fn unzip_xml_size_limit(mut self, limit: u64) -> Self {
        self.unzip_xml_size_limit = limit;
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            raw_cell_value: false,
            unzip_xml_size_limit: Self::DEFAULT_UNZIP_XML_SIZE_LIMIT,
        }
    }
}
