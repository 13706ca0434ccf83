//! CSV ingest of uploaded bytes.

use crate::error::{ForecastError, Result};
use crate::io::{RawTable, UTF8_BOM};
use std::path::Path;
use tracing::debug;

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter (default: `,`).
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Parse comma-separated bytes with a header row.
///
/// # Example
/// ```
/// use hw_forecast::io::load;
///
/// let table = load(b"month,sales\n2020-01-01,10\n2020-02-01,12\n").unwrap();
/// assert_eq!(table.headers(), ["month", "sales"]);
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn load(bytes: &[u8]) -> Result<RawTable> {
    load_with(bytes, &CsvOptions::default())
}

/// Parse delimited bytes with a header row using explicit options.
pub fn load_with(bytes: &[u8], options: &CsvOptions) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM.as_bytes()).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ForecastError::Parse(format!("input is not UTF-8 text: {}", e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ForecastError::Parse(format!("failed to read header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ForecastError::Parse("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ForecastError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let table = RawTable::new(headers, rows)?;
    debug!(
        columns = table.headers().len(),
        rows = table.row_count(),
        "loaded table"
    );
    Ok(table)
}

/// Read a CSV file from disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ForecastError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    load(&bytes)
}
