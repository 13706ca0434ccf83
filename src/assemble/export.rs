//! CSV export and the download link.

use super::table::{ForecastRow, ForecastTable, DATE_COLUMN, FORECAST_COLUMN};
use crate::error::{ForecastError, Result};
use crate::io::UTF8_BOM;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// File name offered for the download.
pub const RESULT_FILENAME: &str = "result.csv";

const DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// Escape everything except unreserved characters and `/`.
const URI_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Encode the table as BOM-prefixed CSV with a `Date,Forecast` header.
///
/// Forecasts are written in shortest round-trip form.
pub fn encode_csv(table: &ForecastTable) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record([DATE_COLUMN, FORECAST_COLUMN])
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record([row.date.as_str(), row.forecast.to_string().as_str()])
            .map_err(|e| ForecastError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ForecastError::Export(e.to_string()))?;

    Ok(format!("{}{}", UTF8_BOM, body))
}

/// Parse CSV produced by [`encode_csv`] back into a table.
pub fn decode_csv(text: &str) -> Result<ForecastTable> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::Parse(e.to_string()))?;
    let found: Vec<&str> = headers.iter().map(str::trim).collect();
    if found != [DATE_COLUMN, FORECAST_COLUMN] {
        return Err(ForecastError::Parse(format!(
            "expected header '{},{}', found '{}'",
            DATE_COLUMN,
            FORECAST_COLUMN,
            found.join(",")
        )));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ForecastError::Parse(e.to_string()))?;
        let date = record.get(0).unwrap_or_default().trim().to_string();
        let cell = record.get(1).unwrap_or_default().trim();
        let forecast = cell
            .parse::<f64>()
            .map_err(|_| ForecastError::InvalidValue {
                row: i + 1,
                value: cell.to_string(),
            })?;
        rows.push(ForecastRow { date, forecast });
    }

    Ok(ForecastTable::from_rows(rows))
}

/// `data:` URI carrying the percent-encoded CSV text.
pub fn data_uri(csv: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, utf8_percent_encode(csv, URI_ESCAPE))
}

/// HTML anchor that downloads the table as [`RESULT_FILENAME`].
pub fn download_link(table: &ForecastTable) -> Result<String> {
    let csv = encode_csv(table)?;
    Ok(format!(
        "<a href=\"{}\" download=\"{}\">Download the Table</a>",
        data_uri(&csv),
        RESULT_FILENAME
    ))
}
