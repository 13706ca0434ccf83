//! Raw tabular data as parsed from an upload.

use crate::error::{ForecastError, Result};
use std::collections::HashSet;

/// Rows of text cells under named columns, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table, checking that headers are unique and rows are rectangular.
    ///
    /// A blank header name becomes `Unnamed: {position}`, the way an exported
    /// index column is usually labelled.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(ForecastError::Parse("header row is empty".to_string()));
        }

        let headers: Vec<String> = headers
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                if name.trim().is_empty() {
                    format!("Unnamed: {}", i)
                } else {
                    name
                }
            })
            .collect();

        let mut seen = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(ForecastError::Parse(format!("duplicate column name '{}'", name)));
            }
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ForecastError::Parse(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                row.len(),
                headers.len()
            )));
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ForecastError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.clone(),
            })?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn table_preserves_order() {
        let table = RawTable::new(
            strings(&["b", "a"]),
            vec![strings(&["2", "x"]), strings(&["1", "y"])],
        )
        .unwrap();

        assert_eq!(table.headers(), ["b", "a"]);
        assert_eq!(table.column("b").unwrap(), vec!["2", "1"]);
        assert_eq!(table.column("a").unwrap(), vec!["x", "y"]);
        assert_eq!(table.column_index("a"), Some(1));
    }

    #[test]
    fn table_rejects_ragged_rows() {
        let err = RawTable::new(strings(&["a", "b"]), vec![strings(&["1"])]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::Parse("row 1 has 1 fields, expected 2".to_string())
        );
    }

    #[test]
    fn table_rejects_duplicate_headers() {
        assert!(RawTable::new(strings(&["a", "a"]), vec![]).is_err());
        assert!(RawTable::new(vec![], vec![]).is_err());
    }

    #[test]
    fn table_names_blank_headers_by_position() {
        let table = RawTable::new(strings(&["", "date", " "]), vec![strings(&["0", "x", "y"])])
            .unwrap();
        assert_eq!(table.headers(), ["Unnamed: 0", "date", "Unnamed: 2"]);
        assert_eq!(table.column("Unnamed: 2").unwrap(), vec!["y"]);
    }

    #[test]
    fn missing_column_lists_available_names() {
        let table = RawTable::new(strings(&["date", "value"]), vec![]).unwrap();
        assert_eq!(
            table.column("sales").unwrap_err(),
            ForecastError::ColumnNotFound {
                column: "sales".to_string(),
                available: strings(&["date", "value"]),
            }
        );
    }
}
