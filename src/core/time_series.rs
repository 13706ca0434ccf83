//! TimeSeries data structure for month-start indexed data.

use crate::core::calendar::{self, month_start, months_between};
use crate::error::{ForecastError, Result};
use crate::io::RawTable;
use chrono::{DateTime, Utc};

/// A univariate series on a complete month-start grid.
///
/// Timestamps are strictly increasing and exactly one calendar month apart.
/// Months without an observation hold `NaN` instead of being omitted, so
/// `len()` always equals the number of months spanned.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    label: Option<String>,
}

impl TimeSeries {
    /// Create a monthly series, validating the month-start grid.
    pub fn monthly(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }

        if let Some(t) = timestamps.iter().find(|&&t| month_start(t) != t) {
            return Err(ForecastError::InvalidParameter(format!(
                "timestamp {} is not a month start",
                t.to_rfc3339()
            )));
        }

        for pair in timestamps.windows(2) {
            if months_between(pair[0], pair[1]) != 1 {
                return Err(ForecastError::InvalidParameter(format!(
                    "timestamps must be contiguous months: {} is followed by {}",
                    calendar::date_label(pair[0]),
                    calendar::date_label(pair[1])
                )));
            }
        }

        Ok(Self {
            timestamps,
            values,
            label: None,
        })
    }

    /// Attach the name of the value column.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the number of months in the series.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values, `NaN` marking missing months.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Number of months holding an actual observation.
    pub fn observed_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Number of months left empty by regularization.
    pub fn missing_count(&self) -> usize {
        self.len() - self.observed_count()
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Render the series back into a two-column table.
    ///
    /// Missing months become empty cells, so regularizing the table again
    /// reproduces this series.
    pub fn to_table(&self, time_col: &str, value_col: &str) -> Result<RawTable> {
        let rows = self
            .iter()
            .map(|(t, v)| {
                let value = if v.is_finite() {
                    v.to_string()
                } else {
                    String::new()
                };
                vec![calendar::date_label(t), value]
            })
            .collect();
        RawTable::new(vec![time_col.to_string(), value_col.to_string()], rows)
    }
}

/// Missing months compare equal to each other.
impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        self.timestamps == other.timestamps
            && self.label == other.label
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}
