//! Month-start regularization of raw tables.
//!
//! Turns two text columns into a [`TimeSeries`] on a complete month-start
//! grid. Months with no source row become explicit missing entries (`NaN`);
//! nothing is filled or interpolated, so the model sees the gaps.

use crate::core::calendar::{add_months, month_start, months_between};
use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::io::RawTable;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, warn};

/// Date-time layouts tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date layouts tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Year-month layouts, completed with day 1.
const MONTH_FORMATS: [(&str, &str); 2] = [("%Y-%m-%d", "-01"), ("%Y/%m/%d", "/01")];

/// Cell contents read as a missing value.
const MISSING_MARKERS: [&str; 7] = ["", "NA", "NaN", "nan", "null", "None", "N/A"];

/// Build a monthly series from two columns of a raw table.
///
/// # Errors
/// - [`ForecastError::ColumnNotFound`] if either column is absent
/// - [`ForecastError::TimestampParse`] on the first unparseable time cell
/// - [`ForecastError::InvalidValue`] on a non-numeric value cell
/// - [`ForecastError::InsufficientData`] if the table has no rows
///
/// # Example
/// ```
/// use hw_forecast::io::load;
/// use hw_forecast::transform::regularize;
///
/// let table = load(b"month,sales\n2020-01-01,10\n2020-04-01,13\n").unwrap();
/// let series = regularize(&table, "month", "sales").unwrap();
///
/// assert_eq!(series.len(), 4);
/// assert!(series.values()[1].is_nan());
/// ```
pub fn regularize(table: &RawTable, time_col: &str, value_col: &str) -> Result<TimeSeries> {
    let times = table.column(time_col)?;
    let values = table.column(value_col)?;

    let mut points = Vec::with_capacity(table.row_count());
    for (i, (time_cell, value_cell)) in times.iter().zip(values.iter()).enumerate() {
        let row = i + 1;
        let timestamp = parse_timestamp(time_cell).ok_or_else(|| ForecastError::TimestampParse {
            row,
            value: time_cell.to_string(),
        })?;
        let value = parse_value(value_cell).ok_or_else(|| ForecastError::InvalidValue {
            row,
            value: value_cell.to_string(),
        })?;
        points.push((timestamp, value));
    }

    Ok(regularize_points(points)?.with_label(value_col))
}

/// Align `(timestamp, value)` points to a complete month-start grid.
///
/// Points are sorted stably by timestamp and floored to the start of their
/// month. If several points share a month, the last one in sorted order wins.
pub fn regularize_points(mut points: Vec<(DateTime<Utc>, f64)>) -> Result<TimeSeries> {
    if points.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    points.sort_by_key(|(t, _)| *t);

    let first = month_start(points[0].0);
    let last = month_start(points[points.len() - 1].0);
    let span = months_between(first, last) as usize + 1;

    let mut values = vec![f64::NAN; span];
    let mut present = vec![false; span];
    let mut collapsed = 0usize;

    for (t, v) in &points {
        let idx = months_between(first, month_start(*t)) as usize;
        if present[idx] {
            collapsed += 1;
        }
        values[idx] = *v;
        present[idx] = true;
    }

    let timestamps = (0..span)
        .map(|i| add_months(first, i as u32))
        .collect::<Result<Vec<_>>>()?;

    let gaps = present.iter().filter(|p| !**p).count();
    if collapsed > 0 {
        warn!(collapsed, "multiple rows fell in the same month; kept the latest");
    }
    debug!(
        rows = points.len(),
        months = span,
        gaps,
        "regularized to month-start grid"
    );

    TimeSeries::monthly(timestamps, values)
}

/// Parse a time cell in any of the accepted layouts.
pub fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    // Keep the wall-clock date so month starts east of UTC stay in their month.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Utc.from_utc_datetime(&dt.naive_local()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| {
            MONTH_FORMATS.iter().find_map(|(format, day)| {
                NaiveDate::parse_from_str(&format!("{}{}", s, day), format).ok()
            })
        })?;

    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a value cell; missing markers become `NaN`, infinities are rejected.
pub fn parse_value(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if MISSING_MARKERS.contains(&s) {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok().filter(|v| !v.is_infinite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parse_timestamp_accepts_common_layouts() {
        assert_eq!(parse_timestamp("2021-03-01"), Some(ts(2021, 3, 1)));
        assert_eq!(parse_timestamp("2021/03/01"), Some(ts(2021, 3, 1)));
        assert_eq!(parse_timestamp("2021-03"), Some(ts(2021, 3, 1)));
        assert_eq!(parse_timestamp("2021/03"), Some(ts(2021, 3, 1)));
        assert_eq!(parse_timestamp("03/01/2021"), Some(ts(2021, 3, 1)));
        assert_eq!(parse_timestamp(" 2021-03-01 "), Some(ts(2021, 3, 1)));
        assert_eq!(
            parse_timestamp("2021-03-01 12:30:00"),
            Some(Utc.with_ymd_and_hms(2021, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2021-03-01T00:00:00+09:00"),
            Some(ts(2021, 3, 1))
        );
        assert_eq!(
            parse_timestamp("2021-03-31T23:30:00-05:00"),
            Some(Utc.with_ymd_and_hms(2021, 3, 31, 23, 30, 0).unwrap())
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2021-13-01"), None);
    }

    #[test]
    fn parse_value_handles_missing_markers() {
        assert_eq!(parse_value("1.25"), Some(1.25));
        assert_eq!(parse_value(" -3 "), Some(-3.0));
        assert!(parse_value("").unwrap().is_nan());
        assert!(parse_value("NA").unwrap().is_nan());
        assert_eq!(parse_value("twelve"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("-inf"), None);
        assert_eq!(parse_value("1e400"), None);
    }

    #[test]
    fn regularize_rejects_infinite_value() {
        let table = load(b"d,v\n2020-01-01,1\n2020-02-01,inf\n").unwrap();
        assert_eq!(
            regularize(&table, "d", "v").unwrap_err(),
            ForecastError::InvalidValue {
                row: 2,
                value: "inf".to_string()
            }
        );
    }

    #[test]
    fn regularize_keeps_local_month_of_offset_dates() {
        let table = load(
            b"d,v\n2021-01-01T00:00:00+09:00,1\n2021-02-01T00:00:00+09:00,2\n2021-03-01T00:00:00+09:00,3\n",
        )
        .unwrap();
        let series = regularize(&table, "d", "v").unwrap();
        assert_eq!(
            series.timestamps(),
            [ts(2021, 1, 1), ts(2021, 2, 1), ts(2021, 3, 1)]
        );
        assert_eq!(series.values(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn regularize_complete_series_keeps_every_month() {
        let table = load(b"d,v\n2020-01-01,1\n2020-02-01,2\n2020-03-01,3\n").unwrap();
        let series = regularize(&table, "d", "v").unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), [1.0, 2.0, 3.0]);
        assert_eq!(series.label(), Some("v"));
    }

    #[test]
    fn regularize_inserts_missing_months() {
        let table = load(b"d,v\n2020-01-01,1\n2020-05-01,5\n").unwrap();
        let series = regularize(&table, "d", "v").unwrap();

        assert_eq!(series.len(), 5);
        assert_eq!(series.missing_count(), 3);
        assert_eq!(series.timestamps()[2], ts(2020, 3, 1));
        assert!(series.values()[1..4].iter().all(|v| v.is_nan()));
        assert_eq!(series.values()[4], 5.0);
    }

    #[test]
    fn regularize_sorts_unordered_rows() {
        let table = load(b"d,v\n2020-03-01,3\n2020-01-01,1\n2020-02-01,2\n").unwrap();
        let series = regularize(&table, "d", "v").unwrap();
        assert_eq!(series.values(), [1.0, 2.0, 3.0]);
        assert_eq!(series.first_timestamp(), Some(ts(2020, 1, 1)));
    }

    #[test]
    fn regularize_keeps_last_row_for_duplicate_month() {
        let table = load(b"d,v\n2020-01-01,1\n2020-02-01,2\n2020-02-01,20\n").unwrap();
        let series = regularize(&table, "d", "v").unwrap();
        assert_eq!(series.values(), [1.0, 20.0]);
    }

    #[test]
    fn regularize_floors_mid_month_dates() {
        let table = load(b"d,v\n2020-01-15,1\n2020-02-28,2\n").unwrap();
        let series = regularize(&table, "d", "v").unwrap();
        assert_eq!(series.timestamps(), [ts(2020, 1, 1), ts(2020, 2, 1)]);
    }

    #[test]
    fn regularize_reports_missing_columns() {
        let table = load(b"d,v\n2020-01-01,1\n").unwrap();
        assert!(matches!(
            regularize(&table, "date", "v"),
            Err(ForecastError::ColumnNotFound { column, .. }) if column == "date"
        ));
        assert!(matches!(
            regularize(&table, "d", "value"),
            Err(ForecastError::ColumnNotFound { column, .. }) if column == "value"
        ));
    }

    #[test]
    fn regularize_reports_bad_timestamp_row() {
        let table = load(b"d,v\n2020-01-01,1\nsoon,2\n").unwrap();
        assert_eq!(
            regularize(&table, "d", "v").unwrap_err(),
            ForecastError::TimestampParse {
                row: 2,
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn regularize_reports_bad_value_row() {
        let table = load(b"d,v\n2020-01-01,abc\n").unwrap();
        assert!(matches!(
            regularize(&table, "d", "v"),
            Err(ForecastError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn regularize_empty_table_is_insufficient() {
        let table = load(b"d,v\n").unwrap();
        assert_eq!(
            regularize(&table, "d", "v").unwrap_err(),
            ForecastError::InsufficientData { needed: 1, got: 0 }
        );
    }

    #[test]
    fn regularize_is_idempotent() {
        let table = load(b"d,v\n2020-01-01,1.5\n2020-04-01,\n2020-06-01,2.25\n").unwrap();
        let once = regularize(&table, "d", "v").unwrap();
        let twice = regularize(&once.to_table("d", "v").unwrap(), "d", "v").unwrap();
        assert_eq!(once, twice);
    }
}
