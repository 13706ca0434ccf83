//! Month-start calendar arithmetic.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Months, TimeZone, Utc};

/// Format used for x-axis labels.
pub const MONTH_LABEL_FORMAT: &str = "%Y-%m";

/// Format used for table row keys and exported dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Midnight UTC on the first day of the month containing `timestamp`.
pub fn month_start(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    // The first of any month at midnight always exists in UTC.
    Utc.with_ymd_and_hms(timestamp.year(), timestamp.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(timestamp)
}

/// Check if a timestamp is exactly a month start.
pub fn is_month_start(timestamp: DateTime<Utc>) -> bool {
    month_start(timestamp) == timestamp
}

/// Shift a timestamp forward by `months` calendar months.
pub fn add_months(timestamp: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    timestamp
        .checked_add_months(Months::new(months))
        .ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "{} + {} months is out of range",
                timestamp.format(DATE_FORMAT),
                months
            ))
        })
}

/// Signed number of calendar months from `start` to `end`, ignoring the day of month.
pub fn months_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let start_index = start.year() as i64 * 12 + start.month0() as i64;
    let end_index = end.year() as i64 * 12 + end.month0() as i64;
    end_index - start_index
}

/// Contiguous month starts beginning one month after `anchor`.
pub fn months_after(anchor: DateTime<Utc>, count: usize) -> Result<Vec<DateTime<Utc>>> {
    let anchor = month_start(anchor);
    (1..=count)
        .map(|step| {
            let step = u32::try_from(step).map_err(|_| {
                ForecastError::InvalidParameter(format!("{} months is out of range", step))
            })?;
            add_months(anchor, step)
        })
        .collect()
}

/// `YYYY-MM` label for charts.
pub fn month_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format(MONTH_LABEL_FORMAT).to_string()
}

/// `YYYY-MM-DD` label for tables and exports.
pub fn date_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn month_start_floors_to_first_day() {
        let t = Utc.with_ymd_and_hms(2021, 7, 19, 13, 45, 0).unwrap();
        assert_eq!(month_start(t), ts(2021, 7, 1));
        assert!(is_month_start(ts(2021, 7, 1)));
        assert!(!is_month_start(t));
    }

    #[test]
    fn add_months_crosses_year_boundary() {
        assert_eq!(add_months(ts(2022, 11, 1), 3).unwrap(), ts(2023, 2, 1));
        assert_eq!(add_months(ts(2022, 1, 1), 0).unwrap(), ts(2022, 1, 1));
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(ts(2020, 1, 1), ts(2022, 12, 1)), 35);
        assert_eq!(months_between(ts(2020, 3, 31), ts(2020, 4, 1)), 1);
        assert_eq!(months_between(ts(2020, 4, 1), ts(2020, 1, 1)), -3);
    }

    #[test]
    fn months_after_skips_anchor() {
        let months = months_after(ts(2022, 12, 1), 3).unwrap();
        assert_eq!(months, vec![ts(2023, 1, 1), ts(2023, 2, 1), ts(2023, 3, 1)]);
        assert!(months_after(ts(2022, 12, 1), 0).unwrap().is_empty());
    }

    #[test]
    fn labels_use_expected_formats() {
        assert_eq!(month_label(ts(2023, 4, 1)), "2023-04");
        assert_eq!(date_label(ts(2023, 4, 1)), "2023-04-01");
    }
}
