//! Forecast result structure for holding predictions.

use crate::core::calendar::{months_after, months_between};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Timestamped point predictions continuing a monthly series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    timestamps: Vec<DateTime<Utc>>,
    point: Vec<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach month-start timestamps following `anchor` to point predictions.
    ///
    /// The anchor is the last historical month and is not repeated.
    pub fn after(anchor: DateTime<Utc>, values: Vec<f64>) -> Result<Self> {
        let timestamps = months_after(anchor, values.len())?;
        Ok(Self {
            timestamps,
            point: values,
        })
    }

    /// Build a forecast from explicit timestamps and values.
    pub fn from_parts(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.windows(2).any(|w| months_between(w[0], w[1]) != 1) {
            return Err(ForecastError::InvalidParameter(
                "forecast timestamps must be contiguous months".to_string(),
            ));
        }
        Ok(Self {
            timestamps,
            point: values,
        })
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get the point predictions.
    pub fn values(&self) -> &[f64] {
        &self.point
    }

    /// Iterate over `(timestamp, prediction)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.point.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forecast_after_starts_one_month_past_anchor() {
        let anchor = Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap();
        let forecast = Forecast::after(anchor, vec![1.0, 2.0]).unwrap();

        assert_eq!(forecast.horizon(), 2);
        assert_eq!(
            forecast.timestamps(),
            [
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
            ]
        );
        assert_eq!(forecast.values(), [1.0, 2.0]);
    }

    #[test]
    fn forecast_empty_state() {
        let forecast = Forecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
        assert_eq!(forecast.iter().count(), 0);
    }

    #[test]
    fn forecast_from_parts_validates_shape() {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();

        assert!(Forecast::from_parts(vec![t0], vec![1.0, 2.0]).is_err());
        assert!(Forecast::from_parts(vec![t0, t2], vec![1.0, 2.0]).is_err());
        assert!(Forecast::from_parts(vec![t0], vec![1.0]).is_ok());
    }
}
