//! Forecaster trait defining the interface between the engine and a model.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate predictions for the months following the fitted series.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Get the fitted values (in-sample one-step predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted, `NaN` for missing months).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exponential::HoltWinters;
    use crate::transform::regularize_points;
    use chrono::{TimeZone, Utc};

    fn make_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let points = (0..n)
            .map(|i| {
                let t = base.checked_add_months(chrono::Months::new(i as u32)).unwrap();
                (t, 10.0 + i as f64 + (i % 3) as f64)
            })
            .collect();
        regularize_points(points).unwrap()
    }

    #[test]
    fn boxed_forecaster_fit_predict() {
        let mut model: BoxedForecaster = Box::new(HoltWinters::simple());
        assert!(!model.is_fitted());

        model.fit(&make_series(20)).unwrap();
        assert!(model.is_fitted());

        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast.horizon(), 5);
    }

    #[test]
    fn boxed_forecasters_are_independent() {
        let mut fitted: BoxedForecaster = Box::new(HoltWinters::holt());
        let unfitted: BoxedForecaster = Box::new(HoltWinters::holt());

        fitted.fit(&make_series(12)).unwrap();

        assert!(fitted.is_fitted());
        assert!(!unfitted.is_fitted());
    }
}
