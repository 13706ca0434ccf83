//! Forecast engine and the end-to-end pipeline.
//!
//! [`forecast`] fits a fresh model for every call. [`Pipeline`] chains
//! loading, regularization, forecasting and assembly into one fallible run.

use crate::assemble::{self, ChartData, CombinedSeries, ForecastTable};
use crate::config::ForecastConfig;
use crate::core::{Forecast, TimeSeries};
use crate::error::Result;
use crate::io::{self, CsvOptions};
use crate::models::exponential::{HoltWinters, SeasonalType, TrendType};
use crate::models::Forecaster;
use crate::transform;
use tracing::info;

/// Model matching the configuration's structural toggles.
pub fn build_model(config: &ForecastConfig) -> HoltWinters {
    let trend = if config.use_trend() {
        TrendType::Additive
    } else {
        TrendType::None
    };
    let seasonal = if config.use_seasonal() {
        SeasonalType::Additive
    } else {
        SeasonalType::None
    };
    HoltWinters::new(trend, seasonal, config.seasonal_period())
}

/// Fit the configured model to `series` and forecast `config.horizon()` months.
pub fn forecast(series: &TimeSeries, config: &ForecastConfig) -> Result<Forecast> {
    let mut model = build_model(config);
    model.fit(series)?;
    let result = model.predict(config.horizon())?;

    info!(
        model = model.name(),
        months = series.len(),
        missing = series.missing_count(),
        horizon = result.horizon(),
        alpha = ?model.alpha(),
        beta = ?model.beta(),
        gamma = ?model.gamma(),
        "forecast complete"
    );

    Ok(result)
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: TimeSeries,
    pub forecast: Forecast,
    pub combined: CombinedSeries,
    pub chart: ChartData,
    pub table: ForecastTable,
    /// BOM-prefixed CSV export of `table`.
    pub csv: String,
}

/// Loader, regularizer, engine and assembler wired together.
///
/// # Example
/// ```
/// use hw_forecast::config::ForecastConfig;
/// use hw_forecast::engine::Pipeline;
///
/// let csv = b"month,sales\n2021-01-01,10\n2021-02-01,12\n2021-03-01,14\n";
/// let config = ForecastConfig::new(2).unwrap().with_trend(true);
/// let output = Pipeline::new().run(csv, "month", "sales", &config).unwrap();
///
/// assert_eq!(output.table.len(), 2);
/// assert_eq!(output.table.rows()[0].date, "2021-04-01");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    csv_options: CsvOptions,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv_options(mut self, csv_options: CsvOptions) -> Self {
        self.csv_options = csv_options;
        self
    }

    /// Regularized series for a column selection, without forecasting.
    pub fn prepare(&self, bytes: &[u8], time_col: &str, value_col: &str) -> Result<TimeSeries> {
        let table = io::load_with(bytes, &self.csv_options)?;
        transform::regularize(&table, time_col, value_col)
    }

    /// Run every stage. Either all outputs are produced or the first error is returned.
    pub fn run(
        &self,
        bytes: &[u8],
        time_col: &str,
        value_col: &str,
        config: &ForecastConfig,
    ) -> Result<RunOutput> {
        let series = self.prepare(bytes, time_col, value_col)?;
        let forecast = forecast(&series, config)?;

        let combined = assemble::combine(&series, &forecast);
        let chart = assemble::chart(&series, &forecast);
        let table = assemble::tabulate(&forecast);
        let csv = assemble::encode_csv(&table)?;

        Ok(RunOutput {
            series,
            forecast,
            combined,
            chart,
            table,
            csv,
        })
    }
}
