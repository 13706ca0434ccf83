//! # hw-forecast
//!
//! Monthly Holt-Winters forecasting pipeline.
//!
//! Uploaded CSV bytes are parsed into a [`io::RawTable`], regularized onto a
//! month-start grid as a [`core::TimeSeries`], forecast with additive
//! exponential smoothing, and assembled into chart data, a `Date` / `Forecast`
//! table and a CSV download.
//!
//! ```
//! use hw_forecast::prelude::*;
//!
//! let csv = b"month,sales\n2021-01,10\n2021-02,11\n2021-03,12\n2021-04,13\n";
//! let config = ForecastConfig::new(3).unwrap().with_trend(true);
//! let output = Pipeline::new().run(csv, "month", "sales", &config).unwrap();
//!
//! assert_eq!(output.forecast.horizon(), 3);
//! ```

pub mod assemble;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::assemble::{chart, combine, encode_csv, tabulate, ForecastTable};
    pub use crate::config::ForecastConfig;
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::engine::{forecast, Pipeline, RunOutput};
    pub use crate::error::{ForecastError, Result};
    pub use crate::io::{load, RawTable};
    pub use crate::models::{Forecaster, HoltWinters};
    pub use crate::transform::regularize;
}
