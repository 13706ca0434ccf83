//! Core data structures for monthly forecasting.

pub mod calendar;
mod forecast;
mod time_series;

pub use forecast::Forecast;
pub use time_series::TimeSeries;
