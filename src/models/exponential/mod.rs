//! Exponential smoothing models.
//!
//! [`HoltWinters`] covers simple smoothing, Holt's additive trend, and
//! additive seasonality with or without trend.

mod holt_winters;

pub use holt_winters::{
    HoltWinters, SeasonalType, SmoothingParams, TrendType, DEFAULT_SEASONAL_PERIOD,
};
