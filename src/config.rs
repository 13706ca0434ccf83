//! Run configuration for the forecast engine.

use crate::error::{ForecastError, Result};

/// Seasonal period applied whenever seasonality is enabled.
pub const SEASONAL_PERIOD: usize = 12;

/// Smallest accepted forecast horizon.
pub const MIN_HORIZON: usize = 1;

/// Largest accepted forecast horizon.
pub const MAX_HORIZON: usize = 100;

/// Default number of months to forecast.
pub const DEFAULT_HORIZON: usize = 12;

/// Structural choices for one forecast run.
///
/// The horizon is validated at construction, so a `ForecastConfig` in hand is
/// always usable by the engine.
///
/// # Example
/// ```
/// use hw_forecast::config::ForecastConfig;
///
/// let config = ForecastConfig::new(24).unwrap().with_trend(true);
/// assert_eq!(config.horizon(), 24);
/// assert!(config.use_trend());
/// assert!(!config.use_seasonal());
///
/// assert!(ForecastConfig::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    horizon: usize,
    use_trend: bool,
    use_seasonal: bool,
}

impl ForecastConfig {
    /// Create a configuration with both components disabled.
    pub fn new(horizon: usize) -> Result<Self> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
            return Err(ForecastError::InvalidParameter(format!(
                "horizon must be between {} and {}, got {}",
                MIN_HORIZON, MAX_HORIZON, horizon
            )));
        }
        Ok(Self {
            horizon,
            use_trend: false,
            use_seasonal: false,
        })
    }

    /// Enable or disable the additive trend.
    pub fn with_trend(mut self, use_trend: bool) -> Self {
        self.use_trend = use_trend;
        self
    }

    /// Enable or disable additive seasonality.
    pub fn with_seasonal(mut self, use_seasonal: bool) -> Self {
        self.use_seasonal = use_seasonal;
        self
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn use_trend(&self) -> bool {
        self.use_trend
    }

    pub fn use_seasonal(&self) -> bool {
        self.use_seasonal
    }

    /// Always [`SEASONAL_PERIOD`], whatever the data cadence.
    pub fn seasonal_period(&self) -> usize {
        SEASONAL_PERIOD
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            use_trend: false,
            use_seasonal: false,
        }
    }
}
