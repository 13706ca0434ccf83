//! Holt-Winters exponential smoothing.
//!
//! One model covers the four structures the pipeline can ask for: simple
//! smoothing, additive trend, additive seasonality, or both. Missing months
//! are tolerated; they contribute no error and the state is carried forward
//! by its own one-step forecast.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Seasonal period used for monthly data.
pub const DEFAULT_SEASONAL_PERIOD: usize = 12;

const SMOOTHING_BOUNDS: (f64, f64) = (0.0001, 0.9999);
/// Initial level offset, in units of the data scale.
const LEVEL_OFFSET_BOUNDS: (f64, f64) = (-10.0, 10.0);
/// Initial trend offset, in units of the data scale per month.
const TREND_OFFSET_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// Trend component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendType {
    /// No trend
    #[default]
    None,
    /// Additive trend: `ŷ_{t+h} = l_t + h*b_t`
    Additive,
}

/// Seasonal component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalType {
    /// No seasonality
    #[default]
    None,
    /// Additive seasonality: `ŷ_{t+h} = l_t + s_{t+h-m}`
    Additive,
}

/// Estimated smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Level smoothing (0 < alpha < 1).
    pub alpha: f64,
    /// Trend smoothing, present when the model has a trend.
    pub beta: Option<f64>,
    /// Seasonal smoothing, present when the model is seasonal.
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct State {
    level: f64,
    trend: f64,
    /// Indexed by position in the cycle (`t % m`).
    seasonals: Vec<f64>,
}

struct Pass {
    sse: f64,
    observed: usize,
    state: State,
    fitted: Vec<f64>,
}

/// Holt-Winters forecaster with estimated initialization.
///
/// The model equations (absent components are zero):
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h*b_t + s_{t+h-m}`
///
/// Fitting estimates α, β, γ together with the initial level and trend by
/// minimizing the one-step-ahead squared error with Nelder-Mead. Initial
/// seasonal indices come from the detrended first cycle.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    trend_type: TrendType,
    seasonal_type: SeasonalType,
    seasonal_period: usize,
    optimizer: NelderMeadConfig,
    params: Option<SmoothingParams>,
    initial: Option<State>,
    state: Option<State>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    sse: Option<f64>,
    n: usize,
    last_timestamp: Option<DateTime<Utc>>,
}

impl HoltWinters {
    /// Create an unfitted model with the given structure.
    pub fn new(trend_type: TrendType, seasonal_type: SeasonalType, seasonal_period: usize) -> Self {
        Self {
            trend_type,
            seasonal_type,
            seasonal_period,
            optimizer: NelderMeadConfig::default(),
            params: None,
            initial: None,
            state: None,
            fitted: None,
            residuals: None,
            sse: None,
            n: 0,
            last_timestamp: None,
        }
    }

    /// Simple exponential smoothing (no trend, no seasonality).
    pub fn simple() -> Self {
        Self::new(TrendType::None, SeasonalType::None, DEFAULT_SEASONAL_PERIOD)
    }

    /// Holt's linear method (additive trend, no seasonality).
    pub fn holt() -> Self {
        Self::new(TrendType::Additive, SeasonalType::None, DEFAULT_SEASONAL_PERIOD)
    }

    /// Additive seasonality without trend.
    pub fn seasonal(seasonal_period: usize) -> Self {
        Self::new(TrendType::None, SeasonalType::Additive, seasonal_period)
    }

    /// Additive trend and additive seasonality.
    pub fn additive(seasonal_period: usize) -> Self {
        Self::new(TrendType::Additive, SeasonalType::Additive, seasonal_period)
    }

    /// Replace the optimizer settings used during fitting.
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn trend_type(&self) -> TrendType {
        self.trend_type
    }

    pub fn seasonal_type(&self) -> SeasonalType {
        self.seasonal_type
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    pub fn has_trend(&self) -> bool {
        self.trend_type == TrendType::Additive
    }

    pub fn has_seasonal(&self) -> bool {
        self.seasonal_type == SeasonalType::Additive
    }

    /// Get the estimated smoothing parameters.
    pub fn params(&self) -> Option<SmoothingParams> {
        self.params
    }

    pub fn alpha(&self) -> Option<f64> {
        self.params.map(|p| p.alpha)
    }

    pub fn beta(&self) -> Option<f64> {
        self.params.and_then(|p| p.beta)
    }

    pub fn gamma(&self) -> Option<f64> {
        self.params.and_then(|p| p.gamma)
    }

    /// Estimated level before the first observation.
    pub fn initial_level(&self) -> Option<f64> {
        self.initial.as_ref().map(|s| s.level)
    }

    /// Estimated trend before the first observation.
    pub fn initial_trend(&self) -> Option<f64> {
        self.initial.as_ref().map(|s| s.trend)
    }

    /// Level after the last observation.
    pub fn level(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.level)
    }

    /// Trend after the last observation (zero without a trend component).
    pub fn trend(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.trend)
    }

    /// Seasonal indices by position in the cycle.
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.state
            .as_ref()
            .filter(|_| self.has_seasonal())
            .map(|s| s.seasonals.as_slice())
    }

    /// In-sample sum of squared one-step errors.
    pub fn sse(&self) -> Option<f64> {
        self.sse
    }

    /// Starting state from the data, before estimation refines level and trend.
    fn heuristic_state(&self, values: &[f64]) -> Result<State> {
        if self.has_seasonal() {
            let m = self.seasonal_period;
            let first_cycle = &values[..m];
            let observed = stats::observed(first_cycle).count();
            if observed < 2 {
                return Err(ForecastError::ModelFit(format!(
                    "first seasonal cycle has {} observed values, need at least 2",
                    observed
                )));
            }

            let cycle_mean = stats::mean(first_cycle);
            let trend = if self.has_trend() && values.len() >= 2 * m {
                let next_mean = stats::mean(&values[m..2 * m]);
                if next_mean.is_finite() {
                    (next_mean - cycle_mean) / m as f64
                } else {
                    0.0
                }
            } else {
                0.0
            };

            let center = (m as f64 - 1.0) / 2.0;
            let mut seasonals: Vec<f64> = first_cycle
                .iter()
                .enumerate()
                .map(|(k, y)| {
                    if y.is_finite() {
                        y - (cycle_mean + trend * (k as f64 - center))
                    } else {
                        0.0
                    }
                })
                .collect();
            normalize_seasonals(&mut seasonals);

            Ok(State {
                level: cycle_mean - trend * (center + 1.0),
                trend,
                seasonals,
            })
        } else {
            let mut observed = values
                .iter()
                .enumerate()
                .filter(|(_, y)| y.is_finite())
                .map(|(i, &y)| (i, y));
            let (i0, y0) = observed
                .next()
                .ok_or(ForecastError::InsufficientData { needed: 2, got: 0 })?;
            let (i1, y1) = observed
                .next()
                .ok_or(ForecastError::InsufficientData { needed: 2, got: 1 })?;

            let trend = if self.has_trend() {
                (y1 - y0) / (i1 - i0) as f64
            } else {
                0.0
            };

            Ok(State {
                level: y0 - (i0 as f64 + 1.0) * trend,
                trend,
                seasonals: Vec::new(),
            })
        }
    }

    /// Run the smoothing recursions over the whole series.
    fn smooth(&self, values: &[f64], params: &SmoothingParams, initial: &State) -> Pass {
        let alpha = params.alpha;
        let beta = params.beta.unwrap_or(0.0);
        let gamma = params.gamma.unwrap_or(0.0);
        let m = self.seasonal_period;

        let mut state = initial.clone();
        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;
        let mut observed = 0;

        for (t, &y) in values.iter().enumerate() {
            let s = if self.has_seasonal() {
                state.seasonals[t % m]
            } else {
                0.0
            };
            let forecast = state.level + state.trend + s;
            fitted.push(forecast);

            // A missing month is replaced by its forecast, which leaves
            // level + trend and the seasonal index unchanged.
            let actual = if y.is_finite() {
                let error = y - forecast;
                sse += error * error;
                observed += 1;
                y
            } else {
                forecast
            };

            let level_prev = state.level;
            state.level = alpha * (actual - s) + (1.0 - alpha) * (level_prev + state.trend);
            if self.has_trend() {
                state.trend = beta * (state.level - level_prev) + (1.0 - beta) * state.trend;
            }
            if self.has_seasonal() {
                state.seasonals[t % m] = gamma * (actual - state.level) + (1.0 - gamma) * s;
            }
        }

        Pass {
            sse,
            observed,
            state,
            fitted,
        }
    }

    /// Map an optimizer point back to parameters and an initial state.
    fn unpack(&self, x: &[f64], heuristic: &State, scale: f64) -> (SmoothingParams, State) {
        let mut it = x.iter().copied();
        let alpha = it.next().unwrap_or(0.5);
        let beta = if self.has_trend() { it.next() } else { None };
        let gamma = if self.has_seasonal() { it.next() } else { None };
        let level = heuristic.level + it.next().unwrap_or(0.0) * scale;
        let trend = if self.has_trend() {
            heuristic.trend + it.next().unwrap_or(0.0) * scale
        } else {
            0.0
        };

        (
            SmoothingParams { alpha, beta, gamma },
            State {
                level,
                trend,
                seasonals: heuristic.seasonals.clone(),
            },
        )
    }

    /// Starting point and bounds, laid out as `[α, β?, γ?, Δl0, Δb0?]`.
    fn search_space(&self) -> (Vec<f64>, Vec<(f64, f64)>) {
        let mut start = vec![0.3];
        let mut bounds = vec![SMOOTHING_BOUNDS];
        if self.has_trend() {
            start.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.has_seasonal() {
            start.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        start.push(0.0);
        bounds.push(LEVEL_OFFSET_BOUNDS);
        if self.has_trend() {
            start.push(0.0);
            bounds.push(TREND_OFFSET_BOUNDS);
        }
        (start, bounds)
    }

    /// Estimate smoothing parameters and initial level/trend jointly.
    fn estimate(&self, values: &[f64], heuristic: &State) -> Result<(SmoothingParams, State)> {
        let scale = stats::scale(values);
        let (start, bounds) = self.search_space();

        let objective = |x: &[f64]| {
            let (params, initial) = self.unpack(x, heuristic, scale);
            let pass = self.smooth(values, &params, &initial);
            let mse = pass.sse / (pass.observed.max(1) as f64 * scale * scale);
            if mse.is_finite() {
                mse
            } else {
                f64::INFINITY
            }
        };

        let result = nelder_mead(objective, &start, Some(&bounds), &self.optimizer);

        if result.restarts > 0 {
            warn!(
                model = self.name(),
                restarts = result.restarts,
                iterations = result.iterations,
                "parameter search restarted"
            );
        }
        if !result.optimal_value.is_finite() {
            return Err(ForecastError::ModelFit(
                "objective is not finite at any candidate parameters".to_string(),
            ));
        }
        if !result.converged {
            return Err(ForecastError::ModelFit(format!(
                "parameter estimation did not converge after {} iterations",
                result.iterations
            )));
        }

        Ok(self.unpack(&result.optimal_point, heuristic, scale))
    }
}

/// Center additive seasonal indices so they sum to zero.
fn normalize_seasonals(seasonals: &mut [f64]) {
    if seasonals.is_empty() {
        return;
    }
    let adjustment = seasonals.iter().sum::<f64>() / seasonals.len() as f64;
    for s in seasonals.iter_mut() {
        *s -= adjustment;
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::simple()
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let observed = series.observed_count();
        if observed < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: observed,
            });
        }

        if self.has_seasonal() {
            if self.seasonal_period < 2 {
                return Err(ForecastError::InvalidParameter(format!(
                    "seasonal period must be at least 2, got {}",
                    self.seasonal_period
                )));
            }
            if values.len() < self.seasonal_period {
                return Err(ForecastError::ModelFit(format!(
                    "seasonal model needs at least one full cycle of {} months, got {}",
                    self.seasonal_period,
                    values.len()
                )));
            }
        }

        let last_timestamp = series
            .last_timestamp()
            .ok_or(ForecastError::InsufficientData { needed: 2, got: 0 })?;

        let heuristic = self.heuristic_state(values)?;
        let (params, initial) = self.estimate(values, &heuristic)?;
        let pass = self.smooth(values, &params, &initial);

        let residuals: Vec<f64> = values
            .iter()
            .zip(&pass.fitted)
            .map(|(y, f)| y - f)
            .collect();

        debug!(
            model = self.name(),
            alpha = params.alpha,
            beta = ?params.beta,
            gamma = ?params.gamma,
            sse = pass.sse,
            observed = pass.observed,
            "fitted exponential smoothing"
        );

        self.n = values.len();
        self.last_timestamp = Some(last_timestamp);
        self.params = Some(params);
        self.initial = Some(initial);
        self.sse = Some(pass.sse);
        self.state = Some(pass.state);
        self.fitted = Some(pass.fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        let anchor = self.last_timestamp.ok_or(ForecastError::FitRequired)?;
        let m = self.seasonal_period;

        let predictions: Vec<f64> = (1..=horizon)
            .map(|h| {
                let s = if self.has_seasonal() {
                    state.seasonals[(self.n + h - 1) % m]
                } else {
                    0.0
                };
                state.level + h as f64 * state.trend + s
            })
            .collect();

        Forecast::after(anchor, predictions)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        match (self.trend_type, self.seasonal_type) {
            (TrendType::None, SeasonalType::None) => "SimpleExponentialSmoothing",
            (TrendType::Additive, SeasonalType::None) => "Holt(additive)",
            (TrendType::None, SeasonalType::Additive) => "HoltWinters(seasonal additive)",
            (TrendType::Additive, SeasonalType::Additive) => "HoltWinters(additive)",
        }
    }
}
