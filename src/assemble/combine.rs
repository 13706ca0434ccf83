//! Merge history and forecast for display.

use crate::core::calendar::month_label;
use crate::core::{Forecast, TimeSeries};
use chrono::{DateTime, Utc};

pub const CHART_TITLE: &str = "Forecast Visualization";
pub const X_AXIS_LABEL: &str = "Date";
pub const Y_AXIS_LABEL: &str = "Value";
pub const ACTUAL_SERIES: &str = "Act";
pub const FORECAST_SERIES: &str = "Forecast";

/// Where a point in a [`CombinedSeries`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Actual,
    Forecast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedPoint {
    pub timestamp: DateTime<Utc>,
    /// `NaN` for a missing historical month.
    pub value: f64,
    pub origin: Origin,
}

/// History followed by forecast, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedSeries {
    points: Vec<CombinedPoint>,
}

impl CombinedSeries {
    pub fn points(&self) -> &[CombinedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with the given origin, in order.
    pub fn by_origin(&self, origin: Origin) -> impl Iterator<Item = &CombinedPoint> + '_ {
        self.points.iter().filter(move |p| p.origin == origin)
    }
}

/// Concatenate history and forecast, tagging each point with its origin.
pub fn combine(series: &TimeSeries, forecast: &Forecast) -> CombinedSeries {
    let actual = series.iter().map(|(timestamp, value)| CombinedPoint {
        timestamp,
        value,
        origin: Origin::Actual,
    });
    let predicted = forecast.iter().map(|(timestamp, value)| CombinedPoint {
        timestamp,
        value,
        origin: Origin::Forecast,
    });

    CombinedSeries {
        points: actual.chain(predicted).collect(),
    }
}

/// One point on a chart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// `YYYY-MM` axis label.
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A named line with its colour hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

/// Rendering-ready description of the forecast chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Look up a line by name.
    pub fn series(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

fn chart_series<'a>(
    name: &str,
    color: &str,
    points: impl Iterator<Item = &'a CombinedPoint>,
) -> ChartSeries {
    ChartSeries {
        name: name.to_string(),
        color: color.to_string(),
        points: points
            .map(|p| ChartPoint {
                label: month_label(p.timestamp),
                timestamp: p.timestamp,
                value: p.value,
            })
            .collect(),
    }
}

/// Build the two-line chart: history in black, forecast in blue.
pub fn chart(series: &TimeSeries, forecast: &Forecast) -> ChartData {
    let combined = combine(series, forecast);

    ChartData {
        title: CHART_TITLE.to_string(),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        series: vec![
            chart_series(ACTUAL_SERIES, "black", combined.by_origin(Origin::Actual)),
            chart_series(FORECAST_SERIES, "blue", combined.by_origin(Origin::Forecast)),
        ],
    }
}
