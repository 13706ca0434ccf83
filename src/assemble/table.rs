//! Tabular view of a forecast.

use crate::core::calendar::date_label;
use crate::core::Forecast;
use std::fmt;

pub const DATE_COLUMN: &str = "Date";
pub const FORECAST_COLUMN: &str = "Forecast";

/// A single forecast row keyed by its `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub date: String,
    pub forecast: f64,
}

/// `Date` / `Forecast` table, one row per forecast month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn from_rows(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.date.as_str())
    }

    pub fn forecasts(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.forecast)
    }

    /// Look up the forecast for a `YYYY-MM-DD` date.
    pub fn get(&self, date: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.date == date).map(|r| r.forecast)
    }
}

/// Build the renderable table for a forecast.
pub fn tabulate(forecast: &Forecast) -> ForecastTable {
    ForecastTable {
        rows: forecast
            .iter()
            .map(|(timestamp, forecast)| ForecastRow {
                date: date_label(timestamp),
                forecast,
            })
            .collect(),
    }
}

impl fmt::Display for ForecastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.forecasts().map(|v| format!("{:.4}", v)).collect();
        let date_width = self
            .dates()
            .map(str::len)
            .chain(std::iter::once(DATE_COLUMN.len()))
            .max()
            .unwrap_or(0);
        let value_width = values
            .iter()
            .map(String::len)
            .chain(std::iter::once(FORECAST_COLUMN.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:<dw$}  {:>vw$}",
            DATE_COLUMN,
            FORECAST_COLUMN,
            dw = date_width,
            vw = value_width
        )?;
        writeln!(f, "{}  {}", "-".repeat(date_width), "-".repeat(value_width))?;
        for (date, value) in self.dates().zip(&values) {
            writeln!(
                f,
                "{:<dw$}  {:>vw$}",
                date,
                value,
                dw = date_width,
                vw = value_width
            )?;
        }
        Ok(())
    }
}
