//! Turning a forecast into displayable and exportable forms.
//!
//! - [`combine`] and [`chart`] merge history with the forecast for plotting
//! - [`tabulate`] builds the `Date` / `Forecast` table
//! - [`encode_csv`], [`data_uri`] and [`download_link`] produce the download

mod combine;
mod export;
mod table;

pub use combine::{
    chart, combine, ChartData, ChartPoint, ChartSeries, CombinedPoint, CombinedSeries, Origin,
    ACTUAL_SERIES, CHART_TITLE, FORECAST_SERIES, X_AXIS_LABEL, Y_AXIS_LABEL,
};
pub use export::{data_uri, decode_csv, download_link, encode_csv, RESULT_FILENAME};
pub use table::{tabulate, ForecastRow, ForecastTable, DATE_COLUMN, FORECAST_COLUMN};
