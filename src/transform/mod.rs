//! Data transformations for raw uploads.
//!
//! # Example
//!
//! ```
//! use hw_forecast::io::load;
//! use hw_forecast::transform::regularize;
//!
//! let table = load(b"date,value\n2021-01-01,4\n2021-03-01,6\n").unwrap();
//! let series = regularize(&table, "date", "value").unwrap();
//!
//! // February is kept as an explicit gap.
//! assert_eq!(series.len(), 3);
//! assert_eq!(series.missing_count(), 1);
//! ```

pub mod regularize;

pub use regularize::{parse_timestamp, parse_value, regularize, regularize_points};
