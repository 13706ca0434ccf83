//! Error types for the forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, regularizing, fitting or exporting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Uploaded bytes are not well-formed delimited text.
    #[error("parse error: {0}")]
    Parse(String),

    /// A selected column does not exist in the table header.
    #[error("column not found: '{column}' (available: {})", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// A time cell could not be interpreted as a date.
    #[error("cannot parse timestamp '{value}' in row {row}")]
    TimestampParse { row: usize, value: String },

    /// A value cell is neither numeric nor a missing marker.
    #[error("cannot parse value '{value}' in row {row}")]
    InvalidValue { row: usize, value: String },

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Model fitting failed (optimizer, degenerate series, structurally invalid config).
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Encoding the result table failed.
    #[error("export error: {0}")]
    Export(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::Parse("invalid UTF-8".to_string());
        assert_eq!(err.to_string(), "parse error: invalid UTF-8");

        let err = ForecastError::ColumnNotFound {
            column: "sales".to_string(),
            available: vec!["date".to_string(), "value".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "column not found: 'sales' (available: date, value)"
        );

        let err = ForecastError::TimestampParse {
            row: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "cannot parse timestamp 'yesterday' in row 3");

        let err = ForecastError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(err.to_string(), "insufficient data: need at least 2, got 1");

        let err = ForecastError::ModelFit("optimizer did not converge".to_string());
        assert_eq!(err.to_string(), "model fit failed: optimizer did not converge");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: ForecastError = io.into();
        assert!(matches!(err, ForecastError::Io(msg) if msg.contains("missing.csv")));
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::FitRequired;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
