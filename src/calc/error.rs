//! Calculator error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised by the calculators and the history store
#[derive(Error, Debug)]
pub enum CalcError {
    /// A required input was zero or absent
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// An input was negative, NaN or out of range
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// History export failed
    #[error("Export error: {0}")]
    Export(String),
}

impl From<csv::Error> for CalcError {
    fn from(err: csv::Error) -> Self {
        CalcError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::Export(err.to_string())
    }
}

/// Result type alias for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Accept a strictly positive, finite required input
pub(crate) fn require_positive(field: &'static str, value: f64) -> CalcResult<f64> {
    if value == 0.0 {
        return Err(CalcError::MissingInput(field));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::InvalidInput {
            field,
            reason: format!("{} is not a positive number", value),
        });
    }
    Ok(value)
}

/// Resolve an optional input: `None` and zero fall back to `default`
pub(crate) fn or_default(field: &'static str, value: Option<f64>, default: f64) -> CalcResult<f64> {
    match value {
        None => Ok(default),
        Some(v) if v == 0.0 => Ok(default),
        Some(v) => require_positive(field, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("volume", 2.5).unwrap(), 2.5);
        assert!(matches!(
            require_positive("volume", 0.0),
            Err(CalcError::MissingInput("volume"))
        ));
        assert!(matches!(
            require_positive("volume", -1.0),
            Err(CalcError::InvalidInput { field: "volume", .. })
        ));
        assert!(matches!(
            require_positive("volume", f64::NAN),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default("velocity", None, 900.0).unwrap(), 900.0);
        assert_eq!(or_default("velocity", Some(0.0), 900.0).unwrap(), 900.0);
        assert_eq!(or_default("velocity", Some(700.0), 900.0).unwrap(), 700.0);
        assert!(or_default("velocity", Some(-5.0), 900.0).is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CalcError::MissingInput("room length").to_string(),
            "Missing required input: room length"
        );
    }
}
