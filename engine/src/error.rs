use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Non-positive or non-finite viewport measurement
    #[error("Invalid dimension: {name} must be a positive number, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Accepts finite, strictly positive measurements.
pub fn check_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChartError::InvalidDimension { name, value })
    }
}
