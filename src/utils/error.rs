//! Error handling for the fusion filter and its calibration.

use thiserror::Error;

/// Main error type for the fusion crate
#[derive(Debug, Error)]
pub enum Error {
    /// Paired input sequences differ in length
    #[error("Dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Length of the reference sequence (signal1)
        expected: usize,
        /// Length of the offending sequence
        actual: usize,
    },

    /// A blend coefficient or search parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough (or not usable) data to perform the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type for the fusion crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::InvalidParameter`] for an alpha outside `[0, 1]`.
    pub fn invalid_alpha(alpha: f64) -> Self {
        Error::InvalidParameter(format!("alpha {} is outside [0, 1]", alpha))
    }
}
