//! Error types for the insulin_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for insulin_core operations
///
/// Only `MissingField` and `InvalidValue` abort a recommendation request;
/// every other malformed request field is coerced to a safe default during
/// normalization. The remaining variants serve the table loader and the
/// configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The single mandatory request field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The single mandatory request field is present but unusable
    #[error("Invalid {field} value: {value}")]
    InvalidValue { field: String, value: String },

    /// Dose table parsing or validation error
    #[error("Dose table error: {0}")]
    Table(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
