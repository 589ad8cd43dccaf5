use thiserror::Error;

use checkwise_core::error::CoreError;

/// Failure to bring a value into its parameter's canonical unit.
///
/// Always recoverable: the validation engine downgrades the cell to `Empty`
/// and the extraction merger leaves it `NotExtracted`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown unit '{unit}' for parameter '{key}'")]
    UnknownUnit { key: String, unit: String },

    #[error("non-finite value {value} for parameter '{key}'")]
    NonFinite { key: String, value: f64 },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("parameter registry unavailable: {0}")]
    Unavailable(String),

    #[error("parameter metadata lists no parameters")]
    EmptyMetadata,

    #[error("invalid parameter metadata: {0}")]
    InvalidMetadata(#[from] CoreError),

    #[error("parameter not found: {0}")]
    NotFound(String),
}
