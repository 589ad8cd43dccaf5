use thiserror::Error;

/// Violations of the parameter-set invariants.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("duplicate parameter key: {0}")]
    DuplicateParameter(String),

    #[error("critical parameter '{0}' has no normal range")]
    CriticalWithoutRange(String),

    #[error("invalid range for '{key}': min {min} is greater than max {max}")]
    InvalidRange { key: String, min: f64, max: f64 },
}
