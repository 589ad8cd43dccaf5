use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use checkwise_client::ClientError;

/// Why a submission did not produce a prediction.
///
/// Stored in `SubmissionState::last_error`, so it is cloneable and
/// serializable rather than wrapping the transport error itself.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("critical parameters missing: {}", critical_missing.join(", "))]
    IncompleteData { critical_missing: Vec<String> },

    #[error("server rejected the record: {details}")]
    ServerValidationRejected { details: String },

    #[error("validation service unavailable: {cause}")]
    ValidationUnavailable { cause: String },

    #[error("prediction failed: {cause}")]
    PredictionServiceError { cause: String },

    #[error("prediction service returned no ranked diagnoses")]
    EmptyResult,

    #[error("submission cancelled")]
    Cancelled,
}

/// Failures of the document upload path. Record edits report
/// `RegistryError` and submissions report [`SubmissionError`] directly.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}
