//! Validate-then-predict submission with a single in-flight guard.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};
use ts_rs::TS;

use checkwise_client::{ClientError, DiagnosisService};
use checkwise_core::api::{PredictResponse, ValidateResponse};
use checkwise_core::models::{ParameterRecord, ParameterSet, PredictionResult, RankedDiagnosis};
use checkwise_panel::{evaluate, is_submittable, to_request_body};

use crate::error::SubmissionError;

const VALIDATION_FALLBACK: &str = "the record did not pass server-side validation";
const PREDICTION_FALLBACK: &str = "the prediction service returned no result";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Predicting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SubmissionState {
    pub phase: SubmissionPhase,
    pub last_error: Option<SubmissionError>,
    pub result: Option<PredictionResult>,
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self.phase,
            SubmissionPhase::Validating | SubmissionPhase::Predicting
        )
    }
}

/// Drives `validate` then `predict` against the service and publishes every
/// phase change on a watch channel.
pub struct SubmissionPipeline {
    service: Arc<dyn DiagnosisService>,
    state: watch::Sender<SubmissionState>,
}

impl SubmissionPipeline {
    pub fn new(service: Arc<dyn DiagnosisService>) -> Self {
        let (state, _) = watch::channel(SubmissionState::default());
        Self { service, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Submit a snapshot of `record`.
    ///
    /// Rejected with [`SubmissionError::InFlight`] and no state change while
    /// another submission is validating or predicting. A record that fails
    /// the local completeness gate never reaches the network. There are no
    /// retries; every failure needs a new call.
    ///
    /// Dropping the returned future before it completes leaves the phase at
    /// `Failed` with [`SubmissionError::Cancelled`].
    pub async fn submit(
        &self,
        record: &ParameterRecord,
        set: &ParameterSet,
    ) -> Result<PredictionResult, SubmissionError> {
        if !self.begin() {
            warn!("submission rejected, another one is in flight");
            return Err(SubmissionError::InFlight);
        }
        let guard = CancelGuard::new(&self.state);

        let outcome = self.run(record, set).await;
        guard.disarm();

        match &outcome {
            Ok(result) => {
                self.state.send_modify(|s| {
                    s.phase = SubmissionPhase::Succeeded;
                    s.last_error = None;
                    s.result = Some(result.clone());
                });
                info!(
                    primary = %result.primary_diagnosis,
                    ranked = result.ranked.len(),
                    "submission succeeded"
                );
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.phase = SubmissionPhase::Failed;
                    s.last_error = Some(e.clone());
                    s.result = None;
                });
                warn!(error = %e, "submission failed");
            }
        }
        outcome
    }

    /// Check-and-set the in-flight guard. Returns `false`, leaving the state
    /// untouched, when a submission is already running.
    fn begin(&self) -> bool {
        self.state.send_if_modified(|s| {
            if s.is_in_flight() {
                return false;
            }
            info!(from = ?s.phase, "submission started");
            *s = SubmissionState {
                phase: SubmissionPhase::Validating,
                last_error: None,
                result: None,
            };
            true
        })
    }

    async fn run(
        &self,
        record: &ParameterRecord,
        set: &ParameterSet,
    ) -> Result<PredictionResult, SubmissionError> {
        let report = evaluate(record, set);
        if !is_submittable(&report) {
            return Err(SubmissionError::IncompleteData {
                critical_missing: report.critical_missing,
            });
        }

        let payload = to_request_body(record, set);
        info!(
            completeness = report.completeness_percentage,
            provided = report.provided_count,
            "validating record with service"
        );
        let validation = self
            .service
            .validate(&payload)
            .await
            .map_err(validation_transport_error)?;
        check_validation(validation)?;

        self.state.send_modify(|s| s.phase = SubmissionPhase::Predicting);
        info!("record accepted, requesting prediction");

        let response = self
            .service
            .predict(&payload)
            .await
            .map_err(|e| SubmissionError::PredictionServiceError {
                cause: e.to_string(),
            })?;
        prediction_from_response(response)
    }
}

/// A validate call that came back with the service's own error message is a
/// rejection; anything else never reached a verdict.
fn validation_transport_error(e: ClientError) -> SubmissionError {
    match e.service_message() {
        Some(message) => SubmissionError::ServerValidationRejected {
            details: message.to_string(),
        },
        None => SubmissionError::ValidationUnavailable {
            cause: e.to_string(),
        },
    }
}

fn check_validation(response: ValidateResponse) -> Result<(), SubmissionError> {
    let outcome = response.validation.unwrap_or_default();
    if response.success && outcome.success {
        return Ok(());
    }

    let missing = outcome
        .data_quality
        .map(|q| q.critical_missing)
        .filter(|missing| !missing.is_empty())
        .map(|missing| format!("critical parameters missing: {}", missing.join(", ")));

    let details = outcome
        .error
        .or(response.error)
        .or(missing)
        .unwrap_or_else(|| VALIDATION_FALLBACK.to_string());
    Err(SubmissionError::ServerValidationRejected { details })
}

fn prediction_from_response(response: PredictResponse) -> Result<PredictionResult, SubmissionError> {
    if !response.success {
        return Err(SubmissionError::PredictionServiceError {
            cause: response
                .error
                .unwrap_or_else(|| PREDICTION_FALLBACK.to_string()),
        });
    }
    if response.top_predictions.is_empty() {
        return Err(SubmissionError::EmptyResult);
    }

    let ranked: Vec<RankedDiagnosis> = response
        .top_predictions
        .into_iter()
        .map(|p| RankedDiagnosis {
            disease: p.disease,
            probability: p.probability,
        })
        .collect();

    let primary_diagnosis = match response.prediction.filter(|p| !p.is_empty()) {
        Some(primary) => primary,
        None => ranked
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
            .map(|r| r.disease.clone())
            .unwrap_or_default(),
    };

    Ok(PredictionResult {
        primary_diagnosis,
        ranked,
    })
}

/// Marks the submission cancelled if the future owning it is dropped before
/// reaching a terminal phase.
struct CancelGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
    armed: bool,
}

impl<'a> CancelGuard<'a> {
    fn new(state: &'a watch::Sender<SubmissionState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_modify(|s| {
            s.phase = SubmissionPhase::Failed;
            s.last_error = Some(SubmissionError::Cancelled);
            s.result = None;
        });
        warn!("submission dropped before completion");
    }
}
