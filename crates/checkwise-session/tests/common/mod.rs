#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use checkwise_client::{BoxFuture, ClientError, DiagnosisService, Document};
use checkwise_core::api::{
    DiseasesResponse, HealthResponse, ParameterPayload, ParametersResponse, PredictResponse,
    ServerDataQuality, UploadResponse, ValidateResponse, ValidationOutcome, WirePrediction,
};

/// What the scripted service answers for one endpoint.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Non-2xx with an `error` body.
    ServiceError(u16, String),
    Unreachable,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, ClientError> {
        match self {
            Reply::Ok(body) => Ok(body.clone()),
            Reply::ServiceError(status, message) => Err(ClientError::Service {
                status: *status,
                message: message.clone(),
            }),
            Reply::Unreachable => Err(ClientError::Connection("http://127.0.0.1:9".to_string())),
        }
    }
}

/// In-memory prediction service with fixed replies and call counters.
pub struct ScriptedService {
    pub parameters: Reply<ParametersResponse>,
    pub validate: Reply<ValidateResponse>,
    pub predict: Reply<PredictResponse>,
    pub upload: Reply<UploadResponse>,
    /// When set, `predict` waits for a notification before answering.
    pub predict_gate: Option<Arc<Notify>>,
    pub parameters_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub last_payload: std::sync::Mutex<Option<ParameterPayload>>,
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self {
            parameters: Reply::Unreachable,
            validate: Reply::Ok(accepted()),
            predict: Reply::Ok(anemia_prediction()),
            upload: Reply::Ok(UploadResponse::default()),
            predict_gate: None,
            parameters_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            last_payload: std::sync::Mutex::new(None),
        }
    }
}

impl ScriptedService {
    pub fn validate_count(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn predict_count(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn upload_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

impl DiagnosisService for ScriptedService {
    fn parameters(&self) -> BoxFuture<'_, Result<ParametersResponse, ClientError>> {
        Box::pin(async move {
            self.parameters_calls.fetch_add(1, Ordering::SeqCst);
            self.parameters.produce()
        })
    }

    fn validate<'a>(
        &'a self,
        payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<ValidateResponse, ClientError>> {
        Box::pin(async move {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            self.validate.produce()
        })
    }

    fn predict<'a>(
        &'a self,
        _payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<PredictResponse, ClientError>> {
        Box::pin(async move {
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.predict_gate {
                gate.notified().await;
            }
            self.predict.produce()
        })
    }

    fn upload<'a>(
        &'a self,
        _document: &'a Document,
    ) -> BoxFuture<'a, Result<UploadResponse, ClientError>> {
        Box::pin(async move {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            self.upload.produce()
        })
    }

    fn health(&self) -> BoxFuture<'_, Result<HealthResponse, ClientError>> {
        Box::pin(async move {
            Ok(HealthResponse {
                status: "healthy".to_string(),
                ..Default::default()
            })
        })
    }

    fn diseases(&self) -> BoxFuture<'_, Result<DiseasesResponse, ClientError>> {
        Box::pin(async move { Ok(DiseasesResponse::default()) })
    }
}

pub fn accepted() -> ValidateResponse {
    ValidateResponse {
        success: true,
        validation: Some(ValidationOutcome {
            success: true,
            data_quality: Some(ServerDataQuality {
                completeness_percentage: 100.0,
                ..Default::default()
            }),
            error: None,
        }),
        error: None,
    }
}

pub fn rejected(error: Option<&str>, critical_missing: &[&str]) -> ValidateResponse {
    ValidateResponse {
        success: true,
        validation: Some(ValidationOutcome {
            success: false,
            data_quality: Some(ServerDataQuality {
                completeness_percentage: 40.0,
                critical_missing: critical_missing.iter().map(|k| k.to_string()).collect(),
                warnings: Vec::new(),
            }),
            error: error.map(str::to_string),
        }),
        error: None,
    }
}

/// Predict response listed in the wrong order on purpose.
pub fn anemia_prediction() -> PredictResponse {
    PredictResponse {
        success: true,
        prediction: Some("Anemia".to_string()),
        top_predictions: vec![
            WirePrediction {
                disease: "Leukemia".to_string(),
                probability: 0.6,
            },
            WirePrediction {
                disease: "Anemia".to_string(),
                probability: 0.9,
            },
        ],
        error: None,
    }
}

/// `GET parameters` payload matching the reference panel's critical keys.
pub fn reference_metadata() -> ParametersResponse {
    serde_json::from_str(
        r#"{
            "critical": ["WBC", "RBC", "HGB", "HCT", "PLT", "Age", "Gender"],
            "normal_ranges": {
                "WBC": { "min": 4.0, "max": 11.0, "unit": "10³/μL" },
                "RBC": { "min": 3.8, "max": 5.2, "unit": "10⁶/μL" },
                "HGB": { "min": 12.0, "max": 15.5, "unit": "g/dL" },
                "HCT": { "min": 36.0, "max": 44.0, "unit": "%" },
                "PLT": { "min": 150, "max": 450, "unit": "10³/μL" },
                "MCV": { "min": 80, "max": 100, "unit": "fL" },
                "Age": { "min": 0, "max": 120, "unit": "years" },
                "Gender": { "min": 0, "max": 1 }
            },
            "units": {
                "WBC": { "default": "10³/μL", "alternatives": ["K/μL", "cells/μL", "10⁹/L"] },
                "HGB": { "default": "g/dL", "alternatives": ["g/L", "mmol/L"] },
                "PLT": { "default": "10³/μL", "alternatives": ["K/μL", "cells/μL", "10⁹/L"] }
            }
        }"#,
    )
    .unwrap()
}

pub fn shared(service: ScriptedService) -> Arc<ScriptedService> {
    Arc::new(service)
}

pub fn values(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
