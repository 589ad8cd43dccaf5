use std::future::Future;
use std::pin::Pin;

use checkwise_core::api::{
    DiseasesResponse, HealthResponse, ParameterPayload, ParametersResponse, PredictResponse,
    UploadResponse, ValidateResponse,
};

use crate::document::Document;
use crate::error::ClientError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The prediction service as seen by the intake engine.
///
/// Implementations only move bodies across the wire; a response with
/// `success: false` is still `Ok` here and is interpreted by the caller.
///
/// Methods return boxed futures for dyn compatibility.
pub trait DiagnosisService: Send + Sync {
    /// `GET parameters`: canonical ranges, critical keys, unit tables.
    fn parameters(&self) -> BoxFuture<'_, Result<ParametersResponse, ClientError>>;

    /// `POST validate`: authoritative server-side validation of a record.
    fn validate<'a>(
        &'a self,
        payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<ValidateResponse, ClientError>>;

    /// `POST predict`: ranked differential for a record.
    fn predict<'a>(
        &'a self,
        payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<PredictResponse, ClientError>>;

    /// `POST upload`: extract parameter values from a report.
    fn upload<'a>(
        &'a self,
        document: &'a Document,
    ) -> BoxFuture<'a, Result<UploadResponse, ClientError>>;

    /// `GET health`.
    fn health(&self) -> BoxFuture<'_, Result<HealthResponse, ClientError>>;

    /// `GET diseases`: labels the model can predict.
    fn diseases(&self) -> BoxFuture<'_, Result<DiseasesResponse, ClientError>>;
}
