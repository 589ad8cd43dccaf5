use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use checkwise_core::api::{
    DiseasesResponse, ErrorBody, HealthResponse, ParameterPayload, ParametersResponse,
    PredictResponse, UploadResponse, ValidateResponse,
};

use crate::document::Document;
use crate::error::ClientError;
use crate::service::{BoxFuture, DiagnosisService};

/// HTTP client for the prediction service's `/api/*` endpoints.
pub struct HttpDiagnosisService {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpDiagnosisService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Service running locally on the default development port.
    pub fn default_local() -> Result<Self, ClientError> {
        Self::new("http://localhost:5000", 30)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_connect() {
            ClientError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::Request(e.to_string())
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ClientError> {
        debug!(endpoint, "GET");
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        read_json(endpoint, response).await
    }

    async fn post_json<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(endpoint, "POST");
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        read_json(endpoint, response).await
    }

    async fn post_document(&self, document: &Document) -> Result<UploadResponse, ClientError> {
        info!(
            file_name = %document.file_name,
            kind = ?document.kind,
            size = document.bytes.len(),
            "uploading document for extraction"
        );

        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(document.mime_type)
            .map_err(|e| ClientError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        read_json("upload", response).await
    }
}

/// Decode a response body, turning non-2xx statuses into errors that keep the
/// service's own message when it sent one.
async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Request(e.to_string()))?;

    if !status.is_success() {
        debug!(endpoint, status = status.as_u16(), "service returned error status");
        return Err(match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => ClientError::Service {
                status: status.as_u16(),
                message: parsed.error,
            },
            Err(_) => ClientError::Http {
                status: status.as_u16(),
                body,
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::ResponseParse(format!("{endpoint}: {e}")))
}

impl DiagnosisService for HttpDiagnosisService {
    fn parameters(&self) -> BoxFuture<'_, Result<ParametersResponse, ClientError>> {
        Box::pin(self.get_json("parameters"))
    }

    fn validate<'a>(
        &'a self,
        payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<ValidateResponse, ClientError>> {
        Box::pin(self.post_json("validate", payload))
    }

    fn predict<'a>(
        &'a self,
        payload: &'a ParameterPayload,
    ) -> BoxFuture<'a, Result<PredictResponse, ClientError>> {
        Box::pin(self.post_json("predict", payload))
    }

    fn upload<'a>(
        &'a self,
        document: &'a Document,
    ) -> BoxFuture<'a, Result<UploadResponse, ClientError>> {
        Box::pin(self.post_document(document))
    }

    fn health(&self) -> BoxFuture<'_, Result<HealthResponse, ClientError>> {
        Box::pin(self.get_json("health"))
    }

    fn diseases(&self) -> BoxFuture<'_, Result<DiseasesResponse, ClientError>> {
        Box::pin(self.get_json("diseases"))
    }
}
