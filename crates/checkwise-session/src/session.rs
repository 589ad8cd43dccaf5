use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use checkwise_client::{DiagnosisService, Document};
use checkwise_core::models::{CellValue, DataQualityReport, DisplayModel, ParameterRecord};
use checkwise_panel::merge::from_canonical_values;
use checkwise_panel::{Extraction, ParameterRegistry, RegistryError, evaluate, merge};

use crate::error::{SessionError, SubmissionError};
use crate::pipeline::{SubmissionPipeline, SubmissionState};
use crate::registry::load_or_degraded;
use crate::results::aggregate;

/// The record and the report computed from it, always published together.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct RecordSnapshot {
    pub record: ParameterRecord,
    pub report: DataQualityReport,
}

impl RecordSnapshot {
    fn evaluated(record: ParameterRecord, registry: &ParameterRegistry) -> Self {
        let report = evaluate(&record, registry.parameters());
        Self { record, report }
    }
}

/// One user's intake session.
///
/// Owns the parameter record and republishes it with a fresh report after
/// every edit. All methods take `&self`, so edits keep working while a
/// submission is outstanding; a submission works on a snapshot and never
/// writes back to the record.
pub struct Session {
    id: Uuid,
    registry: ParameterRegistry,
    record: watch::Sender<RecordSnapshot>,
    pipeline: SubmissionPipeline,
    service: Arc<dyn DiagnosisService>,
}

impl Session {
    /// Load the registry from the service, degrading if that fails, and
    /// start with every key `Unset`.
    pub async fn start(service: Arc<dyn DiagnosisService>) -> Self {
        let registry = load_or_degraded(service.as_ref()).await;
        Self::with_registry(service, registry)
    }

    pub fn with_registry(service: Arc<dyn DiagnosisService>, registry: ParameterRegistry) -> Self {
        let id = Uuid::new_v4();
        let initial = RecordSnapshot::evaluated(
            ParameterRecord::unset(registry.parameters()),
            &registry,
        );
        let (record, _) = watch::channel(initial);
        info!(
            session_id = %id,
            source = ?registry.source(),
            parameters = registry.parameters().len(),
            "session started"
        );

        Self {
            id,
            registry,
            record,
            pipeline: SubmissionPipeline::new(Arc::clone(&service)),
            service,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn is_degraded(&self) -> bool {
        self.registry.is_degraded()
    }

    /// Record and report updates.
    pub fn subscribe(&self) -> watch::Receiver<RecordSnapshot> {
        self.record.subscribe()
    }

    /// Submission phase updates.
    pub fn submission(&self) -> watch::Receiver<SubmissionState> {
        self.pipeline.subscribe()
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        self.record.borrow().clone()
    }

    pub fn report(&self) -> DataQualityReport {
        self.record.borrow().report.clone()
    }

    /// Set a value in the unit it was entered in. The unit is checked when
    /// the report is computed, not here.
    pub fn set_value(&self, key: &str, value: f64, unit: &str) -> Result<(), RegistryError> {
        self.set_cell(key, CellValue::numeric(value, unit))
    }

    pub fn set_canonical(&self, key: &str, value: f64) -> Result<(), RegistryError> {
        let unit = self.registry.definition(key)?.canonical_unit.clone();
        self.set_cell(key, CellValue::numeric(value, unit))
    }

    pub fn clear_value(&self, key: &str) -> Result<(), RegistryError> {
        self.set_cell(key, CellValue::Unset)
    }

    /// Clear the whole form.
    pub fn reset(&self) {
        let record = ParameterRecord::unset(self.registry.parameters());
        self.record
            .send_replace(RecordSnapshot::evaluated(record, &self.registry));
        debug!(session_id = %self.id, "record reset");
    }

    fn set_cell(&self, key: &str, cell: CellValue) -> Result<(), RegistryError> {
        self.registry.definition(key)?;
        let set = self.registry.parameters();
        self.record.send_modify(|snapshot| {
            snapshot.record.set(key, cell);
            snapshot.report = evaluate(&snapshot.record, set);
        });
        debug!(session_id = %self.id, key, "record updated");
        Ok(())
    }

    /// Replace the record with an extraction result. Returns the new report.
    pub fn apply_extraction(&self, extracted: &Extraction) -> DataQualityReport {
        let set = self.registry.parameters();
        self.record.send_modify(|snapshot| {
            snapshot.record = merge(&snapshot.record, extracted, set);
            snapshot.report = evaluate(&snapshot.record, set);
        });
        self.report()
    }

    /// Read a report from disk and send it for extraction.
    pub async fn upload(&self, path: &Path) -> Result<DataQualityReport, SessionError> {
        let document = Document::from_path(path).await?;
        self.upload_document(&document).await
    }

    pub async fn upload_document(
        &self,
        document: &Document,
    ) -> Result<DataQualityReport, SessionError> {
        let response = self.service.upload(document).await?;
        if !response.success {
            return Err(SessionError::ExtractionFailed(response.error.unwrap_or_else(
                || "no parameters could be extracted".to_string(),
            )));
        }

        info!(
            session_id = %self.id,
            file_name = %document.file_name,
            extracted = response.extracted_data.len(),
            "document extracted"
        );
        Ok(self.apply_extraction(&from_canonical_values(&response.extracted_data)))
    }

    /// Submit the current record and shape the result for display.
    pub async fn submit(&self) -> Result<DisplayModel, SubmissionError> {
        let record = self.record.borrow().record.clone();
        let result = self
            .pipeline
            .submit(&record, self.registry.parameters())
            .await?;
        aggregate(&result)
    }
}
