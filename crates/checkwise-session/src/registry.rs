use tracing::{info, warn};

use checkwise_client::DiagnosisService;
use checkwise_panel::{ParameterRegistry, RegistryError};

/// Fetch parameter metadata and build the session registry.
pub async fn load_registry(
    service: &dyn DiagnosisService,
) -> Result<ParameterRegistry, RegistryError> {
    let metadata = service
        .parameters()
        .await
        .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
    ParameterRegistry::from_metadata(&metadata)
}

/// Like [`load_registry`], but never fails: any error falls back to the
/// degraded panel, which still accepts canonical-unit input.
pub async fn load_or_degraded(service: &dyn DiagnosisService) -> ParameterRegistry {
    match load_registry(service).await {
        Ok(registry) => {
            info!(
                parameters = registry.parameters().len(),
                critical = registry.critical_keys().len(),
                "parameter registry loaded"
            );
            registry
        }
        Err(e) => {
            warn!(error = %e, "parameter metadata unavailable, continuing in degraded mode");
            ParameterRegistry::degraded()
        }
    }
}
