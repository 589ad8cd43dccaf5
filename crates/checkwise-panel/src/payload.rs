use tracing::debug;

use checkwise_core::api::ParameterPayload;
use checkwise_core::models::{ParameterRecord, ParameterSet};

use crate::units::cell_to_canonical;

/// Build the `validate`/`predict` request body for a record.
///
/// Every registry key is present. Values are sent in canonical units; empty
/// cells and cells that cannot be converted are sent as `null`, never as zero.
/// Keys in the record that the registry does not know are not sent.
pub fn to_request_body(record: &ParameterRecord, set: &ParameterSet) -> ParameterPayload {
    set.keys()
        .map(|key| {
            let value = cell_to_canonical(set, key, record.get(key)).unwrap_or_else(|e| {
                debug!(key, error = %e, "unconvertible value sent as null");
                None
            });
            (key.to_string(), value)
        })
        .collect()
}
