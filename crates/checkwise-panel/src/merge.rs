//! Merge policy for values extracted from an uploaded report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use checkwise_core::models::{CellValue, ParameterRecord, ParameterSet};

use crate::units::convert;

/// One value found by the extraction service. A missing unit means the value
/// is already in the canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractedValue {
    pub value: f64,
    pub unit: Option<String>,
}

impl ExtractedValue {
    pub fn canonical(value: f64) -> Self {
        Self { value, unit: None }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }
}

/// A partial mapping from parameter key to extracted value.
pub type Extraction = BTreeMap<String, ExtractedValue>;

/// Merge an extraction into the session record.
///
/// This is a total replacement: the result starts with every registry key
/// `NotExtracted`, then takes each extracted value converted to the canonical
/// unit. Values whose unit cannot be converted stay `NotExtracted`; keys the
/// registry does not know are ignored. Nothing from `current` survives, so
/// merging the same extraction twice yields the same record.
pub fn merge(
    current: &ParameterRecord,
    extracted: &Extraction,
    set: &ParameterSet,
) -> ParameterRecord {
    let mut merged = ParameterRecord::not_extracted(set);
    let mut accepted = 0usize;

    for (key, extracted_value) in extracted {
        let Some(definition) = set.get(key) else {
            debug!(key = %key, "extracted key not in registry, ignored");
            continue;
        };

        let unit = extracted_value
            .unit
            .as_deref()
            .unwrap_or(definition.canonical_unit.as_str());

        match convert(set, extracted_value.value, unit, key) {
            Ok(value) => {
                merged.set(
                    key.clone(),
                    CellValue::numeric(value, definition.canonical_unit.clone()),
                );
                accepted += 1;
            }
            Err(e) => debug!(key = %key, error = %e, "extracted value dropped"),
        }
    }

    info!(
        extracted = extracted.len(),
        accepted,
        replaced_values = current.numeric_count(),
        "extraction merged into record"
    );
    merged
}

/// Lift a plain `key → number` extraction (canonical units) into an
/// [`Extraction`].
pub fn from_canonical_values(values: &BTreeMap<String, f64>) -> Extraction {
    values
        .iter()
        .map(|(k, v)| (k.clone(), ExtractedValue::canonical(*v)))
        .collect()
}
