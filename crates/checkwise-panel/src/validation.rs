//! Field-level and aggregate data-quality evaluation.

use std::collections::BTreeMap;

use tracing::trace;

use checkwise_core::models::{
    CellValue, DataQualityReport, FieldStatus, ParameterDefinition, ParameterRecord, ParameterSet,
};

use crate::error::ConversionError;
use crate::units::cell_to_canonical;

/// Status of one cell against its definition.
///
/// `Unset` and `NotExtracted` are `Empty`. A numeric cell is converted to the
/// canonical unit and compared against the normal range; without a range any
/// number is `Normal`.
pub fn field_status(
    set: &ParameterSet,
    definition: &ParameterDefinition,
    cell: &CellValue,
) -> Result<FieldStatus, ConversionError> {
    let value = cell_to_canonical(set, &definition.key, cell)?;
    Ok(status_of(definition, value))
}

fn status_of(definition: &ParameterDefinition, value: Option<f64>) -> FieldStatus {
    match (value, &definition.normal_range) {
        (None, _) => FieldStatus::Empty,
        (Some(v), Some(range)) if !range.contains(v) => FieldStatus::OutOfRange,
        (Some(_), _) => FieldStatus::Normal,
    }
}

fn is_implausible(definition: &ParameterDefinition, value: Option<f64>) -> bool {
    match (value, &definition.plausible_range) {
        (Some(v), Some(bounds)) => !bounds.contains(v),
        _ => false,
    }
}

/// Evaluate a record against the registry.
///
/// Conversion failures never abort evaluation: the cell counts as `Empty` and
/// the error message is kept in `diagnostics`. Values outside a definition's
/// plausibility bounds are listed in `implausible` on top of their status.
pub fn evaluate(record: &ParameterRecord, set: &ParameterSet) -> DataQualityReport {
    let mut field_statuses = BTreeMap::new();
    let mut diagnostics = BTreeMap::new();
    let mut critical_missing = Vec::new();
    let mut out_of_range = Vec::new();
    let mut implausible = Vec::new();
    let mut critical_total = 0usize;
    let mut provided_count = 0usize;

    for definition in set.definitions() {
        let key = definition.key.as_str();
        let value = match cell_to_canonical(set, key, record.get(key)) {
            Ok(value) => value,
            Err(e) => {
                trace!(key, error = %e, "cell downgraded to empty");
                diagnostics.insert(key.to_string(), e.to_string());
                None
            }
        };
        let status = status_of(definition, value);
        if is_implausible(definition, value) {
            trace!(key, value, "value outside plausibility bounds");
            implausible.push(key.to_string());
        }

        match status {
            FieldStatus::Empty => {
                if definition.is_critical {
                    critical_missing.push(key.to_string());
                }
            }
            FieldStatus::OutOfRange => {
                out_of_range.push(key.to_string());
                provided_count += 1;
            }
            FieldStatus::Normal => provided_count += 1,
        }
        if definition.is_critical {
            critical_total += 1;
        }
        field_statuses.insert(key.to_string(), status);
    }

    DataQualityReport {
        completeness_percentage: completeness(critical_total, critical_missing.len()),
        critical_missing,
        field_statuses,
        out_of_range,
        implausible,
        provided_count,
        total_count: set.len(),
        diagnostics,
    }
}

/// Percentage of critical keys present, rounded to the nearest whole percent.
/// With no critical keys the record is complete by definition.
fn completeness(critical_total: usize, critical_missing: usize) -> u8 {
    if critical_total == 0 {
        return 100;
    }
    let present = critical_total - critical_missing;
    (present as f64 / critical_total as f64 * 100.0).round() as u8
}

/// The sole gate for a predict call: no critical key may be empty.
/// Out-of-range values only warn.
pub fn is_submittable(report: &DataQualityReport) -> bool {
    report.critical_missing.is_empty()
}
