use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Derived per-field status. Never stored; recomputed from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldStatus {
    Empty,
    Normal,
    OutOfRange,
}

/// Completeness and plausibility summary of a record against a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DataQualityReport {
    /// Share of critical keys with a usable value, rounded to a whole percent.
    pub completeness_percentage: u8,
    /// Critical keys with status `Empty`, in registry order.
    pub critical_missing: Vec<String>,
    pub field_statuses: BTreeMap<String, FieldStatus>,
    /// Keys with status `OutOfRange`, in registry order.
    pub out_of_range: Vec<String>,
    /// Keys whose value falls outside the plausibility bounds, in registry
    /// order. These are the data-validation warnings reliability is graded on.
    #[serde(default)]
    pub implausible: Vec<String>,
    pub provided_count: usize,
    pub total_count: usize,
    /// Why a numeric cell was downgraded to `Empty` (e.g. unknown unit).
    pub diagnostics: BTreeMap<String, String>,
}

impl DataQualityReport {
    pub fn status(&self, key: &str) -> Option<FieldStatus> {
        self.field_statuses.get(key).copied()
    }

    /// Share of all keys (critical or not) with a usable value, 0–100.
    pub fn overall_completeness(&self) -> f64 {
        if self.total_count == 0 {
            return 100.0;
        }
        self.provided_count as f64 / self.total_count as f64 * 100.0
    }
}
