use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::parameter::ParameterSet;

/// The value held for one parameter key.
///
/// `Unset` and `NotExtracted` are both "no value", but they mean different
/// things to the person filling the form: the first was never asked for, the
/// second was looked for in an uploaded report and not found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CellValue {
    #[default]
    Unset,
    NotExtracted,
    Numeric { value: f64, unit: String },
}

impl CellValue {
    pub fn numeric(value: f64, unit: impl Into<String>) -> Self {
        Self::Numeric {
            value,
            unit: unit.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !matches!(self, Self::Numeric { .. })
    }

    pub fn as_numeric(&self) -> Option<(f64, &str)> {
        match self {
            Self::Numeric { value, unit } => Some((*value, unit.as_str())),
            _ => None,
        }
    }
}

static UNSET: CellValue = CellValue::Unset;

/// Current parameter values for one session, keyed by parameter key.
///
/// A key with no entry reads as [`CellValue::Unset`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParameterRecord {
    cells: BTreeMap<String, CellValue>,
}

impl ParameterRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record with every registry key explicitly `Unset`.
    pub fn unset(set: &ParameterSet) -> Self {
        Self::filled(set, CellValue::Unset)
    }

    /// A record with every registry key explicitly `NotExtracted`.
    pub fn not_extracted(set: &ParameterSet) -> Self {
        Self::filled(set, CellValue::NotExtracted)
    }

    fn filled(set: &ParameterSet, cell: CellValue) -> Self {
        Self {
            cells: set.keys().map(|k| (k.to_string(), cell.clone())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&UNSET)
    }

    /// Replace the value for one key, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, cell: CellValue) -> CellValue {
        self.cells.insert(key.into(), cell).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys holding a numeric value.
    pub fn numeric_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }
}

impl FromIterator<(String, CellValue)> for ParameterRecord {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
