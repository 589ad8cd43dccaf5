use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A non-canonical unit a value may be entered in, with the multiplier that
/// brings it into the parameter's canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UnitAlternative {
    pub unit: String,
    pub factor_to_canonical: f64,
}

/// Inclusive reference interval, expressed in the canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

impl NormalRange {
    pub fn contains(&self, value: f64) -> bool {
        !(value < self.min || value > self.max)
    }
}

/// Schema entry for one recognized CBC parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParameterDefinition {
    /// Unique key as used on the wire, e.g. `"WBC"` or `"LY%"`.
    pub key: String,
    pub label: Option<String>,
    pub is_critical: bool,
    /// Empty for unitless parameters (Gender).
    pub canonical_unit: String,
    pub alternative_units: Vec<UnitAlternative>,
    pub normal_range: Option<NormalRange>,
    /// Bounds outside which a value is almost certainly an entry or
    /// extraction error rather than a clinical finding.
    #[serde(default)]
    pub plausible_range: Option<NormalRange>,
}

impl ParameterDefinition {
    /// Factor for `unit`, or `None` if the unit is neither canonical nor a
    /// listed alternative.
    pub fn factor_for(&self, unit: &str) -> Option<f64> {
        if unit == self.canonical_unit {
            return Some(1.0);
        }
        self.alternative_units
            .iter()
            .find(|alt| alt.unit == unit)
            .map(|alt| alt.factor_to_canonical)
    }
}

/// The ordered, immutable collection of parameter definitions.
///
/// Keys are unique and every critical parameter has a normal range; both are
/// checked by [`ParameterSet::new`], the only constructor.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ParameterSet {
    definitions: Vec<ParameterDefinition>,
}

impl ParameterSet {
    pub fn new(definitions: Vec<ParameterDefinition>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(definitions.len());
        for def in &definitions {
            if !seen.insert(def.key.as_str()) {
                return Err(CoreError::DuplicateParameter(def.key.clone()));
            }
            if let Some(range) = def.plausible_range.as_ref().filter(|r| r.min > r.max) {
                return Err(CoreError::InvalidRange {
                    key: def.key.clone(),
                    min: range.min,
                    max: range.max,
                });
            }
            match &def.normal_range {
                Some(range) if range.min > range.max => {
                    return Err(CoreError::InvalidRange {
                        key: def.key.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }
                None if def.is_critical => {
                    return Err(CoreError::CriticalWithoutRange(def.key.clone()));
                }
                _ => {}
            }
        }
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn get(&self, key: &str) -> Option<&ParameterDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.key.as_str())
    }

    /// Critical keys in registry order.
    pub fn critical_keys(&self) -> impl Iterator<Item = &str> {
        self.definitions
            .iter()
            .filter(|d| d.is_critical)
            .map(|d| d.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
