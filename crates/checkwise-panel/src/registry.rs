use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use checkwise_core::api::ParametersResponse;
use checkwise_core::models::{NormalRange, ParameterDefinition, ParameterSet, UnitAlternative};

use crate::error::RegistryError;
use crate::reference;

/// Where the active parameter schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RegistrySource {
    /// Fetched from the metadata service.
    Service,
    /// The built-in reference panel.
    Builtin,
    /// Metadata service unreachable: keys and canonical units only.
    Degraded,
}

/// The parameter schema for one session.
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    set: ParameterSet,
    source: RegistrySource,
}

impl ParameterRegistry {
    pub fn new(set: ParameterSet, source: RegistrySource) -> Self {
        Self { set, source }
    }

    pub fn reference() -> Self {
        Self::new(reference::reference_panel(), RegistrySource::Builtin)
    }

    pub fn degraded() -> Self {
        Self::new(reference::degraded_panel(), RegistrySource::Degraded)
    }

    /// Build a registry from a `GET parameters` payload.
    ///
    /// Key order follows the payload's `required` list when present, with any
    /// key named only in `critical`, `normal_ranges` or `units` appended after
    /// it. Without a `required` list the reference feature order is used,
    /// followed by any extra keys the payload names.
    /// Alternative units are kept only when a conversion factor is known for
    /// them; the rest are dropped so they can never be converted.
    pub fn from_metadata(metadata: &ParametersResponse) -> Result<Self, RegistryError> {
        let keys = metadata_key_order(metadata);
        if keys.is_empty() {
            return Err(RegistryError::EmptyMetadata);
        }

        let definitions = keys
            .iter()
            .map(|key| definition_from_metadata(key, metadata))
            .collect();

        let set = ParameterSet::new(definitions)?;
        debug!(
            parameters = set.len(),
            critical = set.critical_keys().count(),
            "parameter registry built from metadata"
        );
        Ok(Self::new(set, RegistrySource::Service))
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.set
    }

    pub fn source(&self) -> RegistrySource {
        self.source
    }

    pub fn is_degraded(&self) -> bool {
        self.source == RegistrySource::Degraded
    }

    /// Critical keys, in registry order.
    pub fn critical_keys(&self) -> Vec<&str> {
        self.set.critical_keys().collect()
    }

    pub fn definition(&self, key: &str) -> Result<&ParameterDefinition, RegistryError> {
        self.set
            .get(key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }
}

fn metadata_key_order(metadata: &ParametersResponse) -> Vec<String> {
    let named: BTreeSet<&str> = metadata
        .critical
        .iter()
        .map(String::as_str)
        .chain(metadata.normal_ranges.keys().map(String::as_str))
        .chain(metadata.units.keys().map(String::as_str))
        .collect();

    if !metadata.required.is_empty() {
        let mut seen = BTreeSet::new();
        let mut keys: Vec<String> = metadata
            .required
            .iter()
            .filter(|k| seen.insert(k.as_str()))
            .cloned()
            .collect();
        for key in named.iter().filter(|k| !seen.contains(*k)) {
            warn!(key, "parameter described but not listed as required, appended");
            keys.push(key.to_string());
        }
        return keys;
    }

    let mut keys: Vec<String> = reference::keys()
        .filter(|k| named.contains(k))
        .map(str::to_string)
        .collect();
    keys.extend(
        named
            .iter()
            .filter(|k| !reference::is_reference_key(k))
            .map(|k| k.to_string()),
    );
    keys
}

fn definition_from_metadata(key: &str, metadata: &ParametersResponse) -> ParameterDefinition {
    let units = metadata.units.get(key);
    let wire_range = metadata.normal_ranges.get(key);

    let canonical_unit = units
        .map(|u| u.default.clone())
        .or_else(|| wire_range.and_then(|r| r.unit.clone()))
        .or_else(|| reference::canonical_unit(key).map(str::to_string))
        .unwrap_or_default();

    // Built-in factors are relative to the reference canonical unit; they only
    // apply when the service agrees on that unit.
    let factors_apply = reference::canonical_unit(key) == Some(canonical_unit.as_str());

    let alternative_units = units
        .map(|u| u.alternatives.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|unit| {
            let factor = factors_apply
                .then(|| reference::known_factor(key, unit))
                .flatten();
            if factor.is_none() {
                warn!(key, unit = %unit, "no conversion factor known, alternative unit ignored");
            }
            factor.map(|factor_to_canonical| UnitAlternative {
                unit: unit.clone(),
                factor_to_canonical,
            })
        })
        .collect();

    let normal_range = wire_range.and_then(|r| {
        let factor = match r.unit.as_deref() {
            None => Some(1.0),
            Some(u) if u == canonical_unit => Some(1.0),
            Some(u) => factors_apply.then(|| reference::known_factor(key, u)).flatten(),
        };
        match factor {
            Some(f) => Some(NormalRange {
                min: r.min * f,
                max: r.max * f,
                unit: canonical_unit.clone(),
            }),
            None => {
                warn!(key, unit = ?r.unit, "normal range unit not convertible, range ignored");
                None
            }
        }
    });

    let label = metadata
        .descriptions
        .get(key)
        .cloned()
        .or_else(|| wire_range.and_then(|r| r.note.clone()))
        .or_else(|| reference::label(key).map(str::to_string));

    let plausible_range = factors_apply
        .then(|| reference::plausible_bounds(key))
        .flatten()
        .map(|(min, max)| NormalRange {
            min,
            max,
            unit: canonical_unit.clone(),
        });

    ParameterDefinition {
        key: key.to_string(),
        label,
        is_critical: metadata.critical.iter().any(|c| c == key),
        canonical_unit,
        alternative_units,
        normal_range,
        plausible_range,
    }
}
