//! Built-in CBC reference panel.
//!
//! The 22 model features in the order the prediction service expects them,
//! their canonical units, the reference intervals the metadata service
//! publishes, the plausibility bounds the prediction service warns on, and
//! the unit conversion factors. The metadata service only
//! names alternative units; the factors always come from here.

use checkwise_core::models::{
    CellValue, NormalRange, ParameterDefinition, ParameterRecord, ParameterSet, UnitAlternative,
};

const COUNT: &str = "10³/μL";
const PERCENT: &str = "%";

const COUNT_ALTERNATIVES: &[(&str, f64)] = &[("K/μL", 1.0), ("cells/μL", 0.001), ("10⁹/L", 1.0)];
const FRACTION_ALTERNATIVES: &[(&str, f64)] = &[("fraction", 100.0)];
const CONCENTRATION_ALTERNATIVES: &[(&str, f64)] = &[("g/L", 0.1), ("mmol/L", 1.61)];
const VOLUME_ALTERNATIVES: &[(&str, f64)] = &[("μm³", 1.0)];

struct ReferenceParameter {
    key: &'static str,
    label: &'static str,
    canonical_unit: &'static str,
    range: (f64, f64),
    plausible: (f64, f64),
    critical: bool,
    alternatives: &'static [(&'static str, f64)],
}

#[rustfmt::skip]
const REFERENCE_PANEL: &[ReferenceParameter] = &[
    ReferenceParameter { key: "WBC", label: "White Blood Cell Count", canonical_unit: COUNT, range: (4.0, 11.0), plausible: (0.1, 200.0), critical: true, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "LY%", label: "Lymphocyte Percentage", canonical_unit: PERCENT, range: (20.0, 40.0), plausible: (0.0, 100.0), critical: false, alternatives: FRACTION_ALTERNATIVES },
    ReferenceParameter { key: "MO%", label: "Monocyte Percentage", canonical_unit: PERCENT, range: (2.0, 8.0), plausible: (0.0, 100.0), critical: false, alternatives: FRACTION_ALTERNATIVES },
    ReferenceParameter { key: "NE%", label: "Neutrophil Percentage", canonical_unit: PERCENT, range: (50.0, 70.0), plausible: (0.0, 100.0), critical: false, alternatives: FRACTION_ALTERNATIVES },
    ReferenceParameter { key: "EO%", label: "Eosinophil Percentage", canonical_unit: PERCENT, range: (1.0, 4.0), plausible: (0.0, 100.0), critical: false, alternatives: FRACTION_ALTERNATIVES },
    ReferenceParameter { key: "BA%", label: "Basophil Percentage", canonical_unit: PERCENT, range: (0.0, 1.0), plausible: (0.0, 100.0), critical: false, alternatives: FRACTION_ALTERNATIVES },
    ReferenceParameter { key: "LY#", label: "Lymphocyte Absolute Count", canonical_unit: COUNT, range: (1.2, 3.4), plausible: (0.0, 50.0), critical: false, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "MO#", label: "Monocyte Absolute Count", canonical_unit: COUNT, range: (0.1, 0.9), plausible: (0.0, 20.0), critical: false, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "NE#", label: "Neutrophil Absolute Count", canonical_unit: COUNT, range: (1.8, 7.7), plausible: (0.0, 100.0), critical: false, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "EO#", label: "Eosinophil Absolute Count", canonical_unit: COUNT, range: (0.05, 0.5), plausible: (0.0, 20.0), critical: false, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "BA#", label: "Basophil Absolute Count", canonical_unit: COUNT, range: (0.0, 0.2), plausible: (0.0, 10.0), critical: false, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "RBC", label: "Red Blood Cell Count", canonical_unit: "10⁶/μL", range: (3.8, 5.2), plausible: (0.5, 15.0), critical: true, alternatives: &[("M/μL", 1.0), ("cells/μL", 0.000_001), ("10¹²/L", 1.0)] },
    ReferenceParameter { key: "HGB", label: "Hemoglobin", canonical_unit: "g/dL", range: (12.0, 15.5), plausible: (1.0, 30.0), critical: true, alternatives: CONCENTRATION_ALTERNATIVES },
    ReferenceParameter { key: "HCT", label: "Hematocrit", canonical_unit: PERCENT, range: (36.0, 44.0), plausible: (5.0, 80.0), critical: true, alternatives: &[("L/L", 100.0), ("fraction", 100.0)] },
    ReferenceParameter { key: "MCV", label: "Mean Corpuscular Volume", canonical_unit: "fL", range: (80.0, 100.0), plausible: (30.0, 200.0), critical: false, alternatives: VOLUME_ALTERNATIVES },
    ReferenceParameter { key: "MCHC", label: "Mean Corpuscular Hemoglobin Concentration", canonical_unit: "g/dL", range: (32.0, 36.0), plausible: (15.0, 50.0), critical: false, alternatives: CONCENTRATION_ALTERNATIVES },
    ReferenceParameter { key: "MCH", label: "Mean Corpuscular Hemoglobin", canonical_unit: "pg", range: (27.0, 33.0), plausible: (10.0, 60.0), critical: false, alternatives: &[("fmol", 16.11)] },
    ReferenceParameter { key: "RDW", label: "Red Cell Distribution Width", canonical_unit: PERCENT, range: (11.5, 14.5), plausible: (5.0, 40.0), critical: false, alternatives: &[("CV%", 1.0)] },
    ReferenceParameter { key: "PLT", label: "Platelet Count", canonical_unit: COUNT, range: (150.0, 450.0), plausible: (1.0, 3000.0), critical: true, alternatives: COUNT_ALTERNATIVES },
    ReferenceParameter { key: "MPV", label: "Mean Platelet Volume", canonical_unit: "fL", range: (7.5, 11.5), plausible: (1.0, 30.0), critical: false, alternatives: VOLUME_ALTERNATIVES },
    ReferenceParameter { key: "Age", label: "Patient Age", canonical_unit: "years", range: (0.0, 120.0), plausible: (0.0, 120.0), critical: true, alternatives: &[("months", 1.0 / 12.0), ("days", 1.0 / 365.25)] },
    ReferenceParameter { key: "Gender", label: "Patient Gender (0=Female, 1=Male)", canonical_unit: "", range: (0.0, 1.0), plausible: (0.0, 1.0), critical: true, alternatives: &[] },
];

/// Values prefilled in a fresh manual-entry form, all in canonical units.
#[rustfmt::skip]
const SAMPLE_VALUES: &[(&str, f64)] = &[
    ("WBC", 7.5), ("LY%", 30.0), ("MO%", 7.0), ("NE%", 60.0), ("EO%", 2.0), ("BA%", 1.0),
    ("LY#", 2.2), ("MO#", 0.5), ("NE#", 4.5), ("EO#", 0.15), ("BA#", 0.07),
    ("RBC", 4.8), ("HGB", 14.0), ("HCT", 42.0), ("MCV", 88.0), ("MCHC", 33.0), ("MCH", 29.0),
    ("RDW", 13.0), ("PLT", 250.0), ("MPV", 10.0), ("Age", 35.0), ("Gender", 1.0),
];

fn lookup(key: &str) -> Option<&'static ReferenceParameter> {
    REFERENCE_PANEL.iter().find(|p| p.key == key)
}

/// Reference feature keys, in model order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    REFERENCE_PANEL.iter().map(|p| p.key)
}

pub fn is_reference_key(key: &str) -> bool {
    lookup(key).is_some()
}

pub fn canonical_unit(key: &str) -> Option<&'static str> {
    lookup(key).map(|p| p.canonical_unit)
}

pub fn label(key: &str) -> Option<&'static str> {
    lookup(key).map(|p| p.label)
}

/// Plausibility bounds for `key` in its reference canonical unit.
pub fn plausible_bounds(key: &str) -> Option<(f64, f64)> {
    lookup(key).map(|p| p.plausible)
}

fn plausible_range(p: &ReferenceParameter) -> Option<NormalRange> {
    Some(NormalRange {
        min: p.plausible.0,
        max: p.plausible.1,
        unit: p.canonical_unit.to_string(),
    })
}

/// Conversion factor from `unit` to the reference canonical unit of `key`.
pub fn known_factor(key: &str, unit: &str) -> Option<f64> {
    let param = lookup(key)?;
    if unit == param.canonical_unit {
        return Some(1.0);
    }
    param
        .alternatives
        .iter()
        .find(|(u, _)| *u == unit)
        .map(|(_, f)| *f)
}

/// The full reference panel: ranges, critical flags and every alternative unit.
///
/// # Panics
///
/// Panics if the built-in table violates the parameter-set invariants. The
/// table is a compile-time constant, so a panic indicates a bug in it.
pub fn reference_panel() -> ParameterSet {
    let definitions = REFERENCE_PANEL
        .iter()
        .map(|p| ParameterDefinition {
            key: p.key.to_string(),
            label: Some(p.label.to_string()),
            is_critical: p.critical,
            canonical_unit: p.canonical_unit.to_string(),
            alternative_units: p
                .alternatives
                .iter()
                .map(|(unit, factor)| UnitAlternative {
                    unit: unit.to_string(),
                    factor_to_canonical: *factor,
                })
                .collect(),
            normal_range: Some(NormalRange {
                min: p.range.0,
                max: p.range.1,
                unit: p.canonical_unit.to_string(),
            }),
            plausible_range: plausible_range(p),
        })
        .collect();

    ParameterSet::new(definitions)
        .unwrap_or_else(|e| panic!("built-in reference panel is invalid: {e}"))
}

/// The registry-less fallback: every reference key with its canonical unit
/// and plausibility bounds, but no alternative units, no normal ranges and no
/// critical flags.
///
/// # Panics
///
/// See [`reference_panel`].
pub fn degraded_panel() -> ParameterSet {
    let definitions = REFERENCE_PANEL
        .iter()
        .map(|p| ParameterDefinition {
            key: p.key.to_string(),
            label: Some(p.label.to_string()),
            is_critical: false,
            canonical_unit: p.canonical_unit.to_string(),
            alternative_units: vec![],
            normal_range: None,
            plausible_range: plausible_range(p),
        })
        .collect();

    ParameterSet::new(definitions)
        .unwrap_or_else(|e| panic!("built-in degraded panel is invalid: {e}"))
}

/// A record holding the default manual-entry values for every reference key.
pub fn sample_record() -> ParameterRecord {
    SAMPLE_VALUES
        .iter()
        .map(|(key, value)| {
            let unit = canonical_unit(key).unwrap_or_default();
            (key.to_string(), CellValue::numeric(*value, unit))
        })
        .collect()
}
