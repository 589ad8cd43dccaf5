use checkwise_panel::ConversionError;
use checkwise_panel::convert;
use checkwise_panel::reference::{degraded_panel, reference_panel};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn canonical_unit_is_identity_for_every_key() {
    let set = reference_panel();
    for def in set.definitions() {
        for value in [0.0, 0.07, 7.5, 250.0, 1234.5678] {
            let converted = convert(&set, value, &def.canonical_unit, &def.key).unwrap();
            assert_eq!(converted, value, "{} not identity", def.key);
        }
    }
}

#[test]
fn alternative_units_apply_their_factor() {
    let set = reference_panel();

    assert_close(convert(&set, 140.0, "g/L", "HGB").unwrap(), 14.0);
    assert_close(convert(&set, 7500.0, "cells/μL", "WBC").unwrap(), 7.5);
    assert_close(convert(&set, 0.42, "L/L", "HCT").unwrap(), 42.0);
    assert_close(convert(&set, 250.0, "10⁹/L", "PLT").unwrap(), 250.0);
    assert_close(convert(&set, 24.0, "months", "Age").unwrap(), 2.0);
    assert_close(convert(&set, 0.3, "fraction", "LY%").unwrap(), 30.0);
    assert_close(convert(&set, 8.7, "mmol/L", "HGB").unwrap(), 14.007);
}

#[test]
fn unknown_key_is_unknown_parameter() {
    let set = reference_panel();
    let err = convert(&set, 5.0, "mmol/L", "UnknownKey").unwrap_err();
    assert_eq!(err, ConversionError::UnknownParameter("UnknownKey".to_string()));
}

#[test]
fn unlisted_unit_is_never_treated_as_canonical() {
    let set = reference_panel();
    let err = convert(&set, 14.0, "mg/dL", "HGB").unwrap_err();
    assert_eq!(
        err,
        ConversionError::UnknownUnit {
            key: "HGB".to_string(),
            unit: "mg/dL".to_string(),
        }
    );
}

#[test]
fn unit_match_is_exact() {
    let set = reference_panel();
    assert!(convert(&set, 140.0, "G/L", "HGB").is_err());
    assert!(convert(&set, 140.0, " g/L", "HGB").is_err());
}

#[test]
fn non_finite_values_are_rejected() {
    let set = reference_panel();
    assert!(matches!(
        convert(&set, f64::NAN, "g/dL", "HGB"),
        Err(ConversionError::NonFinite { .. })
    ));
    assert!(matches!(
        convert(&set, f64::INFINITY, "g/dL", "HGB"),
        Err(ConversionError::NonFinite { .. })
    ));
}

#[test]
fn degraded_panel_accepts_only_canonical_units() {
    let set = degraded_panel();
    assert_eq!(convert(&set, 14.0, "g/dL", "HGB").unwrap(), 14.0);
    assert!(matches!(
        convert(&set, 140.0, "g/L", "HGB"),
        Err(ConversionError::UnknownUnit { .. })
    ));
}

#[test]
fn unitless_gender_converts_from_empty_unit() {
    let set = reference_panel();
    assert_eq!(convert(&set, 1.0, "", "Gender").unwrap(), 1.0);
}
