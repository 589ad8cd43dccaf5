use checkwise_core::api::{PredictResponse, ValidateResponse};
use checkwise_core::error::CoreError;
use checkwise_core::models::{
    CellValue, Confidence, NormalRange, ParameterDefinition, ParameterRecord, ParameterSet,
};

fn def(key: &str, critical: bool, range: Option<(f64, f64)>) -> ParameterDefinition {
    ParameterDefinition {
        key: key.to_string(),
        label: None,
        is_critical: critical,
        canonical_unit: "g/dL".to_string(),
        alternative_units: vec![],
        normal_range: range.map(|(min, max)| NormalRange {
            min,
            max,
            unit: "g/dL".to_string(),
        }),
        plausible_range: None,
    }
}

#[test]
fn parameter_set_rejects_duplicate_keys() {
    let result = ParameterSet::new(vec![def("HGB", false, None), def("HGB", false, None)]);
    assert!(matches!(result, Err(CoreError::DuplicateParameter(k)) if k == "HGB"));
}

#[test]
fn parameter_set_rejects_critical_without_range() {
    let result = ParameterSet::new(vec![def("HGB", true, None)]);
    assert!(matches!(result, Err(CoreError::CriticalWithoutRange(k)) if k == "HGB"));
}

#[test]
fn parameter_set_rejects_inverted_range() {
    let result = ParameterSet::new(vec![def("HGB", false, Some((15.0, 12.0)))]);
    assert!(matches!(result, Err(CoreError::InvalidRange { .. })));
}

#[test]
fn parameter_set_rejects_inverted_plausible_range() {
    let mut hgb = def("HGB", false, Some((12.0, 15.5)));
    hgb.plausible_range = Some(NormalRange {
        min: 30.0,
        max: 1.0,
        unit: "g/dL".to_string(),
    });
    let result = ParameterSet::new(vec![hgb]);
    assert!(matches!(result, Err(CoreError::InvalidRange { key, .. }) if key == "HGB"));
}

#[test]
fn parameter_set_preserves_order_and_filters_critical() {
    let set = ParameterSet::new(vec![
        def("WBC", true, Some((4.0, 11.0))),
        def("MCV", false, None),
        def("HGB", true, Some((12.0, 15.5))),
    ])
    .unwrap();

    assert_eq!(set.keys().collect::<Vec<_>>(), ["WBC", "MCV", "HGB"]);
    assert_eq!(set.critical_keys().collect::<Vec<_>>(), ["WBC", "HGB"]);
    assert!(set.contains("MCV"));
    assert!(!set.contains("RBC"));
}

#[test]
fn normal_range_bounds_are_inclusive() {
    let range = NormalRange {
        min: 4.0,
        max: 11.0,
        unit: "10³/μL".to_string(),
    };
    assert!(range.contains(4.0));
    assert!(range.contains(11.0));
    assert!(!range.contains(3.99));
    assert!(!range.contains(11.01));
}

#[test]
fn missing_key_reads_as_unset() {
    let record = ParameterRecord::new();
    assert_eq!(record.get("WBC"), &CellValue::Unset);
}

#[test]
fn set_returns_previous_value() {
    let mut record = ParameterRecord::new();
    let previous = record.set("WBC", CellValue::numeric(7.5, "10³/μL"));
    assert_eq!(previous, CellValue::Unset);

    let previous = record.set("WBC", CellValue::NotExtracted);
    assert_eq!(previous, CellValue::numeric(7.5, "10³/μL"));
    assert_eq!(record.numeric_count(), 0);
}

#[test]
fn cell_value_serializes_with_kind_tag() {
    let json = serde_json::to_value(CellValue::numeric(12.4, "10³/μL")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "kind": "numeric", "value": 12.4, "unit": "10³/μL" })
    );

    let json = serde_json::to_value(CellValue::NotExtracted).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "not_extracted" }));
}

#[test]
fn confidence_bands() {
    assert_eq!(Confidence::from_probability(0.9), Confidence::VeryHigh);
    assert_eq!(Confidence::from_probability(0.8), Confidence::VeryHigh);
    assert_eq!(Confidence::from_probability(0.6), Confidence::High);
    assert_eq!(Confidence::from_probability(0.45), Confidence::Moderate);
    assert_eq!(Confidence::from_probability(0.2), Confidence::Low);
    assert_eq!(Confidence::from_probability(0.05), Confidence::VeryLow);
    assert_eq!(Confidence::VeryHigh.label(), "Very High");
}

#[test]
fn validate_response_tolerates_error_shape() {
    let body = r#"{
        "validation": {
            "error": "Too many critical parameters missing: WBC, RBC, HGB, HCT.",
            "success": false
        },
        "success": true,
        "timestamp": "2025-01-01T00:00:00"
    }"#;
    let parsed: ValidateResponse = serde_json::from_str(body).unwrap();
    let outcome = parsed.validation.unwrap();
    assert!(parsed.success);
    assert!(!outcome.success);
    assert!(outcome.data_quality.is_none());
    assert!(outcome.error.unwrap().starts_with("Too many"));
}

#[test]
fn predict_response_ignores_unknown_fields() {
    let body = r#"{
        "prediction": "Anemia",
        "top_predictions": [
            { "disease": "Anemia", "probability": 0.9, "percentage": 90.0, "confidence_level": "Very High" }
        ],
        "model_version": "2.1.0",
        "success": true
    }"#;
    let parsed: PredictResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.prediction.as_deref(), Some("Anemia"));
    assert_eq!(parsed.top_predictions.len(), 1);
}
