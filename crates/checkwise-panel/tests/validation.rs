use checkwise_core::models::{CellValue, FieldStatus, ParameterRecord};
use checkwise_panel::reference::{degraded_panel, reference_panel, sample_record};
use checkwise_panel::validation::field_status;
use checkwise_panel::{evaluate, is_submittable};

const CRITICAL: [&str; 7] = ["WBC", "RBC", "HGB", "HCT", "PLT", "Age", "Gender"];

fn canonical(key: &str, value: f64) -> CellValue {
    let set = reference_panel();
    let unit = set.get(key).unwrap().canonical_unit.clone();
    CellValue::numeric(value, unit)
}

#[test]
fn values_inside_range_are_normal_and_outside_are_out_of_range() {
    let set = reference_panel();
    for def in set.definitions() {
        let range = def.normal_range.as_ref().unwrap();
        let inside = [range.min, range.max, (range.min + range.max) / 2.0];
        let outside = [range.min - 1.0, range.max + 1.0];

        for value in inside {
            let mut record = ParameterRecord::new();
            record.set(def.key.clone(), canonical(&def.key, value));
            let report = evaluate(&record, &set);
            assert_eq!(report.status(&def.key), Some(FieldStatus::Normal), "{} = {value}", def.key);
        }
        for value in outside {
            let mut record = ParameterRecord::new();
            record.set(def.key.clone(), canonical(&def.key, value));
            let report = evaluate(&record, &set);
            assert_eq!(
                report.status(&def.key),
                Some(FieldStatus::OutOfRange),
                "{} = {value}",
                def.key
            );
        }
    }
}

#[test]
fn range_check_uses_canonical_value() {
    let set = reference_panel();
    let mut record = ParameterRecord::new();
    // 140 g/L is 14 g/dL, inside 12.0–15.5
    record.set("HGB", CellValue::numeric(140.0, "g/L"));
    // 90 g/L is 9 g/dL, below range
    record.set("MCHC", CellValue::numeric(90.0, "g/L"));

    let report = evaluate(&record, &set);
    assert_eq!(report.status("HGB"), Some(FieldStatus::Normal));
    assert_eq!(report.status("MCHC"), Some(FieldStatus::OutOfRange));
    assert_eq!(report.out_of_range, ["MCHC"]);
}

#[test]
fn reference_sample_is_submittable() {
    let set = reference_panel();
    let report = evaluate(&sample_record(), &set);

    assert!(is_submittable(&report));
    assert!(report.critical_missing.is_empty());
    assert_eq!(report.completeness_percentage, 100);
    assert!(report.out_of_range.is_empty());
    assert_eq!(report.provided_count, 22);
    assert_eq!(report.total_count, 22);
}

#[test]
fn unset_and_not_extracted_are_both_empty() {
    let set = reference_panel();
    let mut record = ParameterRecord::unset(&set);
    record.set("WBC", CellValue::NotExtracted);

    let report = evaluate(&record, &set);
    assert_eq!(report.status("WBC"), Some(FieldStatus::Empty));
    assert_eq!(report.status("RBC"), Some(FieldStatus::Empty));
    assert_eq!(report.critical_missing, CRITICAL);
    assert_eq!(report.completeness_percentage, 0);
    assert!(!is_submittable(&report));
}

#[test]
fn conversion_failure_is_empty_with_diagnostic() {
    let set = reference_panel();
    let mut record = sample_record();
    record.set("HGB", CellValue::numeric(14.0, "mg/dL"));

    let report = evaluate(&record, &set);
    assert_eq!(report.status("HGB"), Some(FieldStatus::Empty));
    assert_eq!(report.critical_missing, ["HGB"]);
    assert!(report.diagnostics["HGB"].contains("mg/dL"));
    assert!(!is_submittable(&report));
}

#[test]
fn out_of_range_critical_values_do_not_block_submission() {
    let set = reference_panel();
    let mut record = sample_record();
    record.set("WBC", canonical("WBC", 45.0));

    let report = evaluate(&record, &set);
    assert_eq!(report.status("WBC"), Some(FieldStatus::OutOfRange));
    assert!(is_submittable(&report));
}

#[test]
fn critical_missing_follows_registry_order() {
    let set = reference_panel();
    let mut record = ParameterRecord::new();
    record.set("HGB", canonical("HGB", 14.0));
    record.set("Age", canonical("Age", 45.0));

    let report = evaluate(&record, &set);
    assert_eq!(report.critical_missing, ["WBC", "RBC", "HCT", "PLT", "Gender"]);
}

#[test]
fn completeness_rounds_to_whole_percent_and_never_decreases() {
    let set = reference_panel();
    let mut record = ParameterRecord::unset(&set);
    let mut previous = evaluate(&record, &set).completeness_percentage;
    let mut observed = vec![previous];

    for key in CRITICAL {
        record.set(key, canonical(key, 1.0));
        let report = evaluate(&record, &set);
        assert!(report.completeness_percentage >= previous);
        assert_eq!(
            report.completeness_percentage == 100,
            report.critical_missing.is_empty()
        );
        previous = report.completeness_percentage;
        observed.push(previous);
    }

    // 1/7 = 14.28..., 2/7 = 28.57..., 3/7 = 42.85..., etc.
    assert_eq!(observed, [0, 14, 29, 43, 57, 71, 86, 100]);
}

#[test]
fn non_critical_values_do_not_change_completeness() {
    let set = reference_panel();
    let mut record = ParameterRecord::new();
    record.set("MCV", canonical("MCV", 88.0));

    let report = evaluate(&record, &set);
    assert_eq!(report.completeness_percentage, 0);
    assert_eq!(report.provided_count, 1);
}

#[test]
fn degraded_registry_is_always_complete() {
    let set = degraded_panel();
    let record = ParameterRecord::unset(&set);

    let report = evaluate(&record, &set);
    assert_eq!(report.completeness_percentage, 100);
    assert!(report.critical_missing.is_empty());
    assert!(is_submittable(&report));
}

#[test]
fn degraded_registry_has_no_range_to_violate() {
    let set = degraded_panel();
    let mut record = ParameterRecord::new();
    record.set("WBC", CellValue::numeric(500.0, "10³/μL"));

    let report = evaluate(&record, &set);
    assert_eq!(report.status("WBC"), Some(FieldStatus::Normal));
}

#[test]
fn degraded_registry_still_flags_implausible_values() {
    let set = degraded_panel();
    let mut record = ParameterRecord::new();
    record.set("WBC", CellValue::numeric(500.0, "10³/μL"));

    let report = evaluate(&record, &set);
    assert_eq!(report.implausible, ["WBC"]);
}

#[test]
fn abnormal_but_plausible_values_are_not_implausible() {
    let set = reference_panel();
    let mut record = sample_record();
    record.set("HGB", canonical("HGB", 9.0));
    record.set("HCT", canonical("HCT", 30.0));
    record.set("RBC", canonical("RBC", 3.2));

    let report = evaluate(&record, &set);
    assert_eq!(report.out_of_range, ["RBC", "HGB", "HCT"]);
    assert!(report.implausible.is_empty());
}

#[test]
fn implausible_values_keep_their_range_status() {
    let set = reference_panel();
    let mut record = sample_record();
    // 450 g/L is 45 g/dL, above the 30 g/dL plausibility bound
    record.set("HGB", CellValue::numeric(450.0, "g/L"));
    record.set("PLT", canonical("PLT", 0.5));

    let report = evaluate(&record, &set);
    assert_eq!(report.implausible, ["HGB", "PLT"]);
    assert_eq!(report.status("HGB"), Some(FieldStatus::OutOfRange));
    assert_eq!(report.out_of_range, ["HGB", "PLT"]);
    assert!(is_submittable(&report));

    let hgb = set.get("HGB").unwrap();
    assert_eq!(
        field_status(&set, hgb, record.get("HGB")).unwrap(),
        FieldStatus::OutOfRange
    );
}
