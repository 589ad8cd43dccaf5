//! Shapes a prediction into what the result view shows.

use checkwise_core::models::{
    Confidence, DataQualityReport, DisplayEntry, DisplayModel, PredictionResult, RankedDiagnosis,
    Reliability, ReliabilityAssessment,
};

use crate::error::SubmissionError;

/// Re-sort the differential descending by probability and annotate each
/// entry for display. The service's own ordering is not trusted.
pub fn aggregate(raw: &PredictionResult) -> Result<DisplayModel, SubmissionError> {
    if raw.ranked.is_empty() {
        return Err(SubmissionError::EmptyResult);
    }

    let mut sorted: Vec<&RankedDiagnosis> = raw.ranked.iter().collect();
    sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let ranked = sorted
        .into_iter()
        .map(|entry| DisplayEntry {
            disease: entry.disease.clone(),
            probability: entry.probability,
            percentage: round2(entry.probability * 100.0),
            is_primary: entry.disease == raw.primary_diagnosis,
            confidence: Confidence::from_probability(entry.probability),
        })
        .collect();

    Ok(DisplayModel {
        primary_diagnosis: raw.primary_diagnosis.clone(),
        ranked,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grade how far a prediction can be relied on, from the completeness of the
/// record it was made from and the probability of the top diagnosis.
///
/// Only implausible values count against the grade. Values outside the normal
/// range are expected in the records this tool exists for.
pub fn assess_reliability(
    report: &DataQualityReport,
    top_probability: f64,
) -> ReliabilityAssessment {
    let completeness = report.overall_completeness();
    let critical_missing = report.critical_missing.len();
    let implausible = report.implausible.len();

    let (reliability, recommendation) = if completeness >= 95.0
        && critical_missing == 0
        && implausible == 0
    {
        (
            Reliability::Excellent,
            "High confidence prediction. Results are reliable for clinical reference.",
        )
    } else if completeness >= 80.0 && critical_missing <= 1 && implausible <= 2 {
        (
            Reliability::Good,
            "Good quality prediction. Minor data gaps present but results are trustworthy.",
        )
    } else if completeness >= 60.0 && critical_missing <= 2 {
        (
            Reliability::Fair,
            "Fair prediction quality. Some important parameters missing. Use with caution.",
        )
    } else {
        (
            Reliability::Poor,
            "Low confidence prediction. Too many missing or invalid parameters. Obtain complete CBC results.",
        )
    };

    let mut notes = Vec::new();
    if critical_missing > 0 {
        notes.push(format!("Missing {critical_missing} critical parameter(s)"));
    }
    if implausible > 0 {
        notes.push(format!("{implausible} parameter(s) outside plausible range"));
    }
    if top_probability < 0.3 {
        notes.push("Low prediction confidence - multiple conditions possible".to_string());
    } else if top_probability > 0.8 {
        notes.push("High prediction confidence".to_string());
    }

    ReliabilityAssessment {
        reliability,
        recommendation: recommendation.to_string(),
        notes,
    }
}
