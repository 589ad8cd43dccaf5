use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One entry of the differential returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankedDiagnosis {
    pub disease: String,
    /// Probability in `[0, 1]`.
    pub probability: f64,
}

/// A successful prediction as received from the service.
///
/// The service asserts that `ranked` is sorted descending and that
/// `primary_diagnosis` is `ranked[0].disease`. Neither is checked here; the
/// result aggregator re-sorts before display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionResult {
    pub primary_diagnosis: String,
    pub ranked: Vec<RankedDiagnosis>,
}

/// Coarse confidence band for a single probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Confidence {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::VeryHigh
        } else if probability >= 0.6 {
            Self::High
        } else if probability >= 0.4 {
            Self::Moderate
        } else if probability >= 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

/// A ranked entry shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayEntry {
    pub disease: String,
    pub probability: f64,
    /// `probability * 100`, rounded to two decimal places.
    pub percentage: f64,
    pub is_primary: bool,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayModel {
    pub primary_diagnosis: String,
    /// Sorted descending by probability.
    pub ranked: Vec<DisplayEntry>,
}

impl DisplayModel {
    pub fn top(&self) -> Option<&DisplayEntry> {
        self.ranked.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Reliability {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// How far a prediction can be trusted given the quality of its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReliabilityAssessment {
    pub reliability: Reliability,
    pub recommendation: String,
    pub notes: Vec<String>,
}
