pub mod parameter;
pub mod prediction;
pub mod quality;
pub mod record;

pub use parameter::{NormalRange, ParameterDefinition, ParameterSet, UnitAlternative};
pub use prediction::{
    Confidence, DisplayEntry, DisplayModel, PredictionResult, RankedDiagnosis, Reliability,
    ReliabilityAssessment,
};
pub use quality::{DataQualityReport, FieldStatus};
pub use record::{CellValue, ParameterRecord};
