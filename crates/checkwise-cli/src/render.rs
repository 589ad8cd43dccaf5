//! Plain-text rendering for terminal output.

use checkwise_core::api::HealthResponse;
use checkwise_core::models::{
    CellValue, DataQualityReport, DisplayModel, FieldStatus, ParameterRecord,
    ReliabilityAssessment,
};
use checkwise_panel::{ParameterRegistry, RegistrySource};

pub fn registry(registry: &ParameterRegistry) -> String {
    let mut lines = vec![match registry.source() {
        RegistrySource::Service => "Parameters (from service)".to_string(),
        RegistrySource::Builtin => "Parameters (built-in reference panel)".to_string(),
        RegistrySource::Degraded => {
            "Parameters (DEGRADED: service unreachable, no ranges or unit alternatives)"
                .to_string()
        }
    }];

    for def in registry.parameters().definitions() {
        let range = def
            .normal_range
            .as_ref()
            .map(|r| format!("{}–{}", r.min, r.max))
            .unwrap_or_else(|| "-".to_string());
        let alternatives: Vec<&str> = def.alternative_units.iter().map(|a| a.unit.as_str()).collect();
        lines.push(format!(
            "{marker} {key:<7} {unit:<8} {range:<12} {alts}",
            marker = if def.is_critical { "*" } else { " " },
            key = def.key,
            unit = def.canonical_unit,
            alts = alternatives.join(", "),
        ));
    }
    lines.join("\n")
}

pub fn report(
    record: &ParameterRecord,
    report: &DataQualityReport,
    registry: &ParameterRegistry,
) -> String {
    let mut lines = Vec::new();
    for def in registry.parameters().definitions() {
        let key = def.key.as_str();
        let value = match record.get(key) {
            CellValue::Unset => "-".to_string(),
            CellValue::NotExtracted => "not found in document".to_string(),
            CellValue::Numeric { value, unit } => format!("{value} {unit}").trim_end().to_string(),
        };
        let status = match report.status(key) {
            Some(FieldStatus::Normal) => "ok",
            Some(FieldStatus::OutOfRange) => "OUT OF RANGE",
            Some(FieldStatus::Empty) | None => "empty",
        };
        let mut line = format!("{key:<7} {value:<24} {status}");
        if let Some(diagnostic) = report.diagnostics.get(key) {
            line.push_str(&format!(" ({diagnostic})"));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "Completeness: {}% of critical parameters, {}/{} overall",
        report.completeness_percentage, report.provided_count, report.total_count
    ));
    if !report.critical_missing.is_empty() {
        lines.push(format!(
            "Missing critical: {}",
            report.critical_missing.join(", ")
        ));
    }
    if !report.out_of_range.is_empty() {
        lines.push(format!("Out of range: {}", report.out_of_range.join(", ")));
    }
    if !report.implausible.is_empty() {
        lines.push(format!(
            "Check entry (implausible): {}",
            report.implausible.join(", ")
        ));
    }
    lines.join("\n")
}

pub fn prediction(model: &DisplayModel) -> String {
    let mut lines = vec![format!("Primary diagnosis: {}", model.primary_diagnosis)];
    for (rank, entry) in model.ranked.iter().enumerate() {
        lines.push(format!(
            "{:>2}. {:<32} {:>6.2}%  {}{}",
            rank + 1,
            entry.disease,
            entry.percentage,
            entry.confidence.label(),
            if entry.is_primary { "  (primary)" } else { "" },
        ));
    }
    lines.join("\n")
}

pub fn reliability(assessment: &ReliabilityAssessment) -> String {
    let mut lines = vec![
        format!("Reliability: {:?}", assessment.reliability),
        assessment.recommendation.clone(),
    ];
    lines.extend(assessment.notes.iter().map(|n| format!("  - {n}")));
    lines.join("\n")
}

pub fn health(health: &HealthResponse) -> String {
    let mut lines = vec![format!(
        "Service status: {}{}",
        health.status,
        health
            .version
            .as_deref()
            .map(|v| format!(" (version {v})"))
            .unwrap_or_default()
    )];
    lines.extend(health.warnings.iter().map(|w| format!("  warning: {w}")));
    lines.join("\n")
}
