//! Unit normalization.

use checkwise_core::models::{CellValue, ParameterSet};

use crate::error::ConversionError;

/// Convert `value` expressed in `from_unit` into the canonical unit of `key`.
///
/// The canonical unit converts to itself unchanged; a listed alternative is
/// multiplied by its factor. Any other unit is an error. An unrecognized unit
/// is never assumed to be canonical.
pub fn convert(
    set: &ParameterSet,
    value: f64,
    from_unit: &str,
    key: &str,
) -> Result<f64, ConversionError> {
    let definition = set
        .get(key)
        .ok_or_else(|| ConversionError::UnknownParameter(key.to_string()))?;

    if !value.is_finite() {
        return Err(ConversionError::NonFinite {
            key: key.to_string(),
            value,
        });
    }

    let factor = definition
        .factor_for(from_unit)
        .ok_or_else(|| ConversionError::UnknownUnit {
            key: key.to_string(),
            unit: from_unit.to_string(),
        })?;

    Ok(value * factor)
}

/// Canonical value of a cell, `None` if it holds no number.
pub fn cell_to_canonical(
    set: &ParameterSet,
    key: &str,
    cell: &CellValue,
) -> Result<Option<f64>, ConversionError> {
    match cell.as_numeric() {
        Some((value, unit)) => convert(set, value, unit, key).map(Some),
        None => Ok(None),
    }
}
