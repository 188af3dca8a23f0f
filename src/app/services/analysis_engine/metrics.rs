//! Per-row aggregate metrics

use crate::app::models::{CellValue, ColumnRole, Dataset};
use crate::app::services::value_normalizer::parse_currency;
use crate::constants::NON_OBSERVATION_VALUES;

/// Sum of the complement column (0 when the column is not resolved)
pub fn sum_complement(dataset: &Dataset) -> f64 {
    match dataset.role_index(ColumnRole::Complement) {
        Some(index) => dataset
            .rows()
            .iter()
            .map(|row| parse_currency(row.cell(index)))
            .sum(),
        None => 0.0,
    }
}

/// Whether an observation cell holds a real observation
///
/// Blank cells and the placeholders `"0"` and `"-"` do not count.
pub fn has_observation(value: &CellValue) -> bool {
    let text = value.trimmed();
    !text.is_empty() && !NON_OBSERVATION_VALUES.contains(&text.as_str())
}

/// Rows with a real observation (0 when the column is not resolved)
pub fn count_observations(dataset: &Dataset) -> usize {
    match dataset.role_index(ColumnRole::Observation) {
        Some(index) => dataset
            .rows()
            .iter()
            .filter(|row| has_observation(row.cell(index)))
            .count(),
        None => 0,
    }
}
