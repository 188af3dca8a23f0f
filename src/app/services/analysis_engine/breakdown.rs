//! CBO distribution
//!
//! Rows are bucketed by the description their CBO code resolves to, so
//! distinct codes sharing a description land in one bucket. Empty and
//! unknown codes share the unmapped bucket.

use crate::app::models::{BreakdownItem, ColumnRole, Dataset};
use crate::app::services::lookup_tables::LookupTables;
use crate::app::services::value_normalizer::clean_code;
use std::collections::HashMap;

/// Count rows per CBO description, largest bucket first
pub fn classification_breakdown(dataset: &Dataset, tables: &LookupTables) -> Vec<BreakdownItem> {
    let total = dataset.row_count();
    let code_index = dataset.role_index(ColumnRole::Classification);

    let mut position: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, String, usize)> = Vec::new();

    for row in dataset.rows() {
        let code = code_index
            .map(|index| row.cell(index).trimmed())
            .unwrap_or_default();

        let (key, description) = match tables.describe_classification(&code) {
            Some(description) => (clean_code(&code), description.to_string()),
            None => (String::new(), tables.unmapped_label().to_string()),
        };

        match position.get(&description) {
            Some(&slot) => buckets[slot].2 += 1,
            None => {
                position.insert(description.clone(), buckets.len());
                buckets.push((key, description, 1));
            }
        }
    }

    let mut items: Vec<BreakdownItem> = buckets
        .into_iter()
        .map(|(key, description, count)| BreakdownItem {
            key,
            description,
            count,
            percentage: format_percentage(count, total),
        })
        .collect();

    items.sort_by(|a, b| b.count.cmp(&a.count));
    items
}

/// Share of `total` with one fraction digit, e.g. `"37.5"`
pub fn format_percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    let share = (count as f64 / total as f64 * 1000.0).round() / 10.0;
    format!("{:.1}", share)
}
