//! Duplicate detection by identifier
//!
//! One scan builds a map from trimmed identifier to the ordered list of row
//! positions carrying it, and records the order in which keys become
//! duplicates (their second occurrence). Groups are then materialised in that
//! order and stably sorted by size, so equal-sized groups keep discovery order.

use crate::app::models::{ColumnRole, Dataset, DuplicateGroup};
use indicatif::ProgressBar;
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of the identifier scan
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DuplicateScan {
    /// Groups sorted by `total_count` descending
    pub groups: Vec<DuplicateGroup>,
    /// Distinct non-empty identifiers
    pub unique_records: usize,
    /// Identifiers seen at least twice
    pub duplicate_keys: usize,
    /// Rows carrying a duplicated identifier, minus one per duplicated identifier
    pub extra_duplicates: usize,
}

/// Find every identifier that occurs more than once
///
/// Rows with a blank identifier are ignored. Without an identifier column the
/// scan is empty.
pub fn scan_duplicates(dataset: &Dataset, progress_bar: Option<&ProgressBar>) -> DuplicateScan {
    let Some(id_index) = dataset.role_index(ColumnRole::Identifier) else {
        debug!("No identifier column resolved, skipping duplicate scan");
        return DuplicateScan::default();
    };

    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    let mut discovery_order: Vec<String> = Vec::new();

    for (row_index, row) in dataset.rows().iter().enumerate() {
        let key = row.cell(id_index).trimmed();
        if !key.is_empty() {
            let seen = positions.entry(key.clone()).or_default();
            seen.push(row_index);
            if seen.len() == 2 {
                discovery_order.push(key);
            }
        }

        if let Some(pb) = progress_bar {
            pb.inc(1);
        }
    }

    let facility_index = dataset.role_index(ColumnRole::Facility);
    let mut groups: Vec<DuplicateGroup> = discovery_order
        .into_iter()
        .filter_map(|key| {
            let rows = positions.get(&key)?;
            Some(materialize_group(dataset, key, rows, facility_index))
        })
        .collect();

    // sort_by is stable: equal counts keep discovery order
    groups.sort_by(|a, b| b.total_count.cmp(&a.total_count));

    let extra_duplicates = groups.iter().map(|g| g.duplicates_to_clean).sum();
    let scan = DuplicateScan {
        unique_records: positions.len(),
        duplicate_keys: groups.len(),
        extra_duplicates,
        groups,
    };

    info!(
        "Duplicate scan complete: {} unique identifiers, {} duplicated, {} extra rows",
        scan.unique_records, scan.duplicate_keys, scan.extra_duplicates
    );

    scan
}

fn materialize_group(
    dataset: &Dataset,
    key: String,
    rows: &[usize],
    facility_index: Option<usize>,
) -> DuplicateGroup {
    let representative_index = rows[0];
    let representative_row = dataset.rows()[representative_index].clone();

    let (facility_1, facility_2) = match facility_index {
        Some(index) => distinct_facilities(dataset, rows, index),
        None => (String::new(), String::new()),
    };

    DuplicateGroup {
        key,
        representative_index,
        representative_row,
        total_count: rows.len(),
        duplicates_to_clean: rows.len() - 1,
        facility_1,
        facility_2,
    }
}

/// First and second distinct non-blank facility codes, in appearance order
fn distinct_facilities(dataset: &Dataset, rows: &[usize], index: usize) -> (String, String) {
    let mut found: Vec<String> = Vec::with_capacity(2);

    for &row_index in rows {
        let value = dataset.rows()[row_index].cell(index).trimmed();
        if !value.is_empty() && !found.contains(&value) {
            found.push(value);
            if found.len() == 2 {
                break;
            }
        }
    }

    let mut values = found.into_iter();
    (
        values.next().unwrap_or_default(),
        values.next().unwrap_or_default(),
    )
}
