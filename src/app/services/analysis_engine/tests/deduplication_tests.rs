//! Tests for identifier deduplication

use super::*;
use crate::app::services::analysis_engine::deduplication::{DuplicateScan, scan_duplicates};
use indicatif::ProgressBar;

#[test]
fn test_scan_reference_example() {
    let dataset = create_identifier_dataset(&["A", "B", "A", "A", "C"]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan.unique_records, 3);
    assert_eq!(scan.duplicate_keys, 1);
    assert_eq!(scan.extra_duplicates, 2);

    let group = &scan.groups[0];
    assert_eq!(group.key, "A");
    assert_eq!(group.total_count, 3);
    assert_eq!(group.duplicates_to_clean, 2);
    assert_eq!(group.representative_index, 0);
}

#[test]
fn test_scan_no_duplicates() {
    let dataset = create_identifier_dataset(&["A", "B", "C"]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan.unique_records, 3);
    assert_eq!(scan.duplicate_keys, 0);
    assert_eq!(scan.extra_duplicates, 0);
    assert!(scan.groups.is_empty());
}

#[test]
fn test_scan_ignores_blank_identifiers() {
    let dataset = create_identifier_dataset(&["", "  ", "A", ""]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan.unique_records, 1);
    assert_eq!(scan.duplicate_keys, 0);
}

#[test]
fn test_scan_trims_identifiers() {
    let dataset = create_identifier_dataset(&["A", " A ", "A\t"]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan.unique_records, 1);
    assert_eq!(scan.groups[0].key, "A");
    assert_eq!(scan.groups[0].total_count, 3);
}

#[test]
fn test_groups_sorted_by_count_with_stable_ties() {
    // B becomes a duplicate before A; C is the largest group
    let dataset = create_identifier_dataset(&["A", "B", "B", "C", "A", "C", "C"]);
    let scan = scan_duplicates(&dataset, None);

    let keys: Vec<&str> = scan.groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["C", "B", "A"]);
    assert_eq!(scan.extra_duplicates, 4);
}

#[test]
fn test_group_facilities_are_distinct_in_appearance_order() {
    let dataset = create_dataset(
        &["CPF", "CNES"],
        &[
            &["A", ""],
            &["A", "222"],
            &["A", "222"],
            &["A", " 111 "],
            &["A", "333"],
        ],
    );
    let scan = scan_duplicates(&dataset, None);
    let group = &scan.groups[0];

    assert_eq!(group.facility_1, "222");
    assert_eq!(group.facility_2, "111");
}

#[test]
fn test_group_with_single_facility() {
    let dataset = create_dataset(&["CPF", "CNES"], &[&["A", "222"], &["A", "222"]]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan.groups[0].facility_1, "222");
    assert_eq!(scan.groups[0].facility_2, "");
}

#[test]
fn test_representative_is_first_occurrence() {
    let dataset = create_dataset(&["CPF", "NOME"], &[&["X", "x0"], &["A", "first"], &["A", "second"]]);
    let scan = scan_duplicates(&dataset, None);
    let group = &scan.groups[0];

    assert_eq!(group.representative_index, 1);
    assert_eq!(group.representative_row.cell(1).as_text(), "first");
}

#[test]
fn test_scan_without_identifier_column() {
    let dataset = create_dataset(&["NOME"], &[&["Ana"], &["Ana"]]);
    let scan = scan_duplicates(&dataset, None);

    assert_eq!(scan, DuplicateScan::default());
}

#[test]
fn test_scan_advances_progress_bar() {
    let dataset = create_identifier_dataset(&["A", "B", "A"]);
    let pb = ProgressBar::hidden();
    pb.set_length(3);

    scan_duplicates(&dataset, Some(&pb));
    assert_eq!(pb.position(), 3);
}
