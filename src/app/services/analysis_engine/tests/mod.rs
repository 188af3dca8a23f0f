//! Tests for the analysis engine
//!
//! Fixtures build small datasets with realistic header names so column
//! roles are resolved exactly as they would be for an ingested file.

pub mod deduplication_tests;

use crate::app::models::{CellValue, Dataset, Row};
use crate::config::ColumnCandidates;

/// Build a dataset from string cells, resolving roles with the default keywords
pub fn create_dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
    let headers = headers.iter().map(|h| h.to_string()).collect();
    let rows = rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(|c| CellValue::from(*c)).collect()))
        .collect();
    Dataset::new(headers, rows, &ColumnCandidates::default()).unwrap()
}

/// Dataset with only an identifier column
pub fn create_identifier_dataset(ids: &[&str]) -> Dataset {
    let rows: Vec<Vec<&str>> = ids.iter().map(|id| vec![*id]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    create_dataset(&["CPF"], &rows)
}

/// Typical registration layout with every role present
pub fn create_registration_dataset() -> Dataset {
    create_dataset(
        &[
            "NOME",
            "CPF",
            "CBO",
            "CNES",
            "SALARIO",
            "JORNADA",
            "OBSERVAÇÃO",
            "COMPLEMENTO",
        ],
        &[
            &["Ana", "111.111.111-11", "322205", "2077485", "2.000,00", "30", "", "100,50"],
            &["Bruno", "22222222222", "223505", "2077485", "4.000,00", "40", "Afastado", "0"],
            &["Ana", "111.111.111-11", "322205", "7654321", "2.000,00", "30", "-", "50"],
            &["Carla", "33333333333", "515110", "2077485", "1.500,00", "44", "0", ""],
            &["Bruno", " 22222222222 ", "223505", "2077485", "4.000,00", "40", "", "R$ 10,00"],
            &["Davi", "", "", "", "", "", "Sem CPF", ""],
        ],
    )
}
