//! Tests for workbook export


use crate::app::models::{AnalysisReport, CellValue, Dataset, Row};
use crate::app::services::analysis_engine::AnalysisEngine;
use crate::app::services::lookup_tables::LookupTables;
use crate::config::{ColumnCandidates, LookupConfig, RepasseConfig};
use std::collections::BTreeMap;

/// Lookup tables with one known facility
pub fn create_tables() -> LookupTables {
    let lookup = LookupConfig {
        facility_descriptions: BTreeMap::from([(
            "2077485".to_string(),
            "HOSPITAL MUNICIPAL".to_string(),
        )]),
        ..LookupConfig::default()
    };
    LookupTables::new(&lookup, &RepasseConfig::default())
}

pub fn create_dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
    let headers = headers.iter().map(|h| h.to_string()).collect();
    let rows = rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(|c| CellValue::from(*c)).collect()))
        .collect();
    Dataset::new(headers, rows, &ColumnCandidates::default()).unwrap()
}

/// Registration dataset with one duplicated CPF and every role resolved
pub fn create_registration_dataset() -> Dataset {
    create_dataset(
        &["NOME", "CPF", "CBO", "CNES", "SALARIO", "JORNADA", "UF"],
        &[
            &["Ana", "11111111111", "322205", "2077485", "2.000,00", "30", "SP"],
            &["Bruno", "22222222222", "223505", "1234567", "4.000,00", "40", "SP"],
            &["Ana", "11111111111", "322205", "7654321", "2.000,00", "30", "SP"],
        ],
    )
}

pub fn analyze(dataset: &Dataset, tables: &LookupTables) -> AnalysisReport {
    AnalysisEngine::new(tables).analyze(dataset, None)
}
