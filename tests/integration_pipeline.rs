//! End-to-end tests: spreadsheet file -> analysis -> exported workbook
//!
//! These tests drive the public library API the same way the CLI does, using
//! a Windows-1252 encoded, semicolon-delimited export like the ones produced
//! by municipal registration systems, and the same records saved as XLSX.

use calamine::{Data, Reader, open_workbook_auto};
use cnes_analyzer::app::services::analysis_engine::AnalysisEngine;
use cnes_analyzer::app::services::lookup_tables::LookupTables;
use cnes_analyzer::app::services::report_writer::{
    CsvDirectoryWriter, JsonWorkbookWriter, SheetBuilder, XlsxWorkbookWriter, write_workbook,
};
use cnes_analyzer::app::services::sheet_reader::SheetReader;
use cnes_analyzer::{CellValue, ColumnRole, Config, Error};
use encoding_rs::WINDOWS_1252;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REGISTRATION_EXPORT: &str = "\
NOME;CPF;CBO;CNES;SALÁRIO;JORNADA;VALOR COMPLEMENTO;OBSERVAÇÃO
Ana;111.111.111-11;322205;2077485;1.800,00;30;100,50;0
Bruno;22222222222;223505;1234567;4.000,00;40;0;-
Ana;111.111.111-11;322205;7654321;1.800,00;30;50;transferida
;;;;;;;
Carla;33333333333;515105;2077485;1.500,00;40;;pendente
";

/// Write the export as Windows-1252 bytes
fn write_latin1_export(dir: &Path) -> PathBuf {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(REGISTRATION_EXPORT);
    assert!(!had_errors);

    let path = dir.join("cadastro.csv");
    std::fs::write(&path, bytes).unwrap();
    path
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_latin1_export_is_decoded_and_roles_resolved() {
    let temp = TempDir::new().unwrap();
    let path = write_latin1_export(temp.path());

    let read = SheetReader::from_config(&Config::default())
        .read_path(&path)
        .await
        .unwrap();

    assert_eq!(read.stats.encoding, "windows-1252");
    assert_eq!(read.stats.delimiter, Some(';'));
    assert_eq!(read.stats.records_read, 5);
    assert_eq!(read.stats.blank_records_skipped, 1);

    let dataset = &read.dataset;
    assert_eq!(dataset.row_count(), 4);
    assert_eq!(dataset.headers()[4], "SALÁRIO");

    let roles = dataset.roles();
    assert_eq!(roles.get(ColumnRole::Identifier), Some("CPF"));
    assert_eq!(roles.get(ColumnRole::Classification), Some("CBO"));
    assert_eq!(roles.get(ColumnRole::Facility), Some("CNES"));
    assert_eq!(roles.get(ColumnRole::Salary), Some("SALÁRIO"));
    assert_eq!(roles.get(ColumnRole::WorkHours), Some("JORNADA"));
    assert_eq!(roles.get(ColumnRole::Complement), Some("VALOR COMPLEMENTO"));
    assert_eq!(roles.get(ColumnRole::Observation), Some("OBSERVAÇÃO"));
    assert_eq!(roles.get(ColumnRole::Name), Some("NOME"));
}

#[tokio::test]
async fn test_analysis_of_registration_export() {
    let temp = TempDir::new().unwrap();
    let path = write_latin1_export(temp.path());
    let config = Config::default();

    let read = SheetReader::from_config(&config)
        .read_path(&path)
        .await
        .unwrap();
    let tables = LookupTables::new(&config.lookup, &config.repasse);
    let report = AnalysisEngine::new(&tables).analyze(&read.dataset, None);

    let metrics = &report.metrics;
    assert_eq!(metrics.total_rows, 4);
    assert_eq!(metrics.unique_records, 3);
    assert_eq!(metrics.duplicate_keys_count, 1);
    assert_eq!(metrics.total_extra_duplicates, 1);
    assert_close(metrics.total_complement_loaded, 150.5);
    assert_eq!(metrics.records_with_observation, 2);
    assert_eq!(metrics.validated_records, 2);

    let group = &report.duplicates[0];
    assert_eq!(group.key, "111.111.111-11");
    assert_eq!(group.representative_index, 0);
    assert_eq!(group.facility_1, "2077485");
    assert_eq!(group.facility_2, "7654321");

    let buckets: Vec<(&str, usize, &str)> = report
        .breakdown
        .iter()
        .map(|b| (b.description.as_str(), b.count, b.percentage.as_str()))
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("TÉCNICO DE ENFERMAGEM", 2, "50.0"),
            ("ENFERMEIRO", 1, "25.0"),
            ("CBO Não Mapeado", 1, "25.0"),
        ]
    );

    // 2 x (2267.05 - 1800) + (4318.18 - 4000) + (2375 - 1500)
    let projection = report.projection.as_ref().unwrap();
    assert_eq!(projection.rows.len(), 4);
    assert_close(projection.total_shortfall, 2127.28);

    let again = AnalysisEngine::new(&tables).analyze(&read.dataset, None);
    assert_eq!(report, again);
}

#[tokio::test]
async fn test_full_workbook_export_to_csv_directory() {
    let temp = TempDir::new().unwrap();
    let path = write_latin1_export(temp.path());
    let config = Config::default();

    let read = SheetReader::from_config(&config)
        .read_path(&path)
        .await
        .unwrap();
    let tables = LookupTables::new(&config.lookup, &config.repasse);
    let report = AnalysisEngine::new(&tables).analyze(&read.dataset, None);

    let hidden = vec!["observação".to_string()];
    let workbook = SheetBuilder::new(&read.dataset, &report, &tables, &hidden).full_workbook();

    let output = temp.path().join("relatorio_completo_saude");
    let writer = CsvDirectoryWriter::default();
    let stats = write_workbook(&writer, &workbook, &output, false)
        .await
        .unwrap();

    assert_eq!(stats.sheets_written, 4);
    for name in [
        "quadro_resumo.csv",
        "dados_brutos.csv",
        "previsao_repasse.csv",
        "duplicados_resumo.csv",
    ] {
        assert!(output.join(name).exists(), "missing {name}");
    }

    let raw = std::fs::read_to_string(output.join("dados_brutos.csv")).unwrap();
    let mut lines = raw.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Nº,NOME,CPF,CBO,CNES,SALÁRIO,JORNADA,VALOR COMPLEMENTO"));
    assert!(!header.contains("OBSERVAÇÃO"));
    assert!(header.ends_with("CPF Formatado,Nomenclatura CBO,Nomenclatura CNES"));
    assert_eq!(lines.count(), 4);

    let projection = std::fs::read_to_string(output.join("previsao_repasse.csv")).unwrap();
    assert!(projection.contains("TOTAL GERAL (Mensal):"));
    assert!(projection.contains("2127.28"));

    let err = write_workbook(&writer, &workbook, &output, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Export { .. }));
}

#[tokio::test]
async fn test_duplicates_workbook_as_json_with_configured_lookup() {
    let temp = TempDir::new().unwrap();
    let path = write_latin1_export(temp.path());

    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[lookup.classification_descriptions]
"515105" = "AGENTE COMUNITÁRIO DE SAÚDE"

[lookup.facility_descriptions]
"2077485" = "HOSPITAL MUNICIPAL"
"#,
    )
    .unwrap();
    let config = Config::load_layered(Some(&config_path)).unwrap();
    config.validate().unwrap();

    let read = SheetReader::from_config(&config)
        .read_path(&path)
        .await
        .unwrap();
    let tables = LookupTables::new(&config.lookup, &config.repasse);
    let report = AnalysisEngine::new(&tables).analyze(&read.dataset, None);

    assert!(
        report
            .breakdown
            .iter()
            .all(|b| b.description != "CBO Não Mapeado")
    );

    let workbook = SheetBuilder::new(&read.dataset, &report, &tables, &[]).duplicates_workbook();
    let destination = temp.path().join("resumo_duplicados");
    let stats = write_workbook(&JsonWorkbookWriter::new(true), &workbook, &destination, false)
        .await
        .unwrap();

    let written = temp.path().join("resumo_duplicados.json");
    assert_eq!(stats.files, vec![written.clone()]);

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
    let sheet = &document["sheets"][0];
    assert_eq!(sheet["name"], "Duplicados");
    assert_eq!(sheet["rows"].as_array().unwrap().len(), 2);
}

/// Write the same registration export as an XLSX workbook
///
/// Numeric columns are stored as numbers, the way spreadsheet programs save them.
fn write_xlsx_export(dir: &Path) -> PathBuf {
    let mut document = rust_xlsxwriter::Workbook::new();
    let sheet = document.add_worksheet();
    sheet.set_name("Profissionais").unwrap();

    let headers = [
        "NOME", "CPF", "CBO", "CNES", "SALÁRIO", "JORNADA", "VALOR COMPLEMENTO", "OBSERVAÇÃO",
    ];
    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *header).unwrap();
    }

    let rows: [(&str, &str, f64, f64, f64, f64, f64, &str); 4] = [
        ("Ana", "111.111.111-11", 322205.0, 2077485.0, 1800.0, 30.0, 100.5, "0"),
        ("Bruno", "22222222222", 223505.0, 1234567.0, 4000.0, 40.0, 0.0, "-"),
        ("Ana", "111.111.111-11", 322205.0, 7654321.0, 1800.0, 30.0, 50.0, "transferida"),
        ("Carla", "33333333333", 515105.0, 2077485.0, 1500.0, 40.0, 0.0, "pendente"),
    ];
    for (i, (name, cpf, cbo, cnes, salary, hours, complement, note)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, *name).unwrap();
        sheet.write_string(r, 1, *cpf).unwrap();
        sheet.write_number(r, 2, *cbo).unwrap();
        sheet.write_number(r, 3, *cnes).unwrap();
        sheet.write_number(r, 4, *salary).unwrap();
        sheet.write_number(r, 5, *hours).unwrap();
        sheet.write_number(r, 6, *complement).unwrap();
        sheet.write_string(r, 7, *note).unwrap();
    }

    let path = dir.join("cadastro.xlsx");
    document.save(&path).unwrap();
    path
}

#[tokio::test]
async fn test_xlsx_export_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = write_xlsx_export(temp.path());
    let config = Config::default();

    let read = SheetReader::from_config(&config)
        .read_path(&path)
        .await
        .unwrap();
    assert_eq!(read.stats.sheet.as_deref(), Some("Profissionais"));
    assert_eq!(read.stats.delimiter, None);
    assert_eq!(read.dataset.rows()[0].cell(4), &CellValue::Number(1800.0));

    let tables = LookupTables::new(&config.lookup, &config.repasse);
    let report = AnalysisEngine::new(&tables).analyze(&read.dataset, None);
    assert_eq!(report.metrics.unique_records, 3);
    assert_eq!(report.metrics.duplicate_keys_count, 1);
    assert_close(report.metrics.total_complement_loaded, 150.5);
    assert_close(report.projection.as_ref().unwrap().total_shortfall, 2127.28);

    let workbook = SheetBuilder::new(&read.dataset, &report, &tables, &[]).full_workbook();
    let destination = temp.path().join("relatorio_completo_saude");
    let stats = write_workbook(&XlsxWorkbookWriter::new(), &workbook, &destination, false)
        .await
        .unwrap();

    let written = temp.path().join("relatorio_completo_saude.xlsx");
    assert_eq!(stats.files, vec![written.clone()]);

    let mut document = open_workbook_auto(&written).unwrap();
    assert_eq!(
        document.sheet_names(),
        vec!["Quadro Resumo", "Dados Brutos", "Previsão Repasse", "Duplicados Resumo"]
    );
    let raw = document.worksheet_range("Dados Brutos").unwrap();
    assert_eq!(raw.get((0, 0)), Some(&Data::String("Nº".to_string())));
    assert_eq!(raw.get_size().0, 5);
}

#[tokio::test]
async fn test_unsupported_and_empty_inputs() {
    let temp = TempDir::new().unwrap();
    let reader = SheetReader::from_config(&Config::default());

    let pdf = temp.path().join("cadastro.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();
    let err = reader.read_path(&pdf).await.unwrap_err();
    assert!(matches!(err, Error::MalformedContainer { .. }));

    let corrupt = temp.path().join("corrompido.xlsx");
    std::fs::write(&corrupt, b"PK\x03\x04").unwrap();
    let err = reader.read_path(&corrupt).await.unwrap_err();
    assert!(matches!(err, Error::MalformedContainer { .. }));

    let header_only = temp.path().join("vazio.csv");
    std::fs::write(&header_only, "CPF;CBO\n").unwrap();
    let err = reader.read_path(&header_only).await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
}
