//! Tests for the spreadsheet reader

use super::*;
use crate::Error;
use crate::app::models::{CellValue, ColumnRole};

#[test]
fn test_read_semicolon_sheet() {
    let result = default_reader()
        .read_bytes("test.csv", SEMICOLON_SHEET.as_bytes())
        .unwrap();
    let dataset = &result.dataset;

    assert_eq!(dataset.headers(), &["NOME", "CPF", "CBO", "CNES", "SALARIO", "JORNADA"]);
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.roles().get(ColumnRole::Identifier), Some("CPF"));
    assert_eq!(dataset.roles().get(ColumnRole::WorkHours), Some("JORNADA"));
    assert_eq!(
        dataset.value(&dataset.rows()[0], "SALARIO"),
        Some(&CellValue::text("2.000,00"))
    );

    assert_eq!(result.stats.delimiter, Some(';'));
    assert_eq!(result.stats.records_read, 2);
    assert_eq!(result.stats.rows_kept(), 2);
    assert_eq!(result.stats.encoding, "UTF-8");
}

#[test]
fn test_read_quoted_comma_sheet() {
    let content = "CPF,SALARIO\n111,\"1.500,00\"\n";
    let result = default_reader().read_bytes("test.csv", content.as_bytes()).unwrap();

    assert_eq!(result.stats.delimiter, Some(','));
    assert_eq!(
        result.dataset.rows()[0].cell(1),
        &CellValue::text("1.500,00")
    );
}

#[test]
fn test_configured_delimiter_overrides_detection() {
    let reader = SheetReader::new(
        IngestConfig {
            delimiter: Some('|'),
            ..IngestConfig::default()
        },
        ColumnCandidates::default(),
    );
    let result = reader.read_bytes("t.txt", b"CPF|CBO;X\n1|2;3\n").unwrap();

    assert_eq!(result.dataset.headers(), &["CPF", "CBO;X"]);
    assert_eq!(result.dataset.rows()[0].cell(1), &CellValue::text("2;3"));
}

#[test]
fn test_blank_records_are_skipped() {
    let content = "CPF;CBO\n111;322205\n;\n  ;  \n222;223505\n";
    let result = default_reader().read_bytes("t.csv", content.as_bytes()).unwrap();

    assert_eq!(result.dataset.row_count(), 2);
    assert_eq!(result.stats.records_read, 4);
    assert_eq!(result.stats.blank_records_skipped, 2);
}

#[test]
fn test_blank_records_kept_when_configured() {
    let reader = SheetReader::new(
        IngestConfig {
            skip_blank_rows: false,
            ..IngestConfig::default()
        },
        ColumnCandidates::default(),
    );
    let result = reader.read_bytes("t.csv", b"CPF;CBO\n111;1\n;\n").unwrap();
    assert_eq!(result.dataset.row_count(), 2);
}

#[test]
fn test_ragged_records_are_padded_and_truncated() {
    let content = "A;B;C\n1\n1;2;3;4;5\n1;2;3\n";
    let result = default_reader().read_bytes("t.csv", content.as_bytes()).unwrap();
    let rows = result.dataset.rows();

    assert_eq!(rows[0].len(), 3);
    assert_eq!(rows[0].cell(1), &CellValue::Empty);
    assert_eq!(rows[1].len(), 3);
    assert_eq!(rows[1].cell(2), &CellValue::text("3"));
    assert_eq!(result.stats.ragged_records, 2);
}

#[test]
fn test_header_only_file_is_empty_input() {
    let err = default_reader()
        .read_bytes("t.csv", b"CPF;CBO\n")
        .unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
}

#[test]
fn test_blank_file_is_empty_input() {
    let err = default_reader().read_bytes("t.csv", b"  \n").unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));

    let err = default_reader().read_bytes("t.csv", b"").unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
}

#[test]
fn test_only_blank_data_rows_is_empty_input() {
    let err = default_reader()
        .read_bytes("t.csv", b"CPF;CBO\n;\n;\n")
        .unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
}

#[test]
fn test_windows_1252_sheet() {
    let content = b"CPF;Sal\xe1rio Base;Observa\xe7\xe3o\n111;1.000,00;F\xe9rias\n";
    let result = default_reader().read_bytes("t.csv", content).unwrap();
    let dataset = &result.dataset;

    assert_eq!(result.stats.encoding, "windows-1252");
    assert_eq!(dataset.roles().get(ColumnRole::Salary), Some("Salário Base"));
    assert_eq!(dataset.roles().get(ColumnRole::Observation), Some("Observação"));
    assert_eq!(dataset.rows()[0].cell(2), &CellValue::text("Férias"));
}

#[test]
fn test_placeholder_headers_take_part_in_resolution() {
    let content = "CPF;;;CBO\n1;a;b;322205\n";
    let result = default_reader().read_bytes("t.csv", content.as_bytes()).unwrap();

    assert_eq!(
        result.dataset.headers(),
        &["CPF", "Coluna Vazia", "Coluna Vazia (2)", "CBO"]
    );
    assert_eq!(result.dataset.column_index("Coluna Vazia (2)"), Some(2));
}

#[tokio::test]
async fn test_read_path_from_temp_file() {
    let file = create_temp_sheet(SEMICOLON_SHEET.as_bytes(), "csv");
    let result = default_reader().read_path(file.path()).await.unwrap();

    assert_eq!(result.dataset.row_count(), 2);
    assert_eq!(result.dataset.roles().get(ColumnRole::Classification), Some("CBO"));
}

#[tokio::test]
async fn test_read_path_accepts_uppercase_txt_extension() {
    let file = create_temp_sheet(SEMICOLON_SHEET.as_bytes(), "TXT");
    let result = default_reader().read_path(file.path()).await.unwrap();
    assert_eq!(result.dataset.row_count(), 2);
}

#[tokio::test]
async fn test_read_path_rejects_unsupported_container() {
    let file = create_temp_sheet(b"%PDF-1.4", "pdf");
    let err = default_reader().read_path(file.path()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedContainer { .. }));
}

#[tokio::test]
async fn test_read_path_rejects_corrupt_workbook() {
    let file = create_temp_sheet(b"PK\x03\x04", "xlsx");
    let err = default_reader().read_path(file.path()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedContainer { .. }));
}

#[tokio::test]
async fn test_read_path_missing_file_is_io_error() {
    let err = default_reader()
        .read_path(std::path::Path::new("/nonexistent/dir/sheet.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
