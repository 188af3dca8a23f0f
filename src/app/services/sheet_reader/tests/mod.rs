//! Tests for spreadsheet ingestion

mod encoding_tests;
mod reader_tests;

use crate::app::models::CellValue;
use crate::app::services::sheet_reader::SheetReader;
use crate::config::{ColumnCandidates, IngestConfig};
use std::io::Write;
use tempfile::NamedTempFile;

/// Reader with default settings (auto-detected delimiter, blank rows skipped)
pub fn default_reader() -> SheetReader {
    SheetReader::new(IngestConfig::default(), ColumnCandidates::default())
}

/// Write content to a temporary file with the given extension
pub fn create_temp_sheet(content: &[u8], extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

pub const SEMICOLON_SHEET: &str = "\
NOME;CPF;CBO;CNES;SALARIO;JORNADA
Ana;111.111.111-11;322205;2077485;2.000,00;30
Bruno;22222222222;223505;2077485;4.000,00;40
";

/// Build an XLSX document whose first worksheet holds `rows`
///
/// Sheets after the first are filled with a single marker cell.
pub fn create_xlsx(first_sheet: &str, rows: &[Vec<CellValue>], extra_sheets: &[&str]) -> Vec<u8> {
    let mut document = rust_xlsxwriter::Workbook::new();

    let worksheet = document.add_worksheet();
    worksheet.set_name(first_sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                CellValue::Text(text) => {
                    worksheet.write_string(r as u32, c as u16, text).unwrap();
                }
                CellValue::Number(value) => {
                    worksheet.write_number(r as u32, c as u16, *value).unwrap();
                }
                CellValue::Empty => {}
            }
        }
    }

    for name in extra_sheets {
        let worksheet = document.add_worksheet();
        worksheet.set_name(*name).unwrap();
        worksheet.write_string(0, 0, "ignorada").unwrap();
    }

    document.save_to_buffer().unwrap()
}
