//! Binary workbook decoding (XLSX, XLS, ODS)
//!
//! Only the first worksheet is read. Its used range becomes a grid of
//! [`CellValue`]s: numeric and date cells stay numeric, everything else is
//! text.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

use crate::app::models::CellValue;
use crate::{Error, Result};

/// First worksheet of a workbook
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetGrid {
    pub sheet_name: String,
    pub rows: Vec<Vec<CellValue>>,
}

/// Decode the first worksheet of an in-memory workbook
pub fn decode_workbook(name: &str, bytes: &[u8]) -> Result<WorksheetGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::malformed_container(name, format!("not a readable workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::empty_input(name, "workbook has no worksheets"))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        Error::malformed_container(name, format!("could not read sheet '{}': {}", sheet_name, e))
    })?;

    let (height, width) = range.get_size();
    debug!(
        "Worksheet '{}' of {} spans {} rows x {} columns",
        sheet_name, name, height, width
    );

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(WorksheetGrid { sheet_name, rows })
}

/// Convert a workbook cell
///
/// Dates keep their serial number, the same value the sheet stores.
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::text(value.to_string()),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => CellValue::text(error.to_string()),
    }
}
