//! In-memory workbook representation
//!
//! A workbook is an ordered list of named sheets; each sheet is a grid of
//! cells whose first row is usually a header row. Writers turn this into
//! files.

use crate::app::models::CellValue;
use serde::Serialize;

/// One named sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Append a row of text cells
    pub fn push_text_row<S: AsRef<str>>(&mut self, cells: &[S]) {
        self.rows
            .push(cells.iter().map(|c| CellValue::text(c.as_ref())).collect());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the sheet
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// First row rendered as text
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(CellValue::as_text).collect())
            .unwrap_or_default()
    }

    /// Position of a header in the first row
    pub fn column_position(&self, header: &str) -> Option<usize> {
        self.header().iter().position(|h| h == header)
    }

    /// Cell at `(row, column)`, `None` outside the grid
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Ordered collection of sheets
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Rows across all sheets
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(Sheet::row_count).sum()
    }
}
