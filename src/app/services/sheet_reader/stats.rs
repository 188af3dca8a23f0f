//! Read statistics and result structures for spreadsheet ingestion

use crate::app::models::Dataset;
use serde::{Deserialize, Serialize};

/// Ingested dataset with read statistics
#[derive(Debug, Clone)]
pub struct ReadResult {
    pub dataset: Dataset,
    pub stats: ReadStats,
}

/// Simple ingestion statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadStats {
    /// Data records encountered after the header row
    pub records_read: usize,

    /// Records skipped because every cell was blank
    pub blank_records_skipped: usize,

    /// Records whose cell count differed from the header count
    pub ragged_records: usize,

    /// Delimiter used to split records; `None` for workbook containers
    pub delimiter: Option<char>,

    /// Text encoding the bytes were decoded with, or the workbook container
    pub encoding: String,

    /// Worksheet the rows were taken from (workbook containers only)
    pub sheet: Option<String>,
}

impl ReadStats {
    /// Statistics for a delimited text file
    pub fn new(delimiter: char, encoding: impl Into<String>) -> Self {
        Self {
            records_read: 0,
            blank_records_skipped: 0,
            ragged_records: 0,
            delimiter: Some(delimiter),
            encoding: encoding.into(),
            sheet: None,
        }
    }

    /// Statistics for one worksheet of a binary workbook
    pub fn for_workbook(container: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            records_read: 0,
            blank_records_skipped: 0,
            ragged_records: 0,
            delimiter: None,
            encoding: container.into(),
            sheet: Some(sheet.into()),
        }
    }

    /// Rows kept in the dataset
    pub fn rows_kept(&self) -> usize {
        self.records_read - self.blank_records_skipped
    }

    /// Delimiter in printable form
    pub fn delimiter_name(&self) -> String {
        match self.delimiter {
            Some('\t') => "tab".to_string(),
            Some(other) => format!("'{}'", other),
            None => "none".to_string(),
        }
    }

    /// Where the rows came from: encoding and delimiter, or container and sheet
    pub fn source_description(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}, sheet '{}'", self.encoding, sheet),
            None => format!("{}, delimiter {}", self.encoding, self.delimiter_name()),
        }
    }
}
