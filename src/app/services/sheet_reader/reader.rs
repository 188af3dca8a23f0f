//! Core spreadsheet reader implementation
//!
//! Handles file reading, decoding and record assembly. Column roles are
//! resolved once the header row is known.

use std::path::Path;
use tracing::{debug, info, warn};

use super::encoding::{decode_text, detect_delimiter};
use super::header::normalize_headers;
use super::stats::{ReadResult, ReadStats};
use super::workbook::decode_workbook;
use crate::app::models::{CellValue, Dataset, Row};
use crate::config::{ColumnCandidates, Config, IngestConfig};
use crate::constants::{SUPPORTED_EXTENSIONS, TEXT_EXTENSIONS, WORKBOOK_EXTENSIONS};
use crate::{Error, Result};

/// Reader for registration exports (delimited text or binary workbooks)
#[derive(Debug, Clone)]
pub struct SheetReader {
    ingest: IngestConfig,
    candidates: ColumnCandidates,
}

impl SheetReader {
    pub fn new(ingest: IngestConfig, candidates: ColumnCandidates) -> Self {
        Self { ingest, candidates }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ingest.clone(), config.columns.clone())
    }

    /// Read and decode a spreadsheet file
    ///
    /// The extension picks the decoder: csv/txt are delimited text,
    /// xlsx/xlsm/xls/ods are read from their first worksheet.
    pub async fn read_path(&self, path: &Path) -> Result<ReadResult> {
        let name = path.display().to_string();
        info!("Reading spreadsheet: {}", name);

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        let is_text = TEXT_EXTENSIONS.contains(&extension.as_str());
        let is_workbook = WORKBOOK_EXTENSIONS.contains(&extension.as_str());
        if !is_text && !is_workbook {
            return Err(Error::malformed_container(
                name,
                format!(
                    "unsupported container '.{}'; expected one of {}",
                    extension,
                    SUPPORTED_EXTENSIONS.join(", ")
                ),
            ));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read file {}", name), e))?;

        if is_workbook {
            self.read_workbook_bytes(&name, &extension, &bytes)
        } else {
            self.read_bytes(&name, &bytes)
        }
    }

    /// Decode an in-memory delimited text export
    ///
    /// `name` is only used in error messages.
    pub fn read_bytes(&self, name: &str, bytes: &[u8]) -> Result<ReadResult> {
        let (text, encoding) = decode_text(bytes);
        if text.trim().is_empty() {
            return Err(Error::empty_input(name, "file has no header row"));
        }

        let delimiter = self
            .ingest
            .delimiter
            .unwrap_or_else(|| detect_delimiter(&text));
        if !delimiter.is_ascii() {
            return Err(Error::configuration(format!(
                "Delimiter {:?} is not a single-byte character",
                delimiter
            )));
        }
        debug!("Decoded {} as {} with delimiter {:?}", name, encoding, delimiter);

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter as u8)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for (position, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| {
                let what = if position == 0 {
                    "invalid header row".to_string()
                } else {
                    format!("invalid record {}", position)
                };
                Error::malformed_container(name, format!("{}: {}", what, e))
            })?;
            records.push(record.iter().map(CellValue::from).collect());
        }

        self.assemble(name, records, ReadStats::new(delimiter, encoding))
    }

    /// Decode an in-memory binary workbook (first worksheet only)
    pub fn read_workbook_bytes(
        &self,
        name: &str,
        container: &str,
        bytes: &[u8],
    ) -> Result<ReadResult> {
        let grid = decode_workbook(name, bytes)?;
        let stats = ReadStats::for_workbook(container, grid.sheet_name);
        self.assemble(name, grid.rows, stats)
    }

    /// Split the header row off, normalise it and build the dataset
    fn assemble(
        &self,
        name: &str,
        records: Vec<Vec<CellValue>>,
        mut stats: ReadStats,
    ) -> Result<ReadResult> {
        let mut records = records.into_iter();
        let header_record = records
            .next()
            .ok_or_else(|| Error::empty_input(name, "file has no header row"))?;

        let raw_headers: Vec<String> = header_record.iter().map(CellValue::as_text).collect();
        let headers = normalize_headers(&raw_headers);
        let width = headers.len();

        let mut rows = Vec::new();
        for mut cells in records {
            stats.records_read += 1;

            if self.ingest.skip_blank_rows && cells.iter().all(CellValue::is_blank) {
                stats.blank_records_skipped += 1;
                continue;
            }

            if cells.len() != width {
                stats.ragged_records += 1;
            }

            cells.resize(width, CellValue::Empty);
            rows.push(Row::new(cells));
        }

        if rows.is_empty() {
            return Err(Error::empty_input(name, "no data rows after the header row"));
        }

        if stats.ragged_records > 0 {
            warn!(
                "{} records in {} did not match the {} header columns",
                stats.ragged_records, name, width
            );
        }

        let dataset = Dataset::new(headers, rows, &self.candidates)?;
        info!(
            "Read {} rows x {} columns from {} ({} roles resolved)",
            dataset.row_count(),
            width,
            name,
            dataset.roles().resolved_count()
        );

        Ok(ReadResult { dataset, stats })
    }
}
