//! Workbook writers
//!
//! A [`WorkbookWriter`] renders a workbook into one or more output files in
//! memory; [`write_workbook`] then puts those files on disk. Keeping
//! rendering synchronous lets the layouts be tested without touching the
//! filesystem.

use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook as XlsxDocument, XlsxError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::stats::WriteStats;
use super::workbook::{Sheet, Workbook};
use crate::app::models::CellValue;
use crate::config::{ExportConfig, ExportFormat};
use crate::constants::XLSX_SHEET_NAME_LIMIT;
use crate::{Error, Result};

/// A rendered output file
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    /// Sheet the file holds (or the workbook title for single-file formats)
    pub label: String,
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub rows: usize,
}

/// Renders workbooks into files below a destination path
pub trait WorkbookWriter {
    /// Short format name for logs
    fn format_name(&self) -> &'static str;

    /// Render every file for `workbook` under `destination`
    fn render(&self, workbook: &Workbook, destination: &Path) -> Result<Vec<OutputFile>>;
}

/// One CSV file per sheet inside a destination directory
#[derive(Debug, Clone)]
pub struct CsvDirectoryWriter {
    delimiter: u8,
}

impl CsvDirectoryWriter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn render_sheet(&self, sheet: &Sheet) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        for row in &sheet.rows {
            writer
                .write_record(row.iter().map(|cell| cell.as_text()))
                .map_err(|e| Error::export(&sheet.name, format!("CSV encoding failed: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::export(&sheet.name, format!("CSV flush failed: {}", e)))
    }
}

impl Default for CsvDirectoryWriter {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl WorkbookWriter for CsvDirectoryWriter {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn render(&self, workbook: &Workbook, destination: &Path) -> Result<Vec<OutputFile>> {
        let mut used: Vec<String> = Vec::with_capacity(workbook.sheets.len());
        let mut files = Vec::with_capacity(workbook.sheets.len());

        for (position, sheet) in workbook.sheets.iter().enumerate() {
            let mut stem = sheet_file_stem(&sheet.name);
            if stem.is_empty() {
                stem = format!("sheet_{}", position + 1);
            }
            if used.contains(&stem) {
                stem = format!("{}_{}", stem, position + 1);
            }
            used.push(stem.clone());

            files.push(OutputFile {
                label: sheet.name.clone(),
                path: destination.join(format!("{}.csv", stem)),
                contents: self.render_sheet(sheet)?,
                rows: sheet.row_count(),
            });
        }

        Ok(files)
    }
}

/// A single JSON document holding every sheet
#[derive(Debug, Clone, Default)]
pub struct JsonWorkbookWriter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: String,
    generator: &'static str,
    sheets: &'a [Sheet],
}

impl JsonWorkbookWriter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl WorkbookWriter for JsonWorkbookWriter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    /// `destination` is the output file; `.json` is appended when it has no extension
    fn render(&self, workbook: &Workbook, destination: &Path) -> Result<Vec<OutputFile>> {
        let document = JsonDocument {
            generated_at: Utc::now().to_rfc3339(),
            generator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
            sheets: &workbook.sheets,
        };

        let contents = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };

        let path = if destination.extension().is_some() {
            destination.to_path_buf()
        } else {
            destination.with_extension("json")
        };

        Ok(vec![OutputFile {
            label: "workbook".to_string(),
            path,
            contents,
            rows: workbook.total_rows(),
        }])
    }
}

/// A single XLSX document with one worksheet per sheet
///
/// Numbers are written as numeric cells and the first row of every sheet is
/// bold.
#[derive(Debug, Clone, Default)]
pub struct XlsxWorkbookWriter;

impl XlsxWorkbookWriter {
    pub fn new() -> Self {
        Self
    }

    fn render_document(&self, workbook: &Workbook) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut document = XlsxDocument::new();
        let header_format = Format::new().set_bold();
        let mut used: Vec<String> = Vec::with_capacity(workbook.sheets.len());

        for (position, sheet) in workbook.sheets.iter().enumerate() {
            let name = xlsx_sheet_name(&sheet.name, position, &used);
            used.push(name.to_lowercase());

            let worksheet = document.add_worksheet();
            worksheet.set_name(&name)?;

            for (row_index, row) in sheet.rows.iter().enumerate() {
                let r = row_index as u32;
                for (column_index, cell) in row.iter().enumerate() {
                    let c = column_index as u16;
                    match cell {
                        CellValue::Number(value) => {
                            worksheet.write_number(r, c, *value)?;
                        }
                        CellValue::Text(text) if row_index == 0 => {
                            worksheet.write_string_with_format(r, c, text, &header_format)?;
                        }
                        CellValue::Text(text) => {
                            worksheet.write_string(r, c, text)?;
                        }
                        CellValue::Empty => {}
                    }
                }
            }
        }

        document.save_to_buffer()
    }
}

impl WorkbookWriter for XlsxWorkbookWriter {
    fn format_name(&self) -> &'static str {
        "xlsx"
    }

    /// `destination` is the output file; `.xlsx` is appended when it has no extension
    fn render(&self, workbook: &Workbook, destination: &Path) -> Result<Vec<OutputFile>> {
        let contents = self
            .render_document(workbook)
            .map_err(|e| Error::export("workbook", format!("XLSX encoding failed: {}", e)))?;

        let path = if destination.extension().is_some() {
            destination.to_path_buf()
        } else {
            destination.with_extension("xlsx")
        };

        Ok(vec![OutputFile {
            label: "workbook".to_string(),
            path,
            contents,
            rows: workbook.total_rows(),
        }])
    }
}

/// Worksheet name accepted by XLSX: at most 31 characters, none of
/// `[ ] : * ? / \`, no edge apostrophes, unique ignoring case
///
/// `used` holds the lowercased names already taken.
pub fn xlsx_sheet_name(name: &str, position: usize, used: &[String]) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();

    let base = if cleaned.is_empty() {
        format!("Sheet{}", position + 1)
    } else {
        cleaned
    };

    let mut candidate: String = base.chars().take(XLSX_SHEET_NAME_LIMIT).collect();
    let mut suffix = 2;
    while used.contains(&candidate.to_lowercase()) {
        let tail = format!(" ({})", suffix);
        let keep = XLSX_SHEET_NAME_LIMIT - tail.chars().count();
        candidate = base.chars().take(keep).collect::<String>() + &tail;
        suffix += 1;
    }
    candidate
}

/// Writer matching the configured export format
pub fn writer_for(config: &ExportConfig) -> Box<dyn WorkbookWriter + Send + Sync> {
    match config.format {
        ExportFormat::Csv => Box::new(CsvDirectoryWriter::new(config.csv_delimiter as u8)),
        ExportFormat::Json => Box::new(JsonWorkbookWriter::new(true)),
        ExportFormat::Xlsx => Box::new(XlsxWorkbookWriter::new()),
    }
}

/// Render a workbook and write its files
///
/// Existing files are only replaced when `force` is set; the check happens
/// for every file before anything is written.
pub async fn write_workbook(
    writer: &(dyn WorkbookWriter + Send + Sync),
    workbook: &Workbook,
    destination: &Path,
    force: bool,
) -> Result<WriteStats> {
    let files = writer.render(workbook, destination)?;

    if !force {
        for file in &files {
            if tokio::fs::try_exists(&file.path).await.unwrap_or(false) {
                return Err(Error::export(
                    &file.label,
                    format!(
                        "{} already exists (use --force to overwrite)",
                        file.path.display()
                    ),
                ));
            }
        }
    }

    let mut stats = WriteStats::new();
    for file in files {
        if let Some(parent) = file.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::io(
                        format!("Failed to create directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        tokio::fs::write(&file.path, &file.contents)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", file.path.display()), e))?;
        debug!("Wrote {} ({} rows)", file.path.display(), file.rows);

        stats.record(file.path, file.rows, file.contents.len());
    }
    stats.sheets_written = workbook.sheets.len();

    info!(
        "Exported {} sheets as {}: {}",
        stats.sheets_written,
        writer.format_name(),
        stats.summary()
    );

    Ok(stats)
}

/// File-name stem for a sheet: lowercase ASCII, accents folded, other
/// characters collapsed to underscores
pub fn sheet_file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let folded = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        };

        if folded.is_ascii_alphanumeric() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(folded);
        } else {
            pending_separator = true;
        }
    }

    stem
}
