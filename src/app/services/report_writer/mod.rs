//! Workbook export for analysis results
//!
//! Builds the exported sheets from a dataset and its [`AnalysisReport`] and
//! writes them as one XLSX document with named worksheets, a directory of CSV
//! files, or a single JSON document.
//!
//! # Architecture
//!
//! - [`workbook`] - `Workbook` and `Sheet` grids
//! - [`sheets`] - summary, raw data, projection and duplicates layouts
//! - [`writer`] - `WorkbookWriter` implementations and the async file writer
//! - [`stats`] - export statistics
//!
//! # Basic Usage
//!
//! ```rust
//! use cnes_analyzer::app::services::report_writer::{CsvDirectoryWriter, SheetBuilder, write_workbook};
//! use cnes_analyzer::app::services::lookup_tables::LookupTables;
//! use cnes_analyzer::{AnalysisReport, Dataset};
//!
//! # async fn example(dataset: Dataset, report: AnalysisReport) -> cnes_analyzer::Result<()> {
//! let tables = LookupTables::default();
//! let workbook = SheetBuilder::new(&dataset, &report, &tables, &[]).full_workbook();
//!
//! let writer = CsvDirectoryWriter::default();
//! let stats = write_workbook(&writer, &workbook, std::path::Path::new("relatorio"), false).await?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```
//!
//! [`AnalysisReport`]: crate::app::models::AnalysisReport

pub mod sheets;
pub mod stats;
pub mod workbook;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use sheets::SheetBuilder;
pub use stats::WriteStats;
pub use workbook::{Sheet, Workbook};
pub use writer::{
    CsvDirectoryWriter, JsonWorkbookWriter, OutputFile, WorkbookWriter, XlsxWorkbookWriter,
    sheet_file_stem, write_workbook, writer_for, xlsx_sheet_name,
};
