//! Spreadsheet ingestion for registration exports
//!
//! Turns a delimited text export or the first worksheet of an XLSX/XLS/ODS
//! workbook into a [`Dataset`](crate::app::models::Dataset): the first record
//! is the header row, every following record is a data row.
//!
//! ## Architecture
//!
//! - [`reader`] - `SheetReader`, file handling and record assembly
//! - [`encoding`] - byte decoding and delimiter detection
//! - [`workbook`] - first-worksheet decoding of binary workbooks (`calamine`)
//! - [`header`] - header normalisation (placeholders, uniqueness)
//! - [`stats`] - read statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use cnes_analyzer::app::services::sheet_reader::SheetReader;
//! use cnes_analyzer::config::Config;
//!
//! # async fn example() -> cnes_analyzer::Result<()> {
//! let reader = SheetReader::from_config(&Config::default());
//! let result = reader.read_path(std::path::Path::new("profissionais.csv")).await?;
//!
//! println!("Read {} rows ({} blank skipped)",
//!          result.dataset.row_count(),
//!          result.stats.blank_records_skipped);
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod header;
pub mod reader;
pub mod stats;
pub mod workbook;

#[cfg(test)]
pub mod tests;

pub use encoding::{decode_text, detect_delimiter};
pub use header::normalize_headers;
pub use reader::SheetReader;
pub use stats::{ReadResult, ReadStats};
pub use workbook::{WorksheetGrid, decode_workbook};
