//! CNES Analyzer Library
//!
//! A Rust library for analysing spreadsheets of health-professional
//! registration records (CPF, CBO, CNES, salary and weekly hours) and
//! re-exporting them as enriched workbooks.
//!
//! This library provides tools for:
//! - Reading CSV registration exports into header-indexed datasets
//! - Detecting semantic columns (identifier, CBO, CNES, salary, ...) from header names
//! - Normalising Brazilian currency strings and identifier codes
//! - Grouping duplicate identifiers and breaking records down by CBO description
//! - Projecting the repasse complement owed per professional from lookup tables
//! - Writing summary, raw-data, projection and duplicates sheets

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod analysis_engine;
        pub mod column_resolver;
        pub mod lookup_tables;
        pub mod projection;
        pub mod report_writer;
        pub mod sheet_reader;
        pub mod value_normalizer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{AnalysisReport, CellValue, ColumnRole, Dataset, Row};
pub use config::Config;

/// Result type alias for the CNES analyzer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ingestion, configuration and export operations
///
/// The analysis pass itself never fails: unresolved columns and unparseable
/// cells degrade to zero/empty results instead of surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet has no header or no data rows
    #[error("Empty input in '{file}': {message}")]
    EmptyInput { file: String, message: String },

    /// Container could not be decoded as a spreadsheet
    #[error("Could not decode spreadsheet '{file}': {message}")]
    MalformedContainer { file: String, message: String },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Workbook export error
    #[error("Export error for sheet '{sheet}': {message}")]
    Export { sheet: String, message: String },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an empty input error
    pub fn empty_input(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmptyInput {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a malformed container error
    pub fn malformed_container(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedContainer {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create an export error for a named sheet
    pub fn export(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Export {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether the error should be shown to the user as-is rather than as a
    /// generic processing failure
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput { .. } | Self::Configuration { .. } | Self::ProcessingInterrupted { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid TOML configuration: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
