//! Command-line argument definitions for the CNES analyzer
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares the [`CommonArgs`] block (input file, config file,
//! verbosity and delimiter override).

use crate::config::ExportFormat;
use crate::constants::DEFAULT_TOP_DUPLICATES;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the registration spreadsheet analyzer
///
/// Reads spreadsheets of health-professional registrations, reports duplicate
/// CPFs and CBO distribution, projects the repasse complement and writes
/// enriched workbooks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cnes-analyzer",
    version,
    about = "Analyse professional-registration spreadsheets (duplicates, CBO breakdown, repasse projection)",
    long_about = "Reads XLSX/XLS/ODS or CSV/TXT registration spreadsheets, detects the CPF, CBO, CNES, salary and \
                  weekly-hours columns from their headers, groups duplicate identifiers, breaks the \
                  records down by occupation and projects the monthly complement owed under the \
                  nursing wage floor tables."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print summary metrics, CBO breakdown, top duplicates and projection total
    Analyze(AnalyzeArgs),
    /// Write the full workbook (summary, raw data, projection, duplicates)
    Export(ExportArgs),
    /// Write only the duplicates workbook
    Duplicates(DuplicatesArgs),
    /// Show which header was resolved for each column role
    Columns(ColumnsArgs),
}

impl Commands {
    /// Shared arguments of whichever subcommand was chosen
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Analyze(args) => &args.common,
            Commands::Export(args) => &args.common,
            Commands::Duplicates(args) => &args.common,
            Commands::Columns(args) => &args.common,
        }
    }
}

/// Arguments shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Spreadsheet to analyse
    ///
    /// When omitted, spreadsheets in the current directory are listed and
    /// one can be picked interactively.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file for column keywords, lookup tables and repasse
    /// rates. If not specified, looks for ~/.config/cnes-analyzer/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Input field delimiter
    ///
    /// A single character or one of tab/comma/semicolon/pipe. Detected from
    /// the first line when not given.
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        help = "Input delimiter (auto-detected when omitted)"
    )]
    pub delimiter: Option<String>,
}

impl CommonArgs {
    /// Log level requested on the command line, if any
    ///
    /// `None` when neither `-v` nor `-q` was given, so the configured level applies.
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Get the log level based on verbosity and quiet flags
    pub fn get_log_level(&self) -> &'static str {
        self.log_level_override().unwrap_or("warn")
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the analyze command
#[derive(Debug, Clone, ClapArgs)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the analysis report"
    )]
    pub output_format: OutputFormat,

    /// Number of duplicate groups to list
    #[arg(
        long = "top",
        value_name = "N",
        default_value_t = DEFAULT_TOP_DUPLICATES,
        help = "Number of duplicate groups to list in human output"
    )]
    pub top: usize,
}

/// Arguments for the export command
#[derive(Debug, Clone, ClapArgs)]
pub struct ExportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output file (XLSX, JSON) or directory (CSV)
    ///
    /// Defaults to ./relatorio_completo_saude.xlsx
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output file (xlsx, json) or directory (csv)"
    )]
    pub output_path: Option<PathBuf>,

    /// Workbook container format
    #[arg(
        long = "format",
        value_enum,
        help = "Workbook format (defaults to the configured format, xlsx)"
    )]
    pub format: Option<WorkbookFormat>,

    /// Force overwrite of existing output files
    #[arg(long = "force", help = "Force overwrite of existing output files")]
    pub force_overwrite: bool,

    /// Headers to leave out of the raw-data and projection sheets
    #[arg(
        long = "hide",
        value_name = "COLUMNS",
        value_delimiter = ',',
        help = "Comma-separated headers to hide from the raw-data and projection sheets"
    )]
    pub hidden_columns: Vec<String>,
}

/// Arguments for the duplicates command
#[derive(Debug, Clone, ClapArgs)]
pub struct DuplicatesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output file (XLSX, JSON) or directory (CSV)
    ///
    /// Defaults to ./resumo_duplicados.xlsx
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output file (xlsx, json) or directory (csv)"
    )]
    pub output_path: Option<PathBuf>,

    /// Workbook container format
    #[arg(long = "format", value_enum, help = "Workbook format")]
    pub format: Option<WorkbookFormat>,

    /// Force overwrite of existing output files
    #[arg(long = "force", help = "Force overwrite of existing output files")]
    pub force_overwrite: bool,
}

/// Arguments for the columns command
#[derive(Debug, Clone, ClapArgs)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format for the analyze report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Container format for exported workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkbookFormat {
    /// Single XLSX document with named worksheets
    Xlsx,
    /// One CSV file per sheet
    Csv,
    /// Single JSON document
    Json,
}

impl From<WorkbookFormat> for ExportFormat {
    fn from(format: WorkbookFormat) -> Self {
        match format {
            WorkbookFormat::Xlsx => ExportFormat::Xlsx,
            WorkbookFormat::Csv => ExportFormat::Csv,
            WorkbookFormat::Json => ExportFormat::Json,
        }
    }
}
