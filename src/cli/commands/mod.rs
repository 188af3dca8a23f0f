//! Command implementations for the CNES analyzer CLI
//!
//! Each command is implemented in its own module and shares logging,
//! configuration loading and the read-then-analyse pipeline through
//! [`shared`].

pub mod analyze;
pub mod columns;
pub mod export;
pub mod shared;

pub use shared::CommandOutcome;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the appropriate subcommand handler:
/// - `analyze`: metrics, CBO breakdown, duplicates and projection on the terminal
/// - `export`: full workbook on disk
/// - `duplicates`: duplicates-only workbook on disk
/// - `columns`: resolved column roles (discovery mode)
pub async fn run(args: Args) -> Result<CommandOutcome> {
    let command = args
        .command
        .ok_or_else(|| Error::configuration("No command given"))?;

    match command {
        Commands::Analyze(analyze_args) => analyze::run_analyze(analyze_args).await,
        Commands::Export(export_args) => export::run_export(export_args).await,
        Commands::Duplicates(duplicates_args) => export::run_duplicates(duplicates_args).await,
        Commands::Columns(columns_args) => columns::run_columns(columns_args).await,
    }
}
