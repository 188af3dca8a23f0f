//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! the command implementations: logging setup, layered configuration loading,
//! progress bars and the read-then-analyse pipeline.

use crate::app::models::AnalysisReport;
use crate::app::services::analysis_engine::AnalysisEngine;
use crate::app::services::lookup_tables::LookupTables;
use crate::app::services::sheet_reader::{ReadResult, SheetReader};
use crate::cli::args::CommonArgs;
use crate::cli::input::resolve_input_file;
use crate::config::{Config, LoggingConfig, parse_delimiter};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Outcome statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    /// Spreadsheet that was processed
    pub input_file: Option<PathBuf>,
    /// Data rows analysed
    pub rows_analyzed: usize,
    /// Files written by export commands
    pub files_written: Vec<PathBuf>,
    /// Bytes written by export commands
    pub bytes_written: usize,
    /// Total command time
    pub processing_time: Duration,
}

/// A loaded spreadsheet together with its analysis
#[derive(Debug)]
pub struct AnalysisContext {
    pub config: Config,
    pub tables: LookupTables,
    pub input_file: PathBuf,
    pub read: ReadResult,
    pub report: AnalysisReport,
}

/// Set up structured logging
///
/// `-v`/`-q` win over the configured level. A second initialisation in the
/// same process is ignored so commands can be driven repeatedly from tests.
pub fn setup_logging(args: &CommonArgs, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args
        .log_level_override()
        .unwrap_or(logging.level.as_str());

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cnes_analyzer={}", log_level)));

    let initialised = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if initialised.is_err() {
        debug!("Logging already initialised, keeping existing subscriber");
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    info!("Loading configuration");

    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file)?;

    apply_cli_overrides(&mut config, args)?;

    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &CommonArgs) -> Result<()> {
    if let Some(delimiter) = &args.delimiter {
        config.ingest.delimiter = Some(parse_delimiter(delimiter)?);
    }

    if let Some(level) = args.log_level_override() {
        config.logging.level = level.to_string();
    }

    Ok(())
}

/// Create a progress bar, hidden when progress output is disabled
pub fn create_progress_bar(total: u64, message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Read a spreadsheet with the configured ingestion settings
pub async fn load_dataset(path: &Path, config: &Config) -> Result<ReadResult> {
    let reader = SheetReader::from_config(config);
    let read = reader.read_path(path).await?;

    info!(
        "Loaded {} rows x {} columns ({})",
        read.dataset.row_count(),
        read.dataset.headers().len(),
        read.stats.source_description()
    );
    Ok(read)
}

/// Resolve the input file and load the spreadsheet
pub async fn prepare_input(
    args: &CommonArgs,
    config: Config,
) -> Result<(Config, PathBuf, ReadResult)> {
    // The picker blocks on stdin; keep it off the runtime thread so Ctrl+C still lands
    let file = args.file.clone();
    let input_file = tokio::task::spawn_blocking(move || resolve_input_file(file.as_deref()))
        .await
        .map_err(|e| Error::processing_interrupted(format!("File selection aborted: {}", e)))??;
    let read = load_dataset(&input_file, &config).await?;
    Ok((config, input_file, read))
}

/// Full read-then-analyse pipeline shared by analyze/export/duplicates
pub async fn prepare_analysis(args: &CommonArgs, config: Config) -> Result<AnalysisContext> {
    let (config, input_file, read) = prepare_input(args, config).await?;
    let tables = LookupTables::new(&config.lookup, &config.repasse);

    let pb = create_progress_bar(
        read.dataset.row_count() as u64,
        "Analysing",
        args.show_progress(),
    );
    let report = AnalysisEngine::new(&tables).analyze(&read.dataset, Some(&pb));

    Ok(AnalysisContext {
        config,
        tables,
        input_file,
        read,
        report,
    })
}
