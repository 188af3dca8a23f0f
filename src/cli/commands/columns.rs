//! Columns command implementation
//!
//! Discovery mode: shows which header each column role resolved to, without
//! running the analysis. Useful for tuning the keyword lists in the config.

use crate::app::models::{ColumnRole, Dataset};
use crate::app::services::sheet_reader::ReadStats;
use crate::cli::args::ColumnsArgs;
use crate::Result;
use colored::*;
use std::time::Instant;
use tracing::{debug, info};

use super::shared::{CommandOutcome, load_configuration, prepare_input, setup_logging};

/// Run the columns command
pub async fn run_columns(args: ColumnsArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;
    info!("Starting column discovery");
    debug!("Command line arguments: {:?}", args);

    let (_config, input_file, read) = prepare_input(&args.common, config).await?;

    println!(
        "\n{} {}",
        "Columns of".bright_green().bold(),
        input_file.display().to_string().bright_white()
    );
    for line in column_report_lines(&read.dataset, &read.stats) {
        println!("{}", line);
    }

    Ok(CommandOutcome {
        input_file: Some(input_file),
        rows_analyzed: read.dataset.row_count(),
        processing_time: start_time.elapsed(),
        ..CommandOutcome::default()
    })
}

fn column_report_lines(dataset: &Dataset, stats: &ReadStats) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} {} rows, {} columns ({}, {} blank skipped)",
        "Read:".bright_cyan(),
        dataset.row_count(),
        dataset.headers().len(),
        stats.source_description(),
        stats.blank_records_skipped
    )];

    lines.push(format!("\n{}", "Roles".bright_green().bold()));
    for role in ColumnRole::ALL {
        let resolved = match dataset.roles().get(role) {
            Some(header) => header.bright_white().to_string(),
            None => "(not found)".yellow().to_string(),
        };
        lines.push(format!("  {:<22} {}", role.label(), resolved));
    }

    lines.push(format!("\n{}", "Headers".bright_green().bold()));
    for (index, header) in dataset.headers().iter().enumerate() {
        lines.push(format!("  {:>3}  {}", index, header));
    }

    lines
}
