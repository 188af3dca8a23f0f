//! Export and duplicates command implementations
//!
//! Both commands analyse the spreadsheet and then write a workbook: the full
//! report (summary, raw data, projection, duplicates) or the duplicates sheet
//! on its own.

use crate::app::services::report_writer::{
    SheetBuilder, Workbook, WriteStats, write_workbook, writer_for,
};
use crate::cli::args::{DuplicatesArgs, ExportArgs, WorkbookFormat};
use crate::config::ExportConfig;
use crate::constants::DEFAULT_DUPLICATES_OUTPUT_DIR;
use crate::Result;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::shared::{
    AnalysisContext, CommandOutcome, load_configuration, prepare_analysis, setup_logging,
};

/// Run the export command
pub async fn run_export(args: ExportArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;
    info!("Starting workbook export");
    debug!("Command line arguments: {:?}", args);

    let mut context = prepare_analysis(&args.common, config).await?;
    apply_export_overrides(
        &mut context.config.export,
        args.output_path,
        args.format,
        args.force_overwrite,
    );
    if !args.hidden_columns.is_empty() {
        context.config.export.hidden_columns = args.hidden_columns;
    }

    let workbook = SheetBuilder::new(
        &context.read.dataset,
        &context.report,
        &context.tables,
        &context.config.export.hidden_columns,
    )
    .full_workbook();

    let stats = write_export(&context, &workbook).await?;
    print_export_summary("Export complete", &stats, args.common.quiet);

    Ok(outcome(context, stats, start_time))
}

/// Run the duplicates command
pub async fn run_duplicates(args: DuplicatesArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;
    info!("Starting duplicates export");
    debug!("Command line arguments: {:?}", args);

    let mut context = prepare_analysis(&args.common, config).await?;
    let output_path = args
        .output_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DUPLICATES_OUTPUT_DIR));
    apply_export_overrides(
        &mut context.config.export,
        Some(output_path),
        args.format,
        args.force_overwrite,
    );

    let workbook = SheetBuilder::new(
        &context.read.dataset,
        &context.report,
        &context.tables,
        &context.config.export.hidden_columns,
    )
    .duplicates_workbook();

    if workbook.is_empty() {
        warn!("No duplicate identifiers found, nothing to export");
        if !args.common.quiet {
            println!("{}", "No duplicate identifiers found.".bright_green());
        }
        return Ok(outcome(context, WriteStats::new(), start_time));
    }

    let stats = write_export(&context, &workbook).await?;
    print_export_summary("Duplicates exported", &stats, args.common.quiet);

    Ok(outcome(context, stats, start_time))
}

/// Apply command-line export flags on top of the configured export settings
fn apply_export_overrides(
    export: &mut ExportConfig,
    output_path: Option<PathBuf>,
    format: Option<WorkbookFormat>,
    force: bool,
) {
    if let Some(path) = output_path {
        export.output_path = path;
    }
    if let Some(format) = format {
        export.format = format.into();
    }
    export.force_overwrite = export.force_overwrite || force;
}

async fn write_export(context: &AnalysisContext, workbook: &Workbook) -> Result<WriteStats> {
    context.config.ensure_output_directory()?;

    let export = &context.config.export;
    let writer = writer_for(export);
    info!(
        "Writing {} sheets as {} to {}",
        workbook.sheets.len(),
        writer.format_name(),
        export.output_path.display()
    );

    write_workbook(
        writer.as_ref(),
        workbook,
        &export.output_path,
        export.force_overwrite,
    )
    .await
}

fn print_export_summary(title: &str, stats: &WriteStats, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n{}", title.bright_green().bold());
    println!(
        "  {} {}",
        "Sheets:".bright_cyan(),
        stats.sheets_written.to_string().bright_white().bold()
    );
    println!("  {} {}", "Written:".bright_cyan(), stats.summary());
    for file in &stats.files {
        println!("    {}", file.display());
    }
}

fn outcome(context: AnalysisContext, stats: WriteStats, start_time: Instant) -> CommandOutcome {
    CommandOutcome {
        input_file: Some(context.input_file),
        rows_analyzed: context.report.metrics.total_rows,
        files_written: stats.files,
        bytes_written: stats.bytes_written,
        processing_time: start_time.elapsed(),
    }
}
