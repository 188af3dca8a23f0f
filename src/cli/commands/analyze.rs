//! Analyze command implementation
//!
//! Reads one spreadsheet, runs the analysis pass and prints the summary
//! metrics, CBO breakdown, the largest duplicate groups and the repasse
//! projection total, either for humans or as JSON.

use crate::app::models::AnalysisReport;
use crate::app::services::sheet_reader::ReadStats;
use crate::app::services::value_normalizer::format_identifier;
use crate::cli::args::{AnalyzeArgs, OutputFormat};
use crate::Result;
use colored::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use super::shared::{
    AnalysisContext, CommandOutcome, load_configuration, prepare_analysis, setup_logging,
};

/// Machine-readable analyze output
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    file: String,
    generated_at: String,
    read: &'a ReadStats,
    report: &'a AnalysisReport,
}

/// Run the analyze command
pub async fn run_analyze(args: AnalyzeArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;
    info!("Starting analysis");
    debug!("Command line arguments: {:?}", args);

    let context = prepare_analysis(&args.common, config).await?;

    match args.output_format {
        OutputFormat::Human => {
            for line in human_report_lines(&context, args.top) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", render_json(&context)?),
    }

    Ok(CommandOutcome {
        input_file: Some(context.input_file),
        rows_analyzed: context.report.metrics.total_rows,
        processing_time: start_time.elapsed(),
        ..CommandOutcome::default()
    })
}

/// Serialize the read statistics and analysis report
fn render_json(context: &AnalysisContext) -> Result<String> {
    let document = JsonReport {
        file: context.input_file.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        read: &context.read.stats,
        report: &context.report,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Lines of the human-readable report
fn human_report_lines(context: &AnalysisContext, top: usize) -> Vec<String> {
    let metrics = &context.report.metrics;
    let mut lines = Vec::new();

    lines.push(format!(
        "\n{} {}",
        "Analysis of".bright_green().bold(),
        context.input_file.display().to_string().bright_white()
    ));
    lines.push(format!(
        "  {} {}",
        "Read as:".bright_cyan(),
        context.read.stats.source_description()
    ));

    lines.push(format!("\n{}", "Summary".bright_green().bold()));
    let summary: [(&str, String); 7] = [
        ("Total rows:", metrics.total_rows.to_string()),
        ("Unique records:", metrics.unique_records.to_string()),
        ("Duplicated identifiers:", metrics.duplicate_keys_count.to_string()),
        ("Extra duplicate rows:", metrics.total_extra_duplicates.to_string()),
        ("Complement loaded:", format!("{:.2}", metrics.total_complement_loaded)),
        ("With observation:", metrics.records_with_observation.to_string()),
        ("Validated records:", metrics.validated_records.to_string()),
    ];
    for (label, value) in summary {
        lines.push(format!(
            "  {:<26} {}",
            label.bright_cyan(),
            value.bright_white().bold()
        ));
    }

    lines.push(format!("\n{}", "CBO breakdown".bright_green().bold()));
    if context.report.breakdown.is_empty() {
        lines.push(format!("  {}", "No rows to break down".yellow()));
    }
    for item in &context.report.breakdown {
        lines.push(format!(
            "  {:>6}  {:>5}%  {}",
            item.count, item.percentage, item.description
        ));
    }

    lines.push(format!("\n{}", "Duplicate identifiers".bright_green().bold()));
    if context.report.duplicates.is_empty() {
        lines.push(format!("  {}", "No duplicates found".green()));
    }
    for group in context.report.duplicates.iter().take(top) {
        let facilities = [group.facility_1.as_str(), group.facility_2.as_str()]
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "  {}  x{} ({} to remove)  {}",
            format_identifier(&group.key).bright_white(),
            group.total_count,
            group.duplicates_to_clean,
            facilities
        ));
    }
    if context.report.duplicates.len() > top {
        lines.push(format!(
            "  ... and {} more",
            context.report.duplicates.len() - top
        ));
    }

    lines.push(format!("\n{}", "Repasse projection".bright_green().bold()));
    match &context.report.projection {
        Some(projection) => {
            let owed = projection.rows.iter().filter(|r| r.shortfall > 0.0).count();
            lines.push(format!(
                "  {:<26} {}",
                "Monthly total:".bright_cyan(),
                format!("{:.2}", projection.total_shortfall).bright_white().bold()
            ));
            lines.push(format!(
                "  {:<26} {} of {}",
                "Rows below base:".bright_cyan(),
                owed,
                projection.rows.len()
            ));
        }
        None => lines.push(format!(
            "  {}",
            "Not available: CPF, CBO, salary or weekly-hours column not found".yellow()
        )),
    }

    lines
}
