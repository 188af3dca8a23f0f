//! Analysis pass orchestration

use crate::app::models::{AnalysisMetrics, AnalysisReport, Dataset};
use crate::app::services::lookup_tables::LookupTables;
use crate::app::services::projection::ProjectionCalculator;
use indicatif::ProgressBar;
use tracing::info;

use super::breakdown::classification_breakdown;
use super::deduplication::scan_duplicates;
use super::metrics::{count_observations, sum_complement};

/// Runs the full analysis over a dataset
///
/// The engine holds no state between calls; analysing the same dataset twice
/// yields identical reports.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisEngine<'a> {
    tables: &'a LookupTables,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(tables: &'a LookupTables) -> Self {
        Self { tables }
    }

    /// Analyse a dataset
    ///
    /// The optional progress bar advances once per row during the
    /// identifier scan.
    pub fn analyze(&self, dataset: &Dataset, progress_bar: Option<&ProgressBar>) -> AnalysisReport {
        let total_rows = dataset.row_count();

        if let Some(pb) = progress_bar {
            pb.set_length(total_rows as u64);
            pb.set_message("Scanning identifiers");
        }

        let scan = scan_duplicates(dataset, progress_bar);
        let records_with_observation = count_observations(dataset);

        let metrics = AnalysisMetrics {
            total_rows,
            unique_records: scan.unique_records,
            duplicate_keys_count: scan.duplicate_keys,
            total_extra_duplicates: scan.extra_duplicates,
            total_complement_loaded: sum_complement(dataset),
            records_with_observation,
            validated_records: total_rows as i64 - records_with_observation as i64,
        };

        if let Some(pb) = progress_bar {
            pb.set_message("Building CBO breakdown");
        }
        let breakdown = classification_breakdown(dataset, self.tables);

        let projection = ProjectionCalculator::new(self.tables.schedule()).project(dataset);

        info!(
            "Analysis complete: {} rows, {} unique, {} duplicated identifiers, {} CBO buckets",
            metrics.total_rows,
            metrics.unique_records,
            metrics.duplicate_keys_count,
            breakdown.len()
        );

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        AnalysisReport {
            metrics,
            duplicates: scan.groups,
            breakdown,
            projection,
        }
    }
}
