//! Analysis engine for registration datasets
//!
//! Scans an ingested [`Dataset`](crate::app::models::Dataset) and produces the
//! aggregate metrics, duplicate groups, CBO breakdown and (when the required
//! columns exist) the repasse projection.
//!
//! # Architecture
//!
//! - [`engine`] - `AnalysisEngine` and pass orchestration
//! - [`deduplication`] - identifier key tracking and duplicate-group materialisation
//! - [`metrics`] - complement sum and observation counting
//! - [`breakdown`] - CBO description buckets and percentages
//!
//! The pass is total: row-level irregularities (blank cells, unparseable
//! numbers, ragged rows) degrade to zero or empty values and never fail.
//!
//! # Example Usage
//!
//! ```rust
//! use cnes_analyzer::app::services::analysis_engine::AnalysisEngine;
//! use cnes_analyzer::app::services::lookup_tables::LookupTables;
//! use cnes_analyzer::config::ColumnCandidates;
//! use cnes_analyzer::{Dataset, Row};
//!
//! let headers = vec!["CPF".to_string(), "CBO".to_string()];
//! let rows = vec![
//!     Row::new(vec!["111".into(), "322205".into()]),
//!     Row::new(vec!["111".into(), "322205".into()]),
//! ];
//! let dataset = Dataset::new(headers, rows, &ColumnCandidates::default()).unwrap();
//!
//! let tables = LookupTables::default();
//! let report = AnalysisEngine::new(&tables).analyze(&dataset, None);
//! assert_eq!(report.metrics.duplicate_keys_count, 1);
//! ```

pub mod breakdown;
pub mod deduplication;
pub mod engine;
pub mod metrics;

#[cfg(test)]
pub mod tests;

pub use breakdown::classification_breakdown;
pub use deduplication::{DuplicateScan, scan_duplicates};
pub use engine::AnalysisEngine;
pub use metrics::{has_observation, sum_complement};
