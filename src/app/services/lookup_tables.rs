//! Static lookup tables for codes and compensation
//!
//! Holds the CBO nomenclature, the CNES facility names and the repasse
//! compensation schedule. Tables are built once from configuration and are
//! read-only afterwards; every lookup is a hash-map lookup.

use crate::app::models::CompensationTrack;
use crate::app::services::value_normalizer::{clean_code, digits_only};
use crate::config::{LookupConfig, RepasseConfig, ShiftRate};
use crate::constants::CBO_DESCRIPTIONS;
use std::collections::HashMap;
use tracing::debug;

/// Code-to-description tables plus the compensation schedule
#[derive(Debug, Clone)]
pub struct LookupTables {
    classification: HashMap<String, String>,
    facility: HashMap<String, String>,
    unmapped_label: String,
    schedule: CompensationSchedule,
}

impl LookupTables {
    /// Build the tables from configuration
    pub fn new(lookup: &LookupConfig, repasse: &RepasseConfig) -> Self {
        // Configured descriptions override the built-in nomenclature
        let classification: HashMap<String, String> = CBO_DESCRIPTIONS
            .iter()
            .map(|(code, desc)| (code.to_string(), desc.to_string()))
            .chain(
                lookup
                    .classification_descriptions
                    .iter()
                    .map(|(code, desc)| (clean_code(code), desc.clone())),
            )
            .filter(|(code, _)| !code.is_empty())
            .collect();

        let facility: HashMap<String, String> = lookup
            .facility_descriptions
            .iter()
            .map(|(code, desc)| (digits_only(code), desc.clone()))
            .filter(|(code, _)| !code.is_empty())
            .collect();

        debug!(
            "Lookup tables loaded: {} CBO descriptions, {} CNES descriptions",
            classification.len(),
            facility.len()
        );

        Self {
            classification,
            facility,
            unmapped_label: lookup.unmapped_label.clone(),
            schedule: CompensationSchedule::new(repasse),
        }
    }

    /// Description for a CBO code, after [`clean_code`] normalisation
    pub fn describe_classification(&self, code: &str) -> Option<&str> {
        self.classification.get(&clean_code(code)).map(String::as_str)
    }

    /// Description for a CBO code, or the unmapped label
    pub fn classification_or_unmapped(&self, code: &str) -> &str {
        self.describe_classification(code)
            .unwrap_or(&self.unmapped_label)
    }

    /// Description for a CNES code, after [`digits_only`] normalisation
    pub fn describe_facility(&self, code: &str) -> Option<&str> {
        let digits = digits_only(code);
        if digits.is_empty() {
            return None;
        }
        self.facility.get(&digits).map(String::as_str)
    }

    /// Bucket label for empty or unknown CBO codes
    pub fn unmapped_label(&self) -> &str {
        &self.unmapped_label
    }

    pub fn schedule(&self) -> &CompensationSchedule {
        &self.schedule
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::new(&LookupConfig::default(), &RepasseConfig::default())
    }
}

/// Target compensation by CBO prefix and weekly shift
#[derive(Debug, Clone)]
pub struct CompensationSchedule {
    technical_prefix: String,
    nurse_prefix: String,
    general_base: f64,
    technical: HashMap<i64, f64>,
    nurse: HashMap<i64, f64>,
}

fn rate_map(rates: &[ShiftRate]) -> HashMap<i64, f64> {
    rates
        .iter()
        .map(|rate| (i64::from(rate.hours), rate.value))
        .collect()
}

impl CompensationSchedule {
    pub fn new(config: &RepasseConfig) -> Self {
        Self {
            technical_prefix: config.technical_prefix.clone(),
            nurse_prefix: config.nurse_prefix.clone(),
            general_base: config.general_base,
            technical: rate_map(&config.technical),
            nurse: rate_map(&config.nurse),
        }
    }

    /// Track selected by the CBO code
    ///
    /// Only a blank cell is unclassified; a filled cell without digits uses
    /// the general base.
    pub fn track_for(&self, code: &str) -> CompensationTrack {
        if code.trim().is_empty() {
            return CompensationTrack::Unclassified;
        }

        let cleaned = clean_code(code);
        if cleaned.is_empty() {
            CompensationTrack::General
        } else if cleaned.starts_with(&self.technical_prefix) {
            CompensationTrack::Technical
        } else if cleaned.starts_with(&self.nurse_prefix) {
            CompensationTrack::Nurse
        } else {
            CompensationTrack::General
        }
    }

    /// Target monthly base for a CBO code and shift
    ///
    /// A shift missing from the selected table falls back to the general
    /// base. Rows without a CBO code have no target.
    pub fn target_base(&self, code: &str, shift: i64) -> (CompensationTrack, f64) {
        let track = self.track_for(code);
        let base = match track {
            CompensationTrack::Technical => self.lookup(&self.technical, shift),
            CompensationTrack::Nurse => self.lookup(&self.nurse, shift),
            CompensationTrack::General => self.general_base,
            CompensationTrack::Unclassified => 0.0,
        };
        (track, base)
    }

    fn lookup(&self, table: &HashMap<i64, f64>, shift: i64) -> f64 {
        table.get(&shift).copied().unwrap_or(self.general_base)
    }

    pub fn general_base(&self) -> f64 {
        self.general_base
    }
}
