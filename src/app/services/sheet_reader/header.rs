//! Header row normalisation
//!
//! Produces a unique, non-blank header sequence from the raw first record.

use crate::constants::{EMPTY_HEADER_LABEL, SYNTHETIC_HEADER_PREFIX};
use std::collections::HashSet;

/// Normalise raw header cells
///
/// - cells are trimmed
/// - a fully blank header row becomes `Coluna 1 .. Coluna N`
/// - blank cells become `Coluna Vazia`
/// - repeated names get ` (2)`, ` (3)` ... suffixes
pub fn normalize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let trimmed: Vec<&str> = raw
        .iter()
        .map(|h| h.as_ref().trim_start_matches('\u{feff}').trim())
        .collect();

    if trimmed.iter().all(|h| h.is_empty()) {
        return (1..=trimmed.len())
            .map(|n| format!("{} {}", SYNTHETIC_HEADER_PREFIX, n))
            .collect();
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(trimmed.len());
    let mut headers = Vec::with_capacity(trimmed.len());

    for header in trimmed {
        let base = if header.is_empty() {
            EMPTY_HEADER_LABEL
        } else {
            header
        };

        let mut name = base.to_string();
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("{} ({})", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}
