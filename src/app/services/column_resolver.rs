//! Column role detection from header names
//!
//! Registration spreadsheets come from many municipal systems, each with its
//! own header wording. Roles are detected with ordered keyword lists: for a
//! role with keywords `[k1, k2, ...]`, every header is tested against `k1`
//! first (in header order), then against `k2`, and so on. The first hit wins.
//!
//! The complement amount column has its own rule, see [`resolve_complement_column`].

use crate::app::models::{ColumnRole, RoleMap};
use crate::config::{ColumnCandidates, ComplementRule};
use tracing::{debug, warn};

/// Find the first header matching the highest-priority keyword
///
/// Matching is a substring test on the uppercased header and keyword, so
/// `"Nº CPF do Profissional"` matches `"cpf"`.
pub fn resolve_column<S: AsRef<str>>(headers: &[String], candidates: &[S]) -> Option<String> {
    let upper_headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();

    for candidate in candidates {
        let needle = candidate.as_ref().to_uppercase();
        if needle.is_empty() {
            continue;
        }
        if let Some(index) = upper_headers.iter().position(|h| h.contains(&needle)) {
            return Some(headers[index].clone());
        }
    }

    None
}

/// Find the complement amount column
///
/// Stage one takes the first header (in header order) that contains one of
/// the standalone markers, or the paired marker together with one of its
/// companions (e.g. `"VALOR UNIÃO"`). Stage two falls back to a fixed column
/// position when the sheet is wide enough, whatever that header is called.
pub fn resolve_complement_column(headers: &[String], rule: &ComplementRule) -> Option<String> {
    let markers: Vec<String> = rule
        .markers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_uppercase())
        .collect();
    let paired_marker = rule.paired_marker.to_uppercase();
    let paired_with: Vec<String> = rule
        .paired_with
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_uppercase())
        .collect();

    let matched = headers.iter().find(|header| {
        let upper = header.to_uppercase();
        markers.iter().any(|m| upper.contains(m.as_str()))
            || (!paired_marker.is_empty()
                && upper.contains(&paired_marker)
                && paired_with.iter().any(|m| upper.contains(m.as_str())))
    });

    if let Some(header) = matched {
        return Some(header.clone());
    }

    let index = rule.fallback_index?;
    let fallback = headers.get(index).cloned();
    if let Some(header) = &fallback {
        debug!(
            "Complement column not found by name, using column {} ('{}')",
            index + 1,
            header
        );
    }
    fallback
}

/// Resolve every semantic role for a header sequence
pub fn resolve_roles(headers: &[String], candidates: &ColumnCandidates) -> RoleMap {
    let mut roles = RoleMap::new();

    let keyword_roles: [(ColumnRole, &[String]); 6] = [
        (ColumnRole::Identifier, &candidates.identifier),
        (ColumnRole::Classification, &candidates.classification),
        (ColumnRole::Facility, &candidates.facility),
        (ColumnRole::Salary, &candidates.salary),
        (ColumnRole::WorkHours, &candidates.work_hours),
        (ColumnRole::Observation, &candidates.observation),
    ];

    for (role, keywords) in keyword_roles {
        match resolve_column(headers, keywords) {
            Some(header) => {
                debug!("Resolved {} column: '{}'", role.label(), header);
                roles.set(role, header);
            }
            None => debug!("No column found for {}", role.label()),
        }
    }

    // The name only decorates the duplicates sheet next to the identifier, so
    // the identifier's own header never doubles as the name
    let identifier = roles.get(ColumnRole::Identifier).map(str::to_string);
    let name_headers: Vec<String> = headers
        .iter()
        .filter(|h| identifier.as_deref() != Some(h.as_str()))
        .cloned()
        .collect();
    match resolve_column(&name_headers, &candidates.name) {
        Some(header) => {
            debug!("Resolved {} column: '{}'", ColumnRole::Name.label(), header);
            roles.set(ColumnRole::Name, header);
        }
        None => debug!("No column found for {}", ColumnRole::Name.label()),
    }

    if let Some(header) = resolve_complement_column(headers, &candidates.complement) {
        debug!("Resolved complement column: '{}'", header);
        roles.set(ColumnRole::Complement, header);
    }

    if roles.get(ColumnRole::Identifier).is_none() {
        warn!("No identifier column found; duplicate detection is disabled");
    }

    roles
}
