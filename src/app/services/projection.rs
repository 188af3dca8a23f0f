//! Repasse projection
//!
//! For each row, computes the target monthly base from the CBO code and the
//! weekly shift, and the complement (shortfall) the declared salary would
//! need to reach it. Requires the identifier, CBO, salary and jornada
//! columns; without any of them no projection is produced at all.

use crate::app::models::{ColumnRole, Dataset, Projection, ProjectionRow};
use crate::app::services::lookup_tables::CompensationSchedule;
use crate::app::services::value_normalizer::parse_currency;
use tracing::{debug, info};

/// Roles that must be resolved for a projection
pub const REQUIRED_ROLES: [ColumnRole; 4] = [
    ColumnRole::Identifier,
    ColumnRole::Classification,
    ColumnRole::Salary,
    ColumnRole::WorkHours,
];

/// Applies the compensation schedule to a dataset
#[derive(Debug, Clone, Copy)]
pub struct ProjectionCalculator<'a> {
    schedule: &'a CompensationSchedule,
}

impl<'a> ProjectionCalculator<'a> {
    pub fn new(schedule: &'a CompensationSchedule) -> Self {
        Self { schedule }
    }

    /// Project every row, or `None` when a required column is missing
    pub fn project(&self, dataset: &Dataset) -> Option<Projection> {
        if !dataset.roles().has_all(&REQUIRED_ROLES) {
            let missing: Vec<&str> = REQUIRED_ROLES
                .iter()
                .filter(|role| dataset.roles().get(**role).is_none())
                .map(|role| role.label())
                .collect();
            debug!("Skipping repasse projection, missing: {}", missing.join(", "));
            return None;
        }

        let classification = dataset.role_index(ColumnRole::Classification)?;
        let salary = dataset.role_index(ColumnRole::Salary)?;
        let hours = dataset.role_index(ColumnRole::WorkHours)?;

        let mut rows = Vec::with_capacity(dataset.row_count());
        let mut total_shortfall = 0.0;

        for (row_index, row) in dataset.rows().iter().enumerate() {
            let declared_salary = parse_currency(row.cell(salary));
            let shift = parse_currency(row.cell(hours)).trunc() as i64;
            let code = row.cell(classification).trimmed();

            let (track, target_base) = self.schedule.target_base(&code, shift);
            let shortfall = (target_base - declared_salary).max(0.0);
            total_shortfall += shortfall;

            rows.push(ProjectionRow {
                row_index,
                shift,
                declared_salary,
                track,
                target_base,
                shortfall,
            });
        }

        info!(
            "Repasse projection: {} rows, total complement {:.2}",
            rows.len(),
            total_shortfall
        );

        Some(Projection {
            rows,
            total_shortfall,
        })
    }
}
