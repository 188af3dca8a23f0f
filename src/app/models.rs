//! Data models for registration-record analysis
//!
//! This module contains the core data structures: cell values, header-indexed
//! rows and datasets, the semantic role map, and the result types produced by
//! the analysis engine and the repasse projection.

use crate::app::services::column_resolver::resolve_roles;
use crate::config::ColumnCandidates;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Cells and Rows
// =============================================================================

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Textual cell, kept exactly as read
    Text(String),
    /// Numeric cell (typed by the container, or produced by the export)
    Number(f64),
    /// Missing cell
    #[default]
    Empty,
}

impl CellValue {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Render the cell as text (`Empty` renders as an empty string)
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Empty => String::new(),
        }
    }

    /// Trimmed text rendering
    pub fn trimmed(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            other => other.as_text(),
        }
    }

    /// Whether the cell is missing or holds only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
            Self::Empty => true,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

/// Shortest text form of a number: integral values print without a fraction
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data record, with cells aligned to the dataset header sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    /// Create a row from cells in header order
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at a column position; positions past the end read as `Empty`
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// All cells in header order
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row stores no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// =============================================================================
// Column Roles
// =============================================================================

/// Semantic meaning of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Deduplication key (CPF)
    Identifier,
    /// Occupational classification code (CBO)
    Classification,
    /// Employing facility code (CNES)
    Facility,
    /// Declared salary
    Salary,
    /// Weekly work-hours (jornada)
    WorkHours,
    /// Complement amount loaded from the input
    Complement,
    /// Free-text observation
    Observation,
    /// Professional name
    Name,
}

impl ColumnRole {
    /// Every role, in display order
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::Identifier,
        ColumnRole::Classification,
        ColumnRole::Facility,
        ColumnRole::Salary,
        ColumnRole::WorkHours,
        ColumnRole::Complement,
        ColumnRole::Observation,
        ColumnRole::Name,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::Identifier => "identifier (CPF)",
            ColumnRole::Classification => "classification (CBO)",
            ColumnRole::Facility => "facility (CNES)",
            ColumnRole::Salary => "salary",
            ColumnRole::WorkHours => "work hours",
            ColumnRole::Complement => "complement",
            ColumnRole::Observation => "observation",
            ColumnRole::Name => "name",
        }
    }
}

/// Resolved header name per semantic role
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleMap {
    roles: HashMap<ColumnRole, String>,
}

impl RoleMap {
    /// Create an empty role map
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a header to a role
    pub fn set(&mut self, role: ColumnRole, header: impl Into<String>) {
        self.roles.insert(role, header.into());
    }

    /// Builder-style assignment
    pub fn with(mut self, role: ColumnRole, header: impl Into<String>) -> Self {
        self.set(role, header);
        self
    }

    /// Header resolved for a role, if any
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    /// Whether every listed role is resolved
    pub fn has_all(&self, roles: &[ColumnRole]) -> bool {
        roles.iter().all(|role| self.roles.contains_key(role))
    }

    /// Number of resolved roles
    pub fn resolved_count(&self) -> usize {
        self.roles.len()
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// An ingested spreadsheet: unique headers, rows and the resolved role map
///
/// Constructed once at ingestion and read-only thereafter.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    header_index: HashMap<String, usize>,
    rows: Vec<Row>,
    roles: RoleMap,
}

impl Dataset {
    /// Create a dataset, resolving column roles from the header names
    pub fn new(headers: Vec<String>, rows: Vec<Row>, candidates: &ColumnCandidates) -> Result<Self> {
        let roles = resolve_roles(&headers, candidates);
        Self::with_roles(headers, rows, roles)
    }

    /// Create a dataset with an explicit role map
    ///
    /// Fails when the headers are not unique or when a role points at a
    /// header that is not part of the header sequence.
    pub fn with_roles(headers: Vec<String>, rows: Vec<Row>, roles: RoleMap) -> Result<Self> {
        let mut header_index = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            if header_index.insert(header.clone(), index).is_some() {
                return Err(Error::data_validation(format!(
                    "Duplicate header '{}'",
                    header
                )));
            }
        }

        for role in ColumnRole::ALL {
            if let Some(header) = roles.get(role) {
                if !header_index.contains_key(header) {
                    return Err(Error::data_validation(format!(
                        "Column '{}' resolved for {} is not a dataset header",
                        header,
                        role.label()
                    )));
                }
            }
        }

        Ok(Self {
            headers,
            header_index,
            rows,
            roles,
        })
    }

    /// Header names in column order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows in input order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The resolved role map
    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    /// Column position of a header (O(1))
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.header_index.get(header).copied()
    }

    /// Column position of the header resolved for a role
    pub fn role_index(&self, role: ColumnRole) -> Option<usize> {
        self.roles.get(role).and_then(|h| self.column_index(h))
    }

    /// Cell of `row` under `header`
    pub fn value<'a>(&self, row: &'a Row, header: &str) -> Option<&'a CellValue> {
        self.column_index(header).map(|index| row.cell(index))
    }

    /// Cell of `row` in the column resolved for `role`
    pub fn role_value<'a>(&self, row: &'a Row, role: ColumnRole) -> Option<&'a CellValue> {
        self.role_index(role).map(|index| row.cell(index))
    }
}

// =============================================================================
// Analysis Results
// =============================================================================

/// Identifiers that occur more than once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// Normalised (trimmed) identifier value
    pub key: String,
    /// Position of the first row carrying this identifier
    pub representative_index: usize,
    /// The first row carrying this identifier
    pub representative_row: Row,
    /// Number of rows carrying this identifier (always >= 2)
    pub total_count: usize,
    /// Rows to remove to keep one (`total_count - 1`)
    pub duplicates_to_clean: usize,
    /// First distinct non-empty facility code in the group
    pub facility_1: String,
    /// Second distinct non-empty facility code in the group
    pub facility_2: String,
}

/// Row count for one CBO description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownItem {
    pub key: String,
    pub description: String,
    pub count: usize,
    /// Share of total rows, one fraction digit (e.g. "37.5")
    pub percentage: String,
}

/// Aggregates derived in one pass over the dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisMetrics {
    pub total_rows: usize,
    /// Distinct non-empty identifiers
    pub unique_records: usize,
    /// Identifiers seen at least twice
    pub duplicate_keys_count: usize,
    /// Rows beyond the first per duplicated identifier
    pub total_extra_duplicates: usize,
    /// Sum of the complement column
    pub total_complement_loaded: f64,
    pub records_with_observation: usize,
    /// `total_rows - records_with_observation`
    pub validated_records: i64,
}

/// Which compensation table a row is priced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationTrack {
    Technical,
    Nurse,
    General,
    /// No CBO code: target base is zero
    Unclassified,
}

/// Repasse projection for one input row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub row_index: usize,
    /// Weekly hours truncated toward zero
    pub shift: i64,
    pub declared_salary: f64,
    pub track: CompensationTrack,
    pub target_base: f64,
    /// `max(0, target_base - declared_salary)`
    pub shortfall: f64,
}

/// Repasse projection for the whole dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Projection {
    pub rows: Vec<ProjectionRow>,
    /// Sum of every row's shortfall
    pub total_shortfall: f64,
}

/// Everything the analysis produces for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metrics: AnalysisMetrics,
    pub duplicates: Vec<DuplicateGroup>,
    pub breakdown: Vec<BreakdownItem>,
    /// Omitted when identifier, CBO, salary or jornada is unresolved
    pub projection: Option<Projection>,
}
