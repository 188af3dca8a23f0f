//! Sheet layouts for the exported workbooks
//!
//! The full workbook holds the summary, the enriched raw data, the repasse
//! projection (when one exists) and the duplicate groups (when any exist).
//! The duplicates-only workbook holds a single duplicates sheet.

use crate::app::models::{AnalysisReport, CellValue, ColumnRole, Dataset, Row};
use crate::app::services::lookup_tables::LookupTables;
use crate::app::services::value_normalizer::format_identifier;
use crate::constants::{FORMATTED_IDENTIFIER_TOKEN, export_headers, sheet_names};

use super::workbook::{Sheet, Workbook};

const SUMMARY_TITLE: &str = "Quadro Resumo de Profissionais";
const SUMMARY_HEADER: [&str; 3] = ["Métrica", "Valor", "Observação"];
const BREAKDOWN_TITLE: &str = "Distribuição por CBO";
const BREAKDOWN_HEADER: [&str; 3] = ["Nomenclatura", "Contagem", "Porcentagem"];

/// Builds sheets for one analysed dataset
#[derive(Debug, Clone, Copy)]
pub struct SheetBuilder<'a> {
    dataset: &'a Dataset,
    report: &'a AnalysisReport,
    tables: &'a LookupTables,
    hidden_columns: &'a [String],
}

impl<'a> SheetBuilder<'a> {
    pub fn new(
        dataset: &'a Dataset,
        report: &'a AnalysisReport,
        tables: &'a LookupTables,
        hidden_columns: &'a [String],
    ) -> Self {
        Self {
            dataset,
            report,
            tables,
            hidden_columns,
        }
    }

    /// Summary, raw data, projection and duplicates sheets
    pub fn full_workbook(&self) -> Workbook {
        let mut workbook = Workbook::new();
        workbook.push(self.summary_sheet());
        workbook.push(self.raw_data_sheet());
        if let Some(sheet) = self.projection_sheet() {
            workbook.push(sheet);
        }
        if let Some(sheet) = self.duplicates_sheet(sheet_names::DUPLICATES, true) {
            workbook.push(sheet);
        }
        workbook
    }

    /// Duplicates sheet only; empty when there are no duplicate groups
    pub fn duplicates_workbook(&self) -> Workbook {
        let mut workbook = Workbook::new();
        if let Some(sheet) = self.duplicates_sheet(sheet_names::DUPLICATES_ONLY, false) {
            workbook.push(sheet);
        }
        workbook
    }

    /// Metric table followed by the CBO distribution
    pub fn summary_sheet(&self) -> Sheet {
        let metrics = &self.report.metrics;
        let mut sheet = Sheet::new(sheet_names::SUMMARY);

        sheet.push_text_row(&[SUMMARY_TITLE, "", ""]);
        sheet.push_row(vec![CellValue::Empty]);
        sheet.push_text_row(&SUMMARY_HEADER);

        let rows: [(&str, CellValue, &str); 7] = [
            (
                "Total de Registros",
                metrics.total_rows.into(),
                "Total de linhas no arquivo.",
            ),
            (
                "Profissionais Cadastrados (Sem Duplicidades)",
                metrics.unique_records.into(),
                "Número total de CPFs/IDs distintos (Profissionais Efetivos).",
            ),
            (
                "Registros Duplicados",
                metrics.duplicate_keys_count.into(),
                "Número de CPFs/IDs que aparecem mais de uma vez.",
            ),
            (
                "Registros Extras (a Remover)",
                metrics.total_extra_duplicates.into(),
                "Total de linhas em excesso que precisam ser limpas.",
            ),
            (
                "Valor Total do Complemento",
                metrics.total_complement_loaded.into(),
                "Soma da coluna de complemento original.",
            ),
            (
                "Registros com Observação",
                metrics.records_with_observation.into(),
                "Total de linhas que possuem valor na coluna de observação.",
            ),
            (
                "Registros Validados",
                CellValue::Number(metrics.validated_records as f64),
                "Total de registros subtraindo os que possuem observação.",
            ),
        ];
        for (label, value, note) in rows {
            sheet.push_row(vec![CellValue::text(label), value, CellValue::text(note)]);
        }

        sheet.push_row(vec![CellValue::Empty]);
        sheet.push_text_row(&[BREAKDOWN_TITLE, "", ""]);
        sheet.push_text_row(&BREAKDOWN_HEADER);
        for item in &self.report.breakdown {
            sheet.push_row(vec![
                CellValue::text(item.description.clone()),
                item.count.into(),
                CellValue::text(format!("{}%", item.percentage)),
            ]);
        }

        sheet
    }

    /// Every visible input column plus formatted and description columns
    pub fn raw_data_sheet(&self) -> Sheet {
        let visible = self.visible_columns();
        let identifier = self.formatted_identifier_column();
        let classification = self.dataset.role_index(ColumnRole::Classification);
        let facility = self.dataset.role_index(ColumnRole::Facility);

        let mut header = vec![export_headers::ROW_NUMBER.to_string()];
        header.extend(visible.iter().map(|&i| self.dataset.headers()[i].clone()));
        if let Some((_, name)) = &identifier {
            header.push(name.clone());
        }
        if classification.is_some() {
            header.push(export_headers::CBO_DESCRIPTION.to_string());
        }
        if facility.is_some() {
            header.push(export_headers::CNES_DESCRIPTION.to_string());
        }

        let mut sheet = Sheet::new(sheet_names::RAW_DATA);
        sheet.push_text_row(&header);

        for (position, row) in self.dataset.rows().iter().enumerate() {
            let mut cells = vec![CellValue::from(position + 1)];
            cells.extend(visible.iter().map(|&i| row.cell(i).clone()));
            if let Some((index, _)) = &identifier {
                cells.push(CellValue::text(format_identifier(&row.cell(*index).trimmed())));
            }
            if let Some(index) = classification {
                cells.push(CellValue::text(self.classification_description(row, index)));
            }
            if let Some(index) = facility {
                let code = row.cell(index).trimmed();
                cells.push(CellValue::text(
                    self.tables.describe_facility(&code).unwrap_or_default(),
                ));
            }
            sheet.push_row(cells);
        }

        sheet
    }

    /// Visible input columns plus target base and complement, with a total row
    pub fn projection_sheet(&self) -> Option<Sheet> {
        let projection = self.report.projection.as_ref()?;
        let visible = self.visible_columns();

        let mut header: Vec<String> = visible
            .iter()
            .map(|&i| self.dataset.headers()[i].clone())
            .collect();
        header.push(export_headers::BASE_VALUE.to_string());
        header.push(export_headers::COMPLEMENT.to_string());
        let width = header.len();

        let mut sheet = Sheet::new(sheet_names::PROJECTION);
        sheet.push_text_row(&header);

        for projected in &projection.rows {
            let row = &self.dataset.rows()[projected.row_index];
            let mut cells: Vec<CellValue> = visible.iter().map(|&i| row.cell(i).clone()).collect();
            cells.push(money(projected.target_base));
            cells.push(money(projected.shortfall));
            sheet.push_row(cells);
        }

        let mut total = vec![CellValue::Empty; width];
        total[0] = CellValue::text(export_headers::TOTAL_ROW_LABEL);
        total[width - 1] = money(projection.total_shortfall);
        sheet.push_row(total);

        Some(sheet)
    }

    /// One row per duplicate group, built from the group's first row
    ///
    /// `with_facility_description` adds the facility name of the first
    /// employer, as in the full export.
    pub fn duplicates_sheet(&self, name: &str, with_facility_description: bool) -> Option<Sheet> {
        if self.report.duplicates.is_empty() {
            return None;
        }

        let identifier = self.dataset.role_index(ColumnRole::Identifier);
        let formatted = self.formatted_identifier_column();
        let person = self.dataset.role_index(ColumnRole::Name);
        let classification = self.dataset.role_index(ColumnRole::Classification);

        let mut header = vec![export_headers::ROW_NUMBER.to_string()];
        if let Some(index) = identifier {
            header.push(self.dataset.headers()[index].clone());
        }
        if let Some((_, formatted_name)) = &formatted {
            header.push(formatted_name.clone());
        }
        if let Some(index) = person {
            header.push(self.dataset.headers()[index].clone());
        }
        if classification.is_some() {
            header.push(export_headers::CBO.to_string());
            header.push(export_headers::CBO_DESCRIPTION.to_string());
        }
        header.push(export_headers::FACILITY_1.to_string());
        header.push(export_headers::FACILITY_2.to_string());
        if with_facility_description {
            header.push(export_headers::FACILITY_1_DESCRIPTION.to_string());
        }
        header.push(export_headers::TOTAL_COUNT.to_string());
        header.push(export_headers::DUPLICATES_TO_REMOVE.to_string());

        let mut sheet = Sheet::new(name);
        sheet.push_text_row(&header);

        for (position, group) in self.report.duplicates.iter().enumerate() {
            let row = &group.representative_row;
            let mut cells = vec![CellValue::from(position + 1)];
            if let Some(index) = identifier {
                cells.push(row.cell(index).clone());
            }
            if let Some((index, _)) = &formatted {
                cells.push(CellValue::text(format_identifier(&row.cell(*index).trimmed())));
            }
            if let Some(index) = person {
                cells.push(row.cell(index).clone());
            }
            if let Some(index) = classification {
                cells.push(row.cell(index).clone());
                cells.push(CellValue::text(self.classification_description(row, index)));
            }
            cells.push(CellValue::text(group.facility_1.clone()));
            cells.push(CellValue::text(group.facility_2.clone()));
            if with_facility_description {
                cells.push(CellValue::text(
                    self.tables
                        .describe_facility(&group.facility_1)
                        .unwrap_or_default(),
                ));
            }
            cells.push(group.total_count.into());
            cells.push(group.duplicates_to_clean.into());
            sheet.push_row(cells);
        }

        Some(sheet)
    }

    /// Positions of input columns not on the hide list (case-insensitive)
    fn visible_columns(&self) -> Vec<usize> {
        let hidden: Vec<String> = self
            .hidden_columns
            .iter()
            .map(|h| h.trim().to_uppercase())
            .collect();

        self.dataset
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, header)| !hidden.contains(&header.to_uppercase()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Identifier column position and formatted-column name, when the
    /// identifier header names a CPF
    fn formatted_identifier_column(&self) -> Option<(usize, String)> {
        let header = self.dataset.roles().get(ColumnRole::Identifier)?;
        if !header.to_uppercase().contains(FORMATTED_IDENTIFIER_TOKEN) {
            return None;
        }
        let index = self.dataset.column_index(header)?;
        Some((
            index,
            format!("{} {}", header, export_headers::FORMATTED_SUFFIX),
        ))
    }

    fn classification_description(&self, row: &Row, index: usize) -> String {
        self.tables
            .describe_classification(&row.cell(index).trimmed())
            .unwrap_or_default()
            .to_string()
    }
}

/// Monetary value with two decimals
fn money(value: f64) -> CellValue {
    CellValue::text(format!("{:.2}", value))
}
