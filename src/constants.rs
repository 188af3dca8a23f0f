//! Application constants for the CNES analyzer
//!
//! This module contains the default keyword lists, lookup tables, labels and
//! sheet names used throughout the analyzer. Everything here is pure data;
//! [`crate::config::Config`] copies these defaults and lets a TOML file
//! override them.

// =============================================================================
// Column Detection Keywords
// =============================================================================

/// Header keywords for each semantic column, in priority order.
///
/// Matching is a case-insensitive substring test against the uppercased header.
pub mod column_keywords {
    /// Deduplication key (national person id)
    pub const IDENTIFIER: &[&str] = &["CPF", "CNS", "MATRICULA", "MATRÍCULA"];

    /// Occupational classification code
    pub const CLASSIFICATION: &[&str] = &["CBO", "OCUPAÇÃO", "OCUPACAO"];

    /// Employing facility code
    pub const FACILITY: &[&str] = &["CNES", "ESTABELECIMENTO"];

    /// Declared monthly salary
    pub const SALARY: &[&str] = &[
        "SALÁRIO",
        "SALARIO",
        "REMUNERAÇÃO",
        "REMUNERACAO",
        "VENCIMENTO",
    ];

    /// Weekly work-hours (jornada)
    pub const WORK_HOURS: &[&str] = &["JORNADA", "CARGA HORÁRIA", "CARGA HORARIA", "CH SEMANAL"];

    /// Free-text observation
    pub const OBSERVATION: &[&str] = &["OBSERVAÇÃO", "OBSERVACAO", "OBS"];

    /// Professional name, used only to enrich the duplicates sheet
    pub const NAME: &[&str] = &["NOME"];

    /// Tokens that mark the complement column on their own
    pub const COMPLEMENT_MARKERS: &[&str] = &["COMPLEMENTO"];

    /// Token that marks the complement column only together with one of
    /// [`COMPLEMENT_PAIRED_WITH`]
    pub const COMPLEMENT_PAIRED_MARKER: &str = "VALOR";

    /// Companion tokens for [`COMPLEMENT_PAIRED_MARKER`]
    pub const COMPLEMENT_PAIRED_WITH: &[&str] = &["UNIÃO", "UNIAO"];

    /// Zero-based column used for the complement when no header matches
    /// (the 14th column of the standard federal template)
    pub const COMPLEMENT_FALLBACK_INDEX: usize = 13;
}

// =============================================================================
// Header Normalisation
// =============================================================================

/// Label given to blank header cells
pub const EMPTY_HEADER_LABEL: &str = "Coluna Vazia";

/// Prefix for synthetic headers when the whole header row is blank
pub const SYNTHETIC_HEADER_PREFIX: &str = "Coluna";

/// Observation values that do not count as an observation
pub const NON_OBSERVATION_VALUES: &[&str] = &["0", "-"];

// =============================================================================
// Lookup Tables
// =============================================================================

/// Bucket label for rows whose CBO is empty or not in the mapping
pub const UNMAPPED_CLASSIFICATION_LABEL: &str = "CBO Não Mapeado";

/// CBO 2002 codes (first six digits) and their nomenclature
pub const CBO_DESCRIPTIONS: &[(&str, &str)] = &[
    ("223505", "ENFERMEIRO"),
    ("223510", "ENFERMEIRO AUDITOR"),
    ("223530", "ENFERMEIRO DO TRABALHO"),
    ("223545", "ENFERMEIRO OBSTÉTRICO"),
    ("223550", "ENFERMEIRO PSIQUIÁTRICO"),
    ("223560", "ENFERMEIRO SANITARISTA"),
    ("223565", "ENFERMEIRO DA ESTRATÉGIA DE SAÚDE DA FAMÍLIA"),
    ("322205", "TÉCNICO DE ENFERMAGEM"),
    ("322210", "TÉCNICO DE ENFERMAGEM DE TERAPIA INTENSIVA"),
    ("322215", "TÉCNICO DE ENFERMAGEM DO TRABALHO"),
    ("322220", "TÉCNICO DE ENFERMAGEM PSIQUIÁTRICA"),
    ("322230", "AUXILIAR DE ENFERMAGEM"),
    ("322235", "AUXILIAR DE ENFERMAGEM DO TRABALHO"),
    ("322245", "TÉCNICO DE ENFERMAGEM DA ESTRATÉGIA DE SAÚDE DA FAMÍLIA"),
    ("322250", "AUXILIAR DE ENFERMAGEM DA ESTRATÉGIA DE SAÚDE DA FAMÍLIA"),
    ("515110", "ATENDENTE DE ENFERMAGEM"),
    ("515115", "PARTEIRA"),
];

/// Repasse compensation tables
///
/// Monthly values in BRL derived from the national nursing wage floor
/// (44h reference), pro-rated by weekly hours.
pub mod repasse {
    /// CBO prefix selecting the technical table
    pub const TECHNICAL_PREFIX: &str = "3222";

    /// CBO prefix selecting the nurse table
    pub const NURSE_PREFIX: &str = "2235";

    /// Flat base for every other CBO, and for shifts missing from a table
    pub const GENERAL_BASE: f64 = 2375.00;

    /// Technical table: (weekly hours, monthly base)
    pub const TECHNICAL_TABLE: &[(u32, f64)] = &[
        (20, 1511.36),
        (24, 1813.64),
        (30, 2267.05),
        (36, 2720.45),
        (40, 3022.73),
        (44, 3325.00),
    ];

    /// Nurse table: (weekly hours, monthly base)
    pub const NURSE_TABLE: &[(u32, f64)] = &[
        (20, 2159.09),
        (24, 2590.91),
        (30, 3238.64),
        (36, 3886.36),
        (40, 4318.18),
        (44, 4750.00),
    ];
}

// =============================================================================
// Export Layout
// =============================================================================

/// Sheet names of the exported workbook
pub mod sheet_names {
    pub const SUMMARY: &str = "Quadro Resumo";
    pub const RAW_DATA: &str = "Dados Brutos";
    pub const PROJECTION: &str = "Previsão Repasse";
    pub const DUPLICATES: &str = "Duplicados Resumo";
    pub const DUPLICATES_ONLY: &str = "Duplicados";
}

/// Column headers added by the export
pub mod export_headers {
    pub const ROW_NUMBER: &str = "Nº";
    pub const FORMATTED_SUFFIX: &str = "Formatado";
    pub const CBO: &str = "CBO";
    pub const CBO_DESCRIPTION: &str = "Nomenclatura CBO";
    pub const CNES_DESCRIPTION: &str = "Nomenclatura CNES";
    pub const BASE_VALUE: &str = "Valor Base Cálculo";
    pub const COMPLEMENT: &str = "Complemento Calculado";
    pub const TOTAL_ROW_LABEL: &str = "TOTAL GERAL (Mensal):";
    pub const FACILITY_1: &str = "CNES EMPREGADOR 1";
    pub const FACILITY_2: &str = "CNES EMPREGADOR 2";
    pub const FACILITY_1_DESCRIPTION: &str = "Nomenclatura CNES 1";
    pub const TOTAL_COUNT: &str = "Contagem Total";
    pub const DUPLICATES_TO_REMOVE: &str = "Duplicatas a Remover";
}

/// Identifier headers containing this token get a formatted companion column
pub const FORMATTED_IDENTIFIER_TOKEN: &str = "CPF";

/// Default output path (file stem, or directory for CSV) for exported workbooks
pub const DEFAULT_OUTPUT_DIR: &str = "relatorio_completo_saude";

/// Default output path for the duplicates-only workbook
pub const DEFAULT_DUPLICATES_OUTPUT_DIR: &str = "resumo_duplicados";

/// Delimited-text extensions
pub const TEXT_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Binary workbook extensions, read from their first worksheet
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// File extensions the sheet reader can decode
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt", "xlsx", "xlsm", "xls", "ods"];

/// Longest worksheet name an XLSX document accepts
pub const XLSX_SHEET_NAME_LIMIT: usize = 31;

/// Number of duplicate groups shown by the terminal summary by default
pub const DEFAULT_TOP_DUPLICATES: usize = 10;
