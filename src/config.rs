//! Configuration management and validation.
//!
//! Provides configuration structures for ingestion, column detection,
//! lookup tables, repasse compensation tables and export layout. The
//! configuration is layered: built-in defaults from [`crate::constants`],
//! then an optional TOML file, then environment variables, and finally CLI
//! overrides applied by the command layer.

use crate::constants::{self, column_keywords, repasse};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the input delimiter
pub const ENV_DELIMITER: &str = "CNES_ANALYZER_DELIMITER";

/// Environment variable overriding the export output path
pub const ENV_OUTPUT: &str = "CNES_ANALYZER_OUTPUT";

/// Global configuration for the analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub columns: ColumnCandidates,
    pub lookup: LookupConfig,
    pub repasse: RepasseConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Spreadsheet ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Field delimiter; auto-detected from the header line when unset
    pub delimiter: Option<char>,

    /// Drop records whose cells are all blank
    pub skip_blank_rows: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            skip_blank_rows: true,
        }
    }
}

/// Header keywords per semantic column, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnCandidates {
    pub identifier: Vec<String>,
    pub classification: Vec<String>,
    pub facility: Vec<String>,
    pub salary: Vec<String>,
    pub work_hours: Vec<String>,
    pub observation: Vec<String>,
    pub name: Vec<String>,
    pub complement: ComplementRule,
}

/// Two-stage detection rule for the complement amount column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplementRule {
    /// Tokens that identify the column on their own
    pub markers: Vec<String>,

    /// Token that identifies the column only with one of `paired_with`
    pub paired_marker: String,

    /// Companion tokens for `paired_marker`
    pub paired_with: Vec<String>,

    /// Zero-based column used when no header matches
    pub fallback_index: Option<usize>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnCandidates {
    fn default() -> Self {
        Self {
            identifier: owned(column_keywords::IDENTIFIER),
            classification: owned(column_keywords::CLASSIFICATION),
            facility: owned(column_keywords::FACILITY),
            salary: owned(column_keywords::SALARY),
            work_hours: owned(column_keywords::WORK_HOURS),
            observation: owned(column_keywords::OBSERVATION),
            name: owned(column_keywords::NAME),
            complement: ComplementRule::default(),
        }
    }
}

impl Default for ComplementRule {
    fn default() -> Self {
        Self {
            markers: owned(column_keywords::COMPLEMENT_MARKERS),
            paired_marker: column_keywords::COMPLEMENT_PAIRED_MARKER.to_string(),
            paired_with: owned(column_keywords::COMPLEMENT_PAIRED_WITH),
            fallback_index: Some(column_keywords::COMPLEMENT_FALLBACK_INDEX),
        }
    }
}

/// Code-to-description lookup data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// CBO code (six digits) to nomenclature; merged over the built-in table
    pub classification_descriptions: BTreeMap<String, String>,

    /// CNES code (digits only) to facility name
    pub facility_descriptions: BTreeMap<String, String>,

    /// Breakdown bucket for empty or unknown CBO codes
    pub unmapped_label: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            classification_descriptions: constants::CBO_DESCRIPTIONS
                .iter()
                .map(|(code, desc)| (code.to_string(), desc.to_string()))
                .collect(),
            facility_descriptions: BTreeMap::new(),
            unmapped_label: constants::UNMAPPED_CLASSIFICATION_LABEL.to_string(),
        }
    }
}

/// One entry of a compensation table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftRate {
    /// Weekly hours (truncated jornada)
    pub hours: u32,
    /// Monthly base value in BRL
    pub value: f64,
}

/// Repasse projection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepasseConfig {
    pub technical_prefix: String,
    pub nurse_prefix: String,
    pub general_base: f64,
    pub technical: Vec<ShiftRate>,
    pub nurse: Vec<ShiftRate>,
}

fn rates(table: &[(u32, f64)]) -> Vec<ShiftRate> {
    table
        .iter()
        .map(|&(hours, value)| ShiftRate { hours, value })
        .collect()
}

impl Default for RepasseConfig {
    fn default() -> Self {
        Self {
            technical_prefix: repasse::TECHNICAL_PREFIX.to_string(),
            nurse_prefix: repasse::NURSE_PREFIX.to_string(),
            general_base: repasse::GENERAL_BASE,
            technical: rates(repasse::TECHNICAL_TABLE),
            nurse: rates(repasse::NURSE_TABLE),
        }
    }
}

/// Output container for exported workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// A single XLSX document with one worksheet per sheet
    Xlsx,
    /// One CSV file per sheet inside the output directory
    Csv,
    /// A single JSON document holding every sheet
    Json,
}

/// Export layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory (CSV) or file path (XLSX, JSON; extension added when missing)
    pub output_path: PathBuf,

    /// Headers left out of the raw-data and projection sheets (case-insensitive)
    pub hidden_columns: Vec<String>,

    pub format: ExportFormat,

    /// Delimiter for exported CSV sheets
    pub csv_delimiter: char,

    /// Overwrite existing output
    pub force_overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            hidden_columns: Vec::new(),
            format: ExportFormat::Xlsx,
            csv_delimiter: ',',
            force_overwrite: false,
        }
    }
}

/// Levels accepted for `logging.level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Logging settings
///
/// `level` applies when neither `-v` nor `-q` is given; `RUST_LOG` still
/// takes precedence over both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default configuration file location (`<config dir>/cnes-analyzer/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cnes-analyzer").join("config.toml"))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration with layered approach (defaults -> file -> env)
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using the supplied lookup
    ///
    /// The lookup is injected so tests do not have to mutate process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DELIMITER) {
            self.ingest.delimiter = Some(parse_delimiter(&value)?);
            debug!("Delimiter overridden from environment: {:?}", value);
        }
        if let Some(value) = lookup(ENV_OUTPUT) {
            self.export.output_path = PathBuf::from(value);
        }
        Ok(())
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(delimiter) = self.ingest.delimiter {
            if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' {
                return Err(Error::configuration(format!(
                    "Invalid input delimiter {:?}: must be a single ASCII character other than quote or newline",
                    delimiter
                )));
            }
        }

        if !self.export.csv_delimiter.is_ascii() || self.export.csv_delimiter == '"' {
            return Err(Error::configuration(format!(
                "Invalid export delimiter {:?}",
                self.export.csv_delimiter
            )));
        }

        let roles = [
            ("identifier", &self.columns.identifier),
            ("classification", &self.columns.classification),
            ("salary", &self.columns.salary),
            ("work_hours", &self.columns.work_hours),
        ];
        for (role, candidates) in roles {
            if candidates.iter().any(|c| c.trim().is_empty()) {
                return Err(Error::configuration(format!(
                    "Column keywords for '{}' must not contain blank entries",
                    role
                )));
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Invalid log level '{}': expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.repasse.technical_prefix.is_empty() || self.repasse.nurse_prefix.is_empty() {
            return Err(Error::configuration(
                "Repasse CBO prefixes must not be empty",
            ));
        }

        if !self.repasse.general_base.is_finite() || self.repasse.general_base < 0.0 {
            return Err(Error::configuration(format!(
                "General base value must be a non-negative number, got {}",
                self.repasse.general_base
            )));
        }

        for (table, rates) in [
            ("technical", &self.repasse.technical),
            ("nurse", &self.repasse.nurse),
        ] {
            if let Some(bad) = rates.iter().find(|r| !r.value.is_finite() || r.value < 0.0) {
                return Err(Error::configuration(format!(
                    "Invalid {} rate for {}h: {}",
                    table, bad.hours, bad.value
                )));
            }
        }

        Ok(())
    }

    /// Create the export output directory if it does not exist
    pub fn ensure_output_directory(&self) -> Result<()> {
        let dir = match self.export.format {
            ExportFormat::Csv => self.export.output_path.as_path(),
            ExportFormat::Xlsx | ExportFormat::Json => match self.export.output_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => return Ok(()),
            },
        };

        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::io(
                    format!("Failed to create output directory '{}'", dir.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Parse a delimiter given as a single character or as a name
pub fn parse_delimiter(value: &str) -> Result<char> {
    match value.trim().to_lowercase().as_str() {
        "tab" | "\\t" => Ok('\t'),
        "comma" => Ok(','),
        "semicolon" => Ok(';'),
        "pipe" => Ok('|'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => Err(Error::configuration(format!(
                    "Delimiter must be a single ASCII character or one of tab/comma/semicolon/pipe, got '{}'",
                    value
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.repasse.technical_prefix, "3222");
        assert_eq!(config.repasse.nurse_prefix, "2235");
        assert_eq!(config.columns.complement.fallback_index, Some(13));
        assert!(config.lookup.classification_descriptions.contains_key("223505"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[ingest]
delimiter = ";"

[export]
hidden_columns = ["COMPETENCIA", "UF"]
"#,
        )
        .unwrap();

        assert_eq!(config.ingest.delimiter, Some(';'));
        assert!(config.ingest.skip_blank_rows);
        assert_eq!(config.export.hidden_columns, vec!["COMPETENCIA", "UF"]);
        assert_eq!(config.columns.identifier[0], "CPF");
        assert_eq!(config.repasse.general_base, 2375.00);
    }

    #[test]
    fn test_repasse_tables_from_toml() {
        let config = Config::from_toml_str(
            r#"
[repasse]
general_base = 1000.0

[[repasse.technical]]
hours = 30
value = 2000.0
"#,
        )
        .unwrap();

        assert_eq!(config.repasse.general_base, 1000.0);
        assert_eq!(
            config.repasse.technical,
            vec![ShiftRate {
                hours: 30,
                value: 2000.0
            }]
        );
        // Untouched table keeps its default
        assert_eq!(config.repasse.nurse.len(), 6);
    }

    #[test]
    fn test_export_format_defaults_to_xlsx() {
        assert_eq!(ExportConfig::default().format, ExportFormat::Xlsx);

        let config = Config::from_toml_str("[export]\nformat = \"csv\"\n").unwrap();
        assert_eq!(config.export.format, ExportFormat::Csv);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = Config::from_toml_str("[ingest\ndelimiter = ").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_load_layered_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = Config::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_DELIMITER, "semicolon"), (ENV_OUTPUT, "/tmp/out")]
            .into_iter()
            .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.ingest.delimiter, Some(';'));
        assert_eq!(config.export.output_path, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let mut config = Config::default();
        config.repasse.nurse.push(ShiftRate {
            hours: 12,
            value: -1.0,
        });
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.repasse.general_base = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), ';');
        assert_eq!(parse_delimiter("tab").unwrap(), '\t');
        assert_eq!(parse_delimiter("Semicolon").unwrap(), ';');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
