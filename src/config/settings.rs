//! Run settings for decp-budget
//!
//! Input and output locations, file dialects and the filter constants of
//! each pipeline. Every field has a default matching the 2020 budget vintage
//! and the `decp_augmente` register, so a partial settings file only needs
//! to name what differs.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::DecpPaths;
use crate::error::DecpError;
use crate::models::{BudgetAccount, NumberFormat};

/// What to do with contracts whose calculated duration is zero months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDurationPolicy {
    /// Drop them before the payment is computed (default)
    #[default]
    Exclude,
    /// Keep them as a single installment carrying the whole amount
    SingleInstallment,
}

/// Dialect of a delimited source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDialect {
    /// Field delimiter
    pub delimiter: char,
    /// Number conventions
    #[serde(default)]
    pub numbers: NumberFormat,
}

impl CsvDialect {
    /// Semicolon-separated, '.' decimals
    pub fn semicolon() -> Self {
        Self {
            delimiter: ';',
            numbers: NumberFormat::default(),
        }
    }

    /// Semicolon-separated, French numbers ("1 234,56")
    pub fn semicolon_french() -> Self {
        Self {
            delimiter: ';',
            numbers: NumberFormat::french(),
        }
    }

    /// Delimiter as a byte for the csv crate
    pub fn delimiter_byte(&self) -> Result<u8, DecpError> {
        ascii_byte(self.delimiter, "delimiter")
    }
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self::semicolon()
    }
}

/// Format of the delimited outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormat {
    /// Field delimiter
    pub delimiter: char,
    /// Decimal separator for decimal cells
    pub decimal_separator: char,
    /// Digits after the decimal separator
    pub precision: usize,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            precision: 3,
        }
    }
}

impl ExportFormat {
    /// Delimiter as a byte for the csv crate
    pub fn delimiter_byte(&self) -> Result<u8, DecpError> {
        ascii_byte(self.delimiter, "export delimiter")
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8, DecpError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(DecpError::Config(format!(
            "{} must be an ASCII character, got '{}'",
            what, c
        )))
    }
}

/// Source files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub budget_ledger: PathBuf,
    pub ministry_reference: PathBuf,
    pub control_accounts: PathBuf,
    pub procurement_register: PathBuf,
    pub buyer_scope: PathBuf,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            budget_ledger: PathBuf::from("data/budget/ZBUD51 budget Etat 2020.csv"),
            ministry_reference: PathBuf::from(
                "data/budget/Copie de RestitCalculReferentiel-20211013_13h13m25s-SUPERADM.xls",
            ),
            control_accounts: PathBuf::from("data/budget/filtresPCE.xlsx"),
            procurement_register: PathBuf::from("data/decp/decp_augmente.csv"),
            buyer_scope: PathBuf::from("data/decp/table corr V2.csv"),
        }
    }
}

/// Dialects of the delimited source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDialects {
    pub budget_ledger: CsvDialect,
    pub procurement_register: CsvDialect,
    pub buyer_scope: CsvDialect,
    /// Used when a reference table is given as a delimited file
    pub reference: CsvDialect,
}

impl Default for InputDialects {
    fn default() -> Self {
        Self {
            budget_ledger: CsvDialect::semicolon_french(),
            procurement_register: CsvDialect::semicolon(),
            buyer_scope: CsvDialect::semicolon(),
            reference: CsvDialect::semicolon(),
        }
    }
}

/// Output files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub budget: PathBuf,
    pub buyer_candidates: PathBuf,
    pub contracts: PathBuf,
    pub installments: PathBuf,
}

impl Default for OutputFiles {
    fn default() -> Self {
        let dir = PathBuf::from("data/decp-budget_clean");
        Self {
            budget: dir.join("budget_civil_fonctionnement_general.csv"),
            buyer_candidates: dir.join("select_acheteurs_grouped.csv"),
            contracts: dir.join("decp_aife_etat_post2018_marche.csv"),
            installments: dir.join("mensualite.csv"),
        }
    }
}

/// Constants of the budget filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetFilterSettings {
    /// Ministry modeled separately and removed from the ledger
    pub excluded_ministry: String,
    /// Budget account codes kept
    pub budget_accounts: Vec<i64>,
}

impl Default for BudgetFilterSettings {
    fn default() -> Self {
        Self {
            excluded_ministry: "Armées".to_string(),
            budget_accounts: BudgetAccount::procurement_codes(),
        }
    }
}

/// Constants of the procurement pipelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementFilterSettings {
    /// Publishing source kept
    pub source: String,
    /// Contract type kept
    pub contract_type: String,
    /// Contracts must be notified strictly after this date
    pub notified_after: NaiveDate,
    /// Buyer-scope flag value meaning "in scope"
    pub scope_flag: String,
    /// Handling of zero-month contracts
    pub zero_duration: ZeroDurationPolicy,
}

impl Default for ProcurementFilterSettings {
    fn default() -> Self {
        Self {
            source: "data.gouv.fr_aife".to_string(),
            contract_type: "Marché".to_string(),
            notified_after: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            scope_flag: "OK".to_string(),
            zero_duration: ZeroDurationPolicy::default(),
        }
    }
}

/// Settings for a decp-budget run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub inputs: InputFiles,

    #[serde(default)]
    pub dialects: InputDialects,

    #[serde(default)]
    pub outputs: OutputFiles,

    #[serde(default)]
    pub export: ExportFormat,

    #[serde(default)]
    pub budget: BudgetFilterSettings,

    #[serde(default)]
    pub procurement: ProcurementFilterSettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            inputs: InputFiles::default(),
            dialects: InputDialects::default(),
            outputs: OutputFiles::default(),
            export: ExportFormat::default(),
            budget: BudgetFilterSettings::default(),
            procurement: ProcurementFilterSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use the defaults if the file doesn't exist
    pub fn load_or_create(paths: &DecpPaths) -> Result<Self, DecpError> {
        let settings_path = paths.settings_file();

        let settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                DecpError::Io(format!(
                    "Failed to read settings file {}: {}",
                    settings_path.display(),
                    e
                ))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                DecpError::Config(format!(
                    "Failed to parse settings file {}: {}",
                    settings_path.display(),
                    e
                ))
            })?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DecpPaths) -> Result<(), DecpError> {
        let settings_path = paths.settings_file();
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DecpError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| DecpError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| DecpError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check dialects and filter constants
    pub fn validate(&self) -> Result<(), DecpError> {
        for dialect in [
            &self.dialects.budget_ledger,
            &self.dialects.procurement_register,
            &self.dialects.buyer_scope,
            &self.dialects.reference,
        ] {
            dialect.delimiter_byte()?;
            if dialect.delimiter == dialect.numbers.decimal_separator {
                return Err(DecpError::Config(format!(
                    "delimiter and decimal separator are both '{}'",
                    dialect.delimiter
                )));
            }
        }

        self.export.delimiter_byte()?;
        if self.export.delimiter == self.export.decimal_separator {
            return Err(DecpError::Config(format!(
                "export delimiter and decimal separator are both '{}'",
                self.export.delimiter
            )));
        }

        if self.budget.budget_accounts.is_empty() {
            return Err(DecpError::Config(
                "at least one budget account code must be kept".into(),
            ));
        }

        Ok(())
    }
}
