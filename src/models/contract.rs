//! Procurement contracts (DECP register)

use chrono::NaiveDate;

use super::table::Row;
use super::value::Value;
use crate::error::{DecpError, DecpResult};

pub const SOURCE: &str = "source";
pub const CONTRACT_TYPE: &str = "type";
pub const NOTIFICATION_DATE: &str = "dateNotification";
pub const CALCULATED_DURATION: &str = "dureeMoisCalculee";
pub const AMOUNT: &str = "montant";
pub const CALCULATED_AMOUNT: &str = "montantCalcule";
pub const BUYER_ID: &str = "idAcheteur";
pub const BUYER_NAME: &str = "nomAcheteur";

/// Derived: notification date + calculated duration
pub const CALCULATED_END_DATE: &str = "dateFinCalculee";
/// Derived: calculated amount / calculated duration
pub const ESTIMATED_MONTHLY_PAYMENT: &str = "mensualiteEstimee";
/// Derived: sequence number of a contract in the filtered contract table
pub const CONTRACT_KEY: &str = "idLigneMarche";
/// Derived: month of an installment
pub const INSTALLMENT_MONTH: &str = "dt";

/// Register columns kept by the procurement pipelines
pub const REGISTER_COLUMNS: [&str; 25] = [
    SOURCE,
    CONTRACT_TYPE,
    "natureObjetMarche",
    "objetMarche",
    "codeCPV_Original",
    "codeCPV",
    "codeCPV_division",
    "referenceCPV",
    NOTIFICATION_DATE,
    "anneeNotification",
    "moisNotification",
    "datePublicationDonnees",
    "dureeMois",
    "dureeMoisEstimee",
    CALCULATED_DURATION,
    AMOUNT,
    "nombreTitulaireSurMarchePresume",
    CALCULATED_AMOUNT,
    "formePrix",
    "nature",
    "accord-cadrePresume",
    "procedure",
    BUYER_ID,
    "sirenAcheteurValide",
    BUYER_NAME,
];

/// Column positions needed to read contract terms from a row
#[derive(Debug, Clone, Copy)]
pub struct TermColumns {
    pub notification_date: usize,
    pub duration: usize,
    pub calculated_amount: usize,
}

/// The fields of a contract that drive its monthly installments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractTerms {
    pub notification_date: NaiveDate,
    /// Calculated duration in whole months
    pub duration_months: i64,
    /// Calculated amount; None when the register leaves it blank
    pub calculated_amount: Option<f64>,
}

impl ContractTerms {
    /// Read the terms from a contract row
    ///
    /// The row must already have a parsed notification date and a whole,
    /// present duration; anything else means an upstream filter was skipped.
    pub fn from_row(row: &Row, columns: &TermColumns) -> DecpResult<Self> {
        let notification_date = match &row[columns.notification_date] {
            Value::Date(d) => *d,
            Value::Null => {
                return Err(DecpError::Value(format!(
                    "'{}' is missing",
                    NOTIFICATION_DATE
                )))
            }
            other => {
                return Err(DecpError::type_error(
                    NOTIFICATION_DATE,
                    format!("expected a date, found '{}'", other),
                ))
            }
        };

        let duration_cell = &row[columns.duration];
        let duration_months = match duration_cell {
            Value::Null => {
                return Err(DecpError::Value(format!(
                    "'{}' is missing",
                    CALCULATED_DURATION
                )))
            }
            cell => cell.as_whole_number().ok_or_else(|| {
                DecpError::Value(format!(
                    "'{}' must be a whole number of months, found '{}'",
                    CALCULATED_DURATION, cell
                ))
            })?,
        };

        let calculated_amount = match &row[columns.calculated_amount] {
            Value::Null => None,
            cell => Some(cell.as_f64().ok_or_else(|| {
                DecpError::type_error(
                    CALCULATED_AMOUNT,
                    format!("expected a number, found '{}'", cell),
                )
            })?),
        };

        Ok(Self {
            notification_date,
            duration_months,
            calculated_amount,
        })
    }
}
