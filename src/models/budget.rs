//! Budget execution ledger and its reference tables
//!
//! Column names are those of the budget directorate's exports and are part
//! of the input contract.

use std::fmt;

/// `Compte budgétaire`: expenditure type code (31, 51, 52, ...)
pub const BUDGET_ACCOUNT: &str = "Compte budgétaire";
/// `Compte général`: control account code, joined to the whitelist
pub const GENERAL_ACCOUNT: &str = "Compte général";
/// Activity reference as named in the ledger
pub const PROGRAMMING_REFERENCE: &str = "Référentiel de programmation";
/// Activity reference as named in the ministry reference table
pub const ACTIVITY_ID: &str = "ID_Activite";
/// Amount in euros
pub const AMOUNT: &str = "EUR";
/// Ministry name in the reference table
pub const MINISTRY: &str = "Ministere";
/// Account column of the control-account whitelist
pub const WHITELIST_ACCOUNT: &str = "Compte";

/// Ledger columns kept for the budget filter
pub const LEDGER_COLUMNS: [&str; 4] = [BUDGET_ACCOUNT, GENERAL_ACCOUNT, PROGRAMMING_REFERENCE, AMOUNT];

/// Reference columns kept for the ministry join
pub const MINISTRY_COLUMNS: [&str; 2] = [ACTIVITY_ID, MINISTRY];

/// Budget account codes with their meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAccount {
    /// 31: operating expenditure
    Operating,
    /// 51: tangible investment
    TangibleInvestment,
    /// 52: intangible investment
    IntangibleInvestment,
}

impl BudgetAccount {
    /// Accounts kept by the budget filter
    pub const PROCUREMENT: [BudgetAccount; 3] = [
        BudgetAccount::Operating,
        BudgetAccount::TangibleInvestment,
        BudgetAccount::IntangibleInvestment,
    ];

    pub fn code(&self) -> i64 {
        match self {
            Self::Operating => 31,
            Self::TangibleInvestment => 51,
            Self::IntangibleInvestment => 52,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::PROCUREMENT.into_iter().find(|a| a.code() == code)
    }

    /// Default codes kept by the budget filter
    pub fn procurement_codes() -> Vec<i64> {
        Self::PROCUREMENT.iter().map(|a| a.code()).collect()
    }
}

impl fmt::Display for BudgetAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Operating => "operating",
            Self::TangibleInvestment => "tangible investment",
            Self::IntangibleInvestment => "intangible investment",
        };
        write!(f, "{} ({})", self.code(), label)
    }
}
