//! Monthly installment of a contract

use chrono::{Datelike, NaiveDate};

/// One (contract month, estimated payment) pair
///
/// The payment is the same for every month of a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyInstallment {
    /// Date within the month (notification day, clamped to month end)
    pub month: NaiveDate,
    /// Estimated payment for the month; None when the amount is unknown
    pub estimated_payment: Option<f64>,
}

impl MonthlyInstallment {
    /// Calendar month label, e.g. "2019-03"
    pub fn month_label(&self) -> String {
        format!("{:04}-{:02}", self.month.year(), self.month.month())
    }
}
