//! Contract end dates, monthly payments and installment schedules
//!
//! Months are added with calendar arithmetic: the day of month is kept and
//! clamped to the last valid day when the target month is shorter
//! (2020-01-31 + 1 month = 2020-02-29).

use chrono::{Months, NaiveDate};

use crate::error::{DecpError, DecpResult};
use crate::models::{ContractTerms, MonthlyInstallment};

fn add_months(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

fn whole_months(duration_months: i64) -> DecpResult<u32> {
    u32::try_from(duration_months).map_err(|_| {
        DecpError::Value(format!(
            "duration must be a non-negative number of months, got {}",
            duration_months
        ))
    })
}

/// Notification date plus the calculated duration
pub fn calculated_end_date(notification_date: NaiveDate, duration_months: i64) -> DecpResult<NaiveDate> {
    let months = whole_months(duration_months)?;
    add_months(notification_date, months).ok_or_else(|| {
        DecpError::Value(format!(
            "{} + {} months is out of the supported date range",
            notification_date, months
        ))
    })
}

/// Calculated amount spread evenly over the duration
pub fn estimated_monthly_payment(calculated_amount: f64, duration_months: i64) -> DecpResult<f64> {
    if duration_months == 0 {
        return Err(DecpError::DivisionByZero(format!(
            "monthly payment of {} over a duration of 0 months",
            calculated_amount
        )));
    }
    Ok(calculated_amount / duration_months as f64)
}

/// Installments of one contract, from its notification month to its end month
///
/// Step `k` falls on the notification date plus `k` months, so clamping in a
/// short month never carries over to the following ones. The schedule is
/// consumed as it is iterated and cannot be restarted.
#[derive(Debug)]
pub struct MonthlySchedule {
    start: NaiveDate,
    end: NaiveDate,
    payment: Option<f64>,
    step: u32,
    done: bool,
}

impl MonthlySchedule {
    /// Schedule between two dates (inclusive), empty when `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate, payment: Option<f64>) -> Self {
        Self {
            start,
            end,
            payment,
            step: 0,
            done: end < start,
        }
    }

    /// Schedule of a contract whose payment is computed from its terms
    ///
    /// A zero-month duration has no payment; use [`MonthlySchedule::single`]
    /// to keep such a contract as one installment.
    pub fn for_contract(terms: &ContractTerms) -> DecpResult<Self> {
        let end = calculated_end_date(terms.notification_date, terms.duration_months)?;
        let payment = terms
            .calculated_amount
            .map(|amount| estimated_monthly_payment(amount, terms.duration_months))
            .transpose()?;
        Ok(Self::new(terms.notification_date, end, payment))
    }

    /// A single installment carrying the whole amount
    pub fn single(date: NaiveDate, amount: Option<f64>) -> Self {
        Self::new(date, date, amount)
    }

    /// Last installment date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Payment carried by every installment
    pub fn payment(&self) -> Option<f64> {
        self.payment
    }
}

impl Iterator for MonthlySchedule {
    type Item = MonthlyInstallment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match add_months(self.start, self.step) {
            Some(month) if month <= self.end => {
                self.step += 1;
                Some(MonthlyInstallment {
                    month,
                    estimated_payment: self.payment,
                })
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for MonthlySchedule {}
