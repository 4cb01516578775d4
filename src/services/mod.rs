//! Service layer for decp-budget
//!
//! Table operations (filters, joins, monthly schedules) and the three
//! pipelines built on them. Each pipeline service loads its sources, runs
//! its stages in order and records their row counts in a `RunReport`.

pub mod budget;
pub mod buyers;
pub mod contracts;
pub mod filter;
pub mod join;
pub mod schedule;

pub use budget::BudgetFilterService;
pub use buyers::BuyerCandidateService;
pub use contracts::{ContractOutputs, ContractService};
pub use filter::{Filter, Predicate};
pub use join::{join, normalize_key, JoinMode, JoinOutcome};
pub use schedule::{calculated_end_date, estimated_monthly_payment, MonthlySchedule};

use crate::error::{DecpResult, StageContext};
use crate::models::Table;
use crate::reports::RunReport;

/// Apply a filter as a named stage and record its row counts
pub(crate) fn record_filter(
    report: &mut RunReport,
    stage: &str,
    table: &Table,
    filter: Filter,
) -> DecpResult<Table> {
    let kept = filter.apply(table).stage(stage)?;
    report.record(stage, table.len(), kept.len());
    Ok(kept)
}
