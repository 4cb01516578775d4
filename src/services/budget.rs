//! Budget filter pipeline
//!
//! Keeps the civil-state procurement spend of the budget execution ledger:
//! every ministry except the excluded one, budget accounts 31/51/52, and
//! control accounts present in the whitelist.

use std::collections::HashMap;

use tracing::debug;

use super::filter::{Filter, Predicate};
use super::join::{join, normalize_key, JoinMode};
use super::record_filter;
use crate::config::{DecpPaths, Settings};
use crate::error::{DecpError, DecpResult, StageContext};
use crate::export::write_delimited_file;
use crate::import::{read_delimited_file, read_reference};
use crate::models::budget::{
    ACTIVITY_ID, AMOUNT, BUDGET_ACCOUNT, GENERAL_ACCOUNT, LEDGER_COLUMNS, MINISTRY,
    MINISTRY_COLUMNS, PROGRAMMING_REFERENCE, WHITELIST_ACCOUNT,
};
use crate::models::{ColumnType, Table, Value};
use crate::reports::RunReport;

/// Service running the budget filter
pub struct BudgetFilterService<'a> {
    paths: &'a DecpPaths,
    settings: &'a Settings,
}

impl<'a> BudgetFilterService<'a> {
    /// Create a new budget filter service
    pub fn new(paths: &'a DecpPaths, settings: &'a Settings) -> Self {
        Self { paths, settings }
    }

    /// Load the sources, filter them and write the output
    pub fn run(&self) -> DecpResult<RunReport> {
        let mut report = RunReport::new("budget");
        let inputs = &self.settings.inputs;
        let dialects = &self.settings.dialects;

        let ledger = read_delimited_file(
            "budget ledger",
            &self.paths.resolve(&inputs.budget_ledger),
            &dialects.budget_ledger,
        )
        .stage("load budget ledger")?;
        report.record("load budget ledger", 0, ledger.len());

        let ministries = read_reference(
            "ministry reference",
            &self.paths.resolve(&inputs.ministry_reference),
            &dialects.reference,
        )
        .stage("load ministry reference")?;
        report.record("load ministry reference", 0, ministries.len());

        let whitelist = read_reference(
            "control accounts",
            &self.paths.resolve(&inputs.control_accounts),
            &dialects.reference,
        )
        .stage("load control accounts")?;
        report.record("load control accounts", 0, whitelist.len());

        let output = self.process(ledger, &ministries, whitelist, &mut report)?;

        let path = self.paths.resolve(&self.settings.outputs.budget);
        write_delimited_file(&output, &path, &self.settings.export).stage("export budget")?;
        report.add_output(path);

        report.finish();
        Ok(report)
    }

    /// Apply the budget filter to loaded tables
    pub fn process(
        &self,
        ledger: Table,
        ministries: &Table,
        whitelist: Table,
        report: &mut RunReport,
    ) -> DecpResult<Table> {
        let filters = &self.settings.budget;
        let numbers = &self.settings.dialects.budget_ledger.numbers;

        let ledger = ledger
            .select(&LEDGER_COLUMNS)
            .and_then(|t| {
                t.coerce_all(
                    &[(BUDGET_ACCOUNT, ColumnType::Integer), (AMOUNT, ColumnType::Decimal)],
                    numbers,
                )
            })
            .and_then(|t| t.rename(PROGRAMMING_REFERENCE, ACTIVITY_ID))
            .stage("prepare ledger")?;

        let ministries = distinct_ministries(ministries).stage("prepare ministry reference")?;

        let rows_in = ledger.len();
        let joined = join(&ledger, &ministries, &[ACTIVITY_ID], JoinMode::Left)
            .stage("attach ministry")?;
        if joined.unmatched > 0 {
            debug!(
                unmatched = joined.unmatched,
                sample = ?joined.unmatched_keys,
                "ledger rows without a ministry"
            );
        }
        report.record_with_note(
            "attach ministry",
            rows_in,
            joined.table.len(),
            format!("{} rows without a ministry", joined.unmatched),
        );

        let civil = record_filter(
            report,
            "exclude ministry",
            &joined.table,
            Filter::new().with(
                MINISTRY,
                Predicate::NotEquals(Value::text(filters.excluded_ministry.as_str())),
            ),
        )?;

        let accounts = filters.budget_accounts.iter().map(|&c| Value::Integer(c)).collect();
        let procurement = record_filter(
            report,
            "keep budget accounts",
            &civil,
            Filter::new().with(BUDGET_ACCOUNT, Predicate::OneOf(accounts)),
        )?;

        let whitelist = whitelist
            .rename(WHITELIST_ACCOUNT, GENERAL_ACCOUNT)
            .stage("prepare control accounts")?;
        let general = join(&procurement, &whitelist, &[GENERAL_ACCOUNT], JoinMode::Inner)
            .stage("keep control accounts")?;
        report.record_with_note(
            "keep control accounts",
            procurement.len(),
            general.table.len(),
            format!("{} rows outside the whitelist", general.unmatched),
        );

        Ok(general.table.named("budget"))
    }
}

/// Collapse the ministry reference to one ministry per activity code
///
/// Repeated pairs are merged, with both columns compared after key
/// normalization. A code listed under two different ministries would
/// duplicate ledger rows, so it is rejected.
fn distinct_ministries(reference: &Table) -> DecpResult<Table> {
    let reference = reference.select(&MINISTRY_COLUMNS)?;

    let mut seen: HashMap<String, (Option<String>, Value)> = HashMap::new();
    let mut rows = Vec::new();

    for row in reference.rows() {
        let Some(code) = normalize_key(&row[0]) else {
            continue;
        };
        let ministry_key = normalize_key(&row[1]);
        match seen.get(&code) {
            Some((key, _)) if key == &ministry_key => continue,
            Some((_, ministry)) => {
                return Err(DecpError::Value(format!(
                    "activity '{}' belongs to both '{}' and '{}'",
                    row[0], ministry, row[1]
                )))
            }
            None => {
                seen.insert(code, (ministry_key, row[1].clone()));
                rows.push(row.clone());
            }
        }
    }

    Table::from_rows(reference.name(), reference.columns().to_vec(), rows)
}
