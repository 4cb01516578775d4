//! Procurement filter and monthly expansion
//!
//! Keeps the contracts published by the AIFE for in-scope state buyers,
//! notified after the cut-off date and typed as "Marché". Each kept contract
//! gets a calculated end date, an estimated monthly payment and a sequential
//! key (`idLigneMarche`). The contracts are then expanded into one row per
//! month of their life, joined back to the contract columns on that key.

use tracing::{debug, warn};

use super::filter::{Filter, Predicate};
use super::join::{join, JoinMode};
use super::record_filter;
use super::schedule::MonthlySchedule;
use crate::config::{DecpPaths, Settings, ZeroDurationPolicy};
use crate::error::{DecpResult, StageContext};
use crate::export::write_delimited_file;
use crate::import::read_delimited_file;
use crate::models::buyer::{SCOPE_COLUMNS, SCOPE_FLAG};
use crate::models::contract::{
    AMOUNT, BUYER_ID, BUYER_NAME, CALCULATED_AMOUNT, CALCULATED_DURATION, CALCULATED_END_DATE,
    CONTRACT_KEY, CONTRACT_TYPE, ESTIMATED_MONTHLY_PAYMENT, INSTALLMENT_MONTH, NOTIFICATION_DATE,
    REGISTER_COLUMNS, SOURCE,
};
use crate::models::{ColumnType, ContractTerms, Row, Table, TermColumns, Value};
use crate::reports::RunReport;

/// Tables produced by the contract pipeline
#[derive(Debug, Clone)]
pub struct ContractOutputs {
    /// One row per kept contract, with the derived columns
    pub contracts: Table,
    /// One row per contract month, carrying every contract column
    pub installments: Table,
}

/// Service running the procurement filter and monthly expansion
pub struct ContractService<'a> {
    paths: &'a DecpPaths,
    settings: &'a Settings,
}

impl<'a> ContractService<'a> {
    /// Create a new contract service
    pub fn new(paths: &'a DecpPaths, settings: &'a Settings) -> Self {
        Self { paths, settings }
    }

    /// Load the sources, run the pipeline and write both outputs
    pub fn run(&self) -> DecpResult<RunReport> {
        let mut report = RunReport::new("contracts");
        let inputs = &self.settings.inputs;
        let dialects = &self.settings.dialects;

        let register = read_delimited_file(
            "procurement register",
            &self.paths.resolve(&inputs.procurement_register),
            &dialects.procurement_register,
        )
        .stage("load procurement register")?;
        report.record("load procurement register", 0, register.len());

        let scope = read_delimited_file(
            "buyer scope",
            &self.paths.resolve(&inputs.buyer_scope),
            &dialects.buyer_scope,
        )
        .stage("load buyer scope")?;
        report.record("load buyer scope", 0, scope.len());

        let outputs = self.process(&register, &scope, &mut report)?;

        // Both tables are complete before either file is written
        let contracts_path = self.paths.resolve(&self.settings.outputs.contracts);
        write_delimited_file(&outputs.contracts, &contracts_path, &self.settings.export)
            .stage("export contracts")?;
        report.add_output(contracts_path);

        let installments_path = self.paths.resolve(&self.settings.outputs.installments);
        write_delimited_file(&outputs.installments, &installments_path, &self.settings.export)
            .stage("export installments")?;
        report.add_output(installments_path);

        report.finish();
        Ok(report)
    }

    /// Filter, enrich and expand a loaded register
    pub fn process(
        &self,
        register: &Table,
        scope: &Table,
        report: &mut RunReport,
    ) -> DecpResult<ContractOutputs> {
        let filters = &self.settings.procurement;
        let numbers = &self.settings.dialects.procurement_register.numbers;

        let register = register
            .select(&REGISTER_COLUMNS)
            .stage("select register columns")?;

        let aife = record_filter(
            report,
            "filter source",
            &register,
            Filter::new().with(SOURCE, Predicate::Equals(Value::text(filters.source.as_str()))),
        )?
        .coerce_all(
            &[
                (AMOUNT, ColumnType::Decimal),
                (CALCULATED_AMOUNT, ColumnType::Decimal),
                (CALCULATED_DURATION, ColumnType::Decimal),
            ],
            numbers,
        )
        .stage("parse amounts")?;

        let scope = scope.select(&SCOPE_COLUMNS).stage("select buyer scope")?;
        let scoped = join(&aife, &scope, &[BUYER_ID, BUYER_NAME], JoinMode::Inner)
            .stage("join buyer scope")?;
        if scoped.unmatched > 0 {
            warn!(
                unmatched = scoped.unmatched,
                sample = ?scoped.unmatched_keys,
                "register rows without a buyer-scope entry"
            );
        }
        report.record_with_note(
            "join buyer scope",
            aife.len(),
            scoped.table.len(),
            format!("{} rows without a buyer-scope entry", scoped.unmatched),
        );

        let in_scope = record_filter(
            report,
            "filter buyer scope",
            &scoped.table,
            Filter::new().with(SCOPE_FLAG, Predicate::Equals(Value::text(filters.scope_flag.as_str()))),
        )?
        .coerce(NOTIFICATION_DATE, ColumnType::Date, numbers)
        .stage("parse notification dates")?;

        let recent = record_filter(
            report,
            "filter notification date",
            &in_scope,
            Filter::new().with(NOTIFICATION_DATE, Predicate::after(filters.notified_after)),
        )?;

        let contracts = record_filter(
            report,
            "filter contract type",
            &recent,
            Filter::new().with(
                CONTRACT_TYPE,
                Predicate::Equals(Value::text(filters.contract_type.as_str())),
            ),
        )?;

        let dated = record_filter(
            report,
            "filter duration",
            &contracts,
            Filter::new()
                .with(CALCULATED_DURATION, Predicate::AtLeast(Value::Integer(0)))
                .with(CALCULATED_DURATION, Predicate::WholeNumber),
        )?;

        let payable = match filters.zero_duration {
            ZeroDurationPolicy::Exclude => record_filter(
                report,
                "exclude zero-duration contracts",
                &dated,
                Filter::new().with(CALCULATED_DURATION, Predicate::GreaterThan(Value::Integer(0))),
            )?,
            ZeroDurationPolicy::SingleInstallment => dated,
        };

        let (contracts, schedule) = enrich(payable, filters.zero_duration).stage("enrich contracts")?;
        report.record("enrich contracts", contracts.len(), contracts.len());

        report.record("expand monthly installments", contracts.len(), schedule.len());

        let installments = join(&contracts, &schedule, &[CONTRACT_KEY], JoinMode::Inner)
            .stage("join installments")?;
        report.record("join installments", schedule.len(), installments.table.len());

        Ok(ContractOutputs {
            contracts: contracts.named("contracts"),
            installments: installments.table.named("installments"),
        })
    }
}

/// Installment schedule of one contract
fn contract_schedule(
    row: &Row,
    columns: &TermColumns,
    zero_duration: ZeroDurationPolicy,
) -> DecpResult<MonthlySchedule> {
    let terms = ContractTerms::from_row(row, columns)?;

    if terms.duration_months == 0 && zero_duration == ZeroDurationPolicy::SingleInstallment {
        return Ok(MonthlySchedule::single(terms.notification_date, terms.calculated_amount));
    }
    MonthlySchedule::for_contract(&terms)
}

/// Add the derived columns and build the (contract key, month) table
fn enrich(contracts: Table, zero_duration: ZeroDurationPolicy) -> DecpResult<(Table, Table)> {
    let columns = TermColumns {
        notification_date: contracts.column_index(NOTIFICATION_DATE)?,
        duration: contracts.column_index(CALCULATED_DURATION)?,
        calculated_amount: contracts.column_index(CALCULATED_AMOUNT)?,
    };

    let mut end_dates = Vec::with_capacity(contracts.len());
    let mut payments = Vec::with_capacity(contracts.len());
    let mut keys = Vec::with_capacity(contracts.len());
    let mut months = Table::new(
        "monthly schedule",
        vec![CONTRACT_KEY.to_string(), INSTALLMENT_MONTH.to_string()],
    );

    for (idx, row) in contracts.rows().iter().enumerate() {
        let key = Value::Integer(idx as i64 + 1);
        let schedule = contract_schedule(row, &columns, zero_duration).map_err(|e| {
            debug!(contract = idx + 1, error = %e, "contract could not be enriched");
            e
        })?;

        end_dates.push(Value::Date(schedule.end()));
        payments.push(schedule.payment().map_or(Value::Null, Value::Decimal));

        for installment in schedule {
            months.push_row(vec![key.clone(), Value::Date(installment.month)])?;
        }
        keys.push(key);
    }

    let contracts = contracts
        .with_column(CALCULATED_END_DATE, end_dates)?
        .with_column(ESTIMATED_MONTHLY_PAYMENT, payments)?
        .with_column(CONTRACT_KEY, keys)?;

    Ok((contracts, months))
}
