//! Budget filter command

use std::path::PathBuf;

use clap::Args;

use super::report::finish_run;
use crate::config::{DecpPaths, Settings};
use crate::error::DecpResult;
use crate::services::BudgetFilterService;

/// Options of the `budget` command
///
/// Paths are relative to the base directory.
#[derive(Args, Debug, Default)]
pub struct BudgetArgs {
    /// Budget execution ledger (overrides the settings file)
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Ministry reference, workbook or delimited export
    #[arg(long, value_name = "FILE")]
    pub ministries: Option<PathBuf>,

    /// Control-account whitelist, workbook or delimited export
    #[arg(long, value_name = "FILE")]
    pub accounts: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the run report (JSON, or YAML for .yaml/.yml)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Handle the budget command
pub fn handle_budget_command(paths: &DecpPaths, settings: &Settings, args: BudgetArgs) -> DecpResult<()> {
    let mut settings = settings.clone();
    if let Some(ledger) = args.ledger {
        settings.inputs.budget_ledger = ledger;
    }
    if let Some(ministries) = args.ministries {
        settings.inputs.ministry_reference = ministries;
    }
    if let Some(accounts) = args.accounts {
        settings.inputs.control_accounts = accounts;
    }
    if let Some(output) = args.output {
        settings.outputs.budget = output;
    }

    let report = BudgetFilterService::new(paths, &settings).run()?;
    finish_run(paths, &report, args.report)
}
