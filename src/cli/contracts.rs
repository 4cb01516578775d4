//! Procurement filter and monthly expansion command

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::report::finish_run;
use crate::config::{DecpPaths, Settings, ZeroDurationPolicy};
use crate::error::DecpResult;
use crate::services::ContractService;

/// Handling of zero-month contracts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ZeroDuration {
    /// Drop them
    Exclude,
    /// Keep them as one installment carrying the whole amount
    SingleInstallment,
}

impl From<ZeroDuration> for ZeroDurationPolicy {
    fn from(value: ZeroDuration) -> Self {
        match value {
            ZeroDuration::Exclude => Self::Exclude,
            ZeroDuration::SingleInstallment => Self::SingleInstallment,
        }
    }
}

/// Options of the `contracts` command
#[derive(Args, Debug, Default)]
pub struct ContractsArgs {
    /// Procurement register (overrides the settings file)
    #[arg(long, value_name = "FILE")]
    pub register: Option<PathBuf>,

    /// Annotated buyer-scope table
    #[arg(long, value_name = "FILE")]
    pub scope: Option<PathBuf>,

    /// Filtered contracts output
    #[arg(long, value_name = "FILE")]
    pub contracts_output: Option<PathBuf>,

    /// Monthly installments output
    #[arg(long, value_name = "FILE")]
    pub installments_output: Option<PathBuf>,

    /// Handling of contracts with a zero-month duration
    #[arg(long, value_enum)]
    pub zero_duration: Option<ZeroDuration>,

    /// Write the run report (JSON, or YAML for .yaml/.yml)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Handle the contracts command
pub fn handle_contracts_command(
    paths: &DecpPaths,
    settings: &Settings,
    args: ContractsArgs,
) -> DecpResult<()> {
    let mut settings = settings.clone();
    if let Some(register) = args.register {
        settings.inputs.procurement_register = register;
    }
    if let Some(scope) = args.scope {
        settings.inputs.buyer_scope = scope;
    }
    if let Some(output) = args.contracts_output {
        settings.outputs.contracts = output;
    }
    if let Some(output) = args.installments_output {
        settings.outputs.installments = output;
    }
    if let Some(policy) = args.zero_duration {
        settings.procurement.zero_duration = policy.into();
    }

    let report = ContractService::new(paths, &settings).run()?;
    finish_run(paths, &report, args.report)
}
