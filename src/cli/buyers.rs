//! Buyer candidate list command

use std::path::PathBuf;

use clap::Args;

use super::report::finish_run;
use crate::config::{DecpPaths, Settings};
use crate::error::DecpResult;
use crate::services::BuyerCandidateService;

/// Options of the `buyers` command
#[derive(Args, Debug, Default)]
pub struct BuyersArgs {
    /// Procurement register (overrides the settings file)
    #[arg(long, value_name = "FILE")]
    pub register: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the run report (JSON, or YAML for .yaml/.yml)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Handle the buyers command
pub fn handle_buyers_command(paths: &DecpPaths, settings: &Settings, args: BuyersArgs) -> DecpResult<()> {
    let mut settings = settings.clone();
    if let Some(register) = args.register {
        settings.inputs.procurement_register = register;
    }
    if let Some(output) = args.output {
        settings.outputs.buyer_candidates = output;
    }

    let report = BuyerCandidateService::new(paths, &settings).run()?;
    finish_run(paths, &report, args.report)?;

    println!();
    println!(
        "Fill the OKKO column with OK or KO, then point inputs.buyer_scope at the annotated file."
    );
    Ok(())
}
