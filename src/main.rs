use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use decp_budget::cli::{
    handle_budget_command, handle_buyers_command, handle_config_command, handle_contracts_command,
    handle_init_command, BudgetArgs, BuyersArgs, ContractsArgs,
};
use decp_budget::config::{paths::HOME_ENV_VAR, DecpPaths, Settings};
use decp_budget::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "decp-budget",
    version,
    about = "State budget and public procurement (DECP) filters with monthly installment expansion",
    long_about = "decp-budget filters the state budget execution ledger and the DECP \
                  procurement register down to civil-state procurement spend, and \
                  spreads every kept contract into estimated monthly installments."
)]
struct Cli {
    /// Directory that relative input and output paths are resolved against
    #[arg(long, global = true, value_name = "DIR", env = HOME_ENV_VAR)]
    base_dir: Option<PathBuf>,

    /// Settings file (default: <base-dir>/decp-budget.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the budget ledger to civil-state procurement accounts
    Budget(BudgetArgs),

    /// List buyer candidates for the buyer-scope table
    Buyers(BuyersArgs),

    /// Filter contracts and expand them into monthly installments
    #[command(alias = "mensualites")]
    Contracts(ContractsArgs),

    /// Write a settings file with the defaults
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut paths = DecpPaths::new(cli.base_dir)?;
    if let Some(config) = cli.config {
        paths = paths.with_settings_file(config);
    }
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Budget(args)) => handle_budget_command(&paths, &settings, args)?,
        Some(Commands::Buyers(args)) => handle_buyers_command(&paths, &settings, args)?,
        Some(Commands::Contracts(args)) => handle_contracts_command(&paths, &settings, args)?,
        Some(Commands::Init { force }) => handle_init_command(&paths, &settings, force)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        None => {
            println!("decp-budget - budget and procurement data pipelines");
            println!();
            println!("Run 'decp-budget --help' for usage information.");
            println!("Run 'decp-budget init' to write a settings file.");
        }
    }

    Ok(())
}
