//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod buyers;
pub mod config;
pub mod contracts;
pub mod report;

pub use budget::{handle_budget_command, BudgetArgs};
pub use buyers::{handle_buyers_command, BuyersArgs};
pub use config::{handle_config_command, handle_init_command};
pub use contracts::{handle_contracts_command, ContractsArgs, ZeroDuration};
