//! decp-budget - state budget and public procurement data pipelines
//!
//! This library filters the state budget execution ledger and the DECP
//! procurement register down to civil-state procurement spend, and expands
//! every kept contract into a monthly series of estimated payments.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and run settings
//! - `error`: Custom error types
//! - `models`: Tables, cell values and the column contracts of each source
//! - `import`: Delimited and workbook readers
//! - `services`: Filters, joins, schedules and the three pipelines
//! - `export`: Delimited output and run reports
//! - `reports`: Per-stage row counts of a run
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use decp_budget::config::{DecpPaths, Settings};
//! use decp_budget::services::ContractService;
//!
//! let paths = DecpPaths::new(None)?;
//! let settings = Settings::load_or_create(&paths)?;
//! let report = ContractService::new(&paths, &settings).run()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{DecpError, DecpResult};
