//! Reports for decp-budget
//!
//! - Run report: per-stage row counts and outputs of a pipeline run

pub mod run;

pub use run::{RunReport, StageReport};
