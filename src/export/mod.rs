//! Export module for decp-budget
//!
//! - CSV: pipeline outputs (semicolon-separated, decimal comma)
//! - report: run summaries as JSON or YAML

pub mod csv;
pub mod report;

pub use self::csv::{format_value, write_delimited, write_delimited_file};
pub use report::write_report;
