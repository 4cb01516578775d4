//! Display formatting for terminal output

pub mod report;

pub use report::format_run_report;
