//! Configuration module for decp-budget
//!
//! This module provides configuration management including:
//! - base directory and settings file resolution
//! - run settings persistence (inputs, outputs, dialects, filter constants)

pub mod paths;
pub mod settings;

pub use paths::DecpPaths;
pub use settings::{CsvDialect, ExportFormat, Settings, ZeroDurationPolicy};
