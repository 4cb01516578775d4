//! Source file readers
//!
//! - delimited text (`csv`): budget ledger, procurement register, buyer scope
//! - workbooks (`spreadsheet`): ministry reference, control-account whitelist
//!
//! Reference tables may be given either as a workbook or as a delimited
//! export; `read_reference` picks the reader from the file extension.

pub mod csv;
pub mod spreadsheet;

use std::path::Path;

use crate::config::CsvDialect;
use crate::error::DecpResult;
use crate::models::Table;

pub use self::csv::{read_delimited, read_delimited_file};
pub use self::spreadsheet::{is_spreadsheet, read_spreadsheet};

/// Read a reference table from a workbook or a delimited file
pub fn read_reference(name: &str, path: &Path, dialect: &CsvDialect) -> DecpResult<Table> {
    if is_spreadsheet(path) {
        read_spreadsheet(name, path)
    } else {
        read_delimited_file(name, path, dialect)
    }
}
