//! Delimited source files
//!
//! Every field is read as text (empty fields become null). Typed columns are
//! coerced afterwards by the pipeline that needs them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::config::CsvDialect;
use crate::error::{DecpError, DecpResult};
use crate::models::{Table, Value};

/// Parse a delimited source from a reader
pub fn read_delimited<R: Read>(
    name: &str,
    reader: R,
    dialect: &CsvDialect,
) -> DecpResult<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter_byte()?)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DecpError::Io(format!("{}: failed to read header: {}", name, e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut table = Table::new(name, headers);
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            DecpError::Io(format!("{}: error reading record {}: {}", name, idx + 1, e))
        })?;
        table.push_row(record.iter().map(Value::from_raw).collect())?;
    }

    debug!(source = name, rows = table.len(), columns = table.columns().len(), "read delimited source");
    Ok(table)
}

/// Read a delimited source file
pub fn read_delimited_file(name: &str, path: &Path, dialect: &CsvDialect) -> DecpResult<Table> {
    let file = File::open(path).map_err(|e| {
        DecpError::Io(format!("{}: failed to open {}: {}", name, path.display(), e))
    })?;
    read_delimited(name, file, dialect)
}
