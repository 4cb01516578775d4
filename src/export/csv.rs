//! Delimited output
//!
//! Tables are written with a header row and no index column. Decimal cells
//! use a fixed number of digits and the configured decimal separator, dates
//! are written as `YYYY-MM-DD` and nulls as empty fields.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::config::ExportFormat;
use crate::error::{DecpError, DecpResult};
use crate::models::{Table, Value};

/// Render a cell for output
pub fn format_value(value: &Value, format: &ExportFormat) -> String {
    match value {
        Value::Decimal(v) => {
            let text = format!("{:.*}", format.precision, v);
            if format.decimal_separator == '.' {
                text
            } else {
                text.replace('.', &format.decimal_separator.to_string())
            }
        }
        other => other.to_string(),
    }
}

/// Write a table to any writer
pub fn write_delimited<W: Write>(
    table: &Table,
    writer: W,
    format: &ExportFormat,
) -> DecpResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter_byte()?)
        .from_writer(writer);

    writer
        .write_record(table.columns())
        .map_err(|e| DecpError::Io(format!("{}: failed to write header: {}", table.name(), e)))?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| format_value(v, format)))
            .map_err(|e| DecpError::Io(format!("{}: failed to write row: {}", table.name(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| DecpError::Io(format!("{}: failed to flush: {}", table.name(), e)))?;
    Ok(())
}

/// Write a table to a file atomically (write to temp, then rename)
///
/// A failed run leaves any previous output in place instead of a truncated
/// file.
pub fn write_delimited_file(table: &Table, path: &Path, format: &ExportFormat) -> DecpResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DecpError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = write_temp_file(table, &temp_path, format) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DecpError::Io(format!(
            "Failed to move output into place at {}: {}",
            path.display(),
            e
        ))
    })?;

    info!(output = %path.display(), rows = table.len(), "wrote {}", table.name());
    Ok(())
}

/// Write, flush and sync the temp file; the caller removes it on failure
fn write_temp_file(table: &Table, temp_path: &Path, format: &ExportFormat) -> DecpResult<()> {
    let file = File::create(temp_path).map_err(|e| {
        DecpError::Io(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    write_delimited(table, &mut writer, format)?;

    writer
        .flush()
        .map_err(|e| DecpError::Io(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| DecpError::Io(format!("Failed to sync data: {}", e)))
}

fn temp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
