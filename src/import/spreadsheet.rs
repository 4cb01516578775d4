//! Spreadsheet reference tables (xls, xlsx, xlsm, xlsb, ods)
//!
//! The first worksheet is read, its first row being the header. Cells are
//! turned into text so they go through the same coercion as delimited
//! sources; whole floats are written without a fractional part so account
//! codes stored as numbers still join against codes stored as text.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::error::{DecpError, DecpResult};
use crate::models::{Table, Value};

/// File extensions handled by the spreadsheet reader
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Check whether a path looks like a spreadsheet
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Read the first worksheet of a workbook
pub fn read_spreadsheet(name: &str, path: &Path) -> DecpResult<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        DecpError::Io(format!("{}: failed to open {}: {}", name, path.display(), e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            DecpError::Io(format!("{}: {} has no worksheet", name, path.display()))
        })?
        .map_err(|e| {
            DecpError::Io(format!("{}: failed to read {}: {}", name, path.display(), e))
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| {
        DecpError::Io(format!("{}: {} is empty", name, path.display()))
    })?;
    let columns = header
        .iter()
        .map(|cell| cell_value(cell).to_string().trim().to_string())
        .collect();

    let mut table = Table::new(name, columns);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect())?;
    }

    debug!(source = name, rows = table.len(), "read spreadsheet");
    Ok(table)
}

/// Convert a worksheet cell to a text or null cell
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::from_raw(s),
        Data::Int(i) => Value::Text(i.to_string()),
        Data::Float(f) => Value::Text(format_float(*f)),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
            None => Value::Text(dt.as_f64().to_string()),
        },
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Excel serial day number (1900 system) to a calendar date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet(&PathBuf::from("data/budget/filtresPCE.xlsx")));
        assert!(is_spreadsheet(&PathBuf::from("ref.XLS")));
        assert!(!is_spreadsheet(&PathBuf::from("ref.csv")));
        assert!(!is_spreadsheet(&PathBuf::from("noext")));
    }

    #[test]
    fn test_whole_floats_lose_fraction() {
        assert_eq!(cell_value(&Data::Float(6061000.0)), Value::text("6061000"));
        assert_eq!(cell_value(&Data::Float(12.5)), Value::text("12.5"));
        assert_eq!(cell_value(&Data::Int(31)), Value::text("31"));
        assert!(cell_value(&Data::Empty).is_null());
        assert!(cell_value(&Data::String("  ".into())).is_null());
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(43539.0),
            NaiveDate::from_ymd_opt(2019, 3, 15)
        );
        assert_eq!(excel_serial_to_date(-1.0), None);
    }

    #[test]
    fn test_missing_workbook_is_io_error() {
        let err = read_spreadsheet("ministry reference", Path::new("/nonexistent/ref.xlsx"))
            .unwrap_err();
        assert!(matches!(err, DecpError::Io(_)));
    }
}
