//! Run report export
//!
//! Writes a `RunReport` as YAML when the target ends in `.yaml`/`.yml`,
//! JSON otherwise.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DecpError, DecpResult};
use crate::reports::RunReport;

/// Write a run report, picking the format from the file extension
pub fn write_report(report: &RunReport, path: &Path) -> DecpResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DecpError::Io(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let file = File::create(path).map_err(|e| {
        DecpError::Io(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        writeln!(writer, "# decp-budget run report").map_err(DecpError::from)?;
        serde_yaml::to_writer(&mut writer, report)
            .map_err(|e| DecpError::Io(format!("Failed to write YAML report: {}", e)))?;
    } else {
        serde_json::to_writer_pretty(&mut writer, report)?;
        writeln!(writer).map_err(DecpError::from)?;
    }

    writer.flush().map_err(DecpError::from)?;
    Ok(())
}
