//! Run summary output shared by the pipeline commands

use std::path::PathBuf;

use crate::config::DecpPaths;
use crate::display::format_run_report;
use crate::error::DecpResult;
use crate::export::write_report;
use crate::reports::RunReport;

/// Print the stage table and, if asked, save the report
pub fn finish_run(paths: &DecpPaths, report: &RunReport, report_file: Option<PathBuf>) -> DecpResult<()> {
    print!("{}", format_run_report(report));

    if let Some(file) = report_file {
        let path = paths.resolve(file);
        write_report(report, &path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
