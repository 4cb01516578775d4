//! Run report formatting for terminal output

use tabled::settings::Style;
use tabled::{Table as TextTable, Tabled};

use crate::reports::RunReport;

#[derive(Tabled)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Rows in")]
    rows_in: usize,
    #[tabled(rename = "Rows out")]
    rows_out: usize,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format a run report as a stage table followed by the written files
pub fn format_run_report(report: &RunReport) -> String {
    let rows: Vec<StageRow> = report
        .stages
        .iter()
        .map(|s| StageRow {
            stage: s.stage.clone(),
            rows_in: s.rows_in,
            rows_out: s.rows_out,
            note: s.note.clone().unwrap_or_default(),
        })
        .collect();

    let mut output = format!("Pipeline: {} (run {})\n", report.pipeline, report.run_id);
    output.push_str(&TextTable::new(rows).with(Style::sharp()).to_string());
    output.push('\n');

    if !report.outputs.is_empty() {
        output.push_str("\nWrote:\n");
        for path in &report.outputs {
            output.push_str(&format!("  {}\n", path.display()));
        }
    }

    output
}
