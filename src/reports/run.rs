//! Run report
//!
//! Row counts before and after every stage of a pipeline run, plus the
//! files it wrote.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Row counts for one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: String,
    pub rows_in: usize,
    pub rows_out: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StageReport {
    /// Rows removed by the stage (0 for stages that add rows)
    pub fn dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageReport>,
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    /// Start a report for a pipeline
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pipeline: pipeline.into(),
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Record a stage and log its row counts
    pub fn record(&mut self, stage: &str, rows_in: usize, rows_out: usize) {
        info!(pipeline = %self.pipeline, stage, rows_in, rows_out, "stage complete");
        self.stages.push(StageReport {
            stage: stage.to_string(),
            rows_in,
            rows_out,
            note: None,
        });
    }

    /// Record a stage with a remark (e.g. unmatched join keys)
    pub fn record_with_note(&mut self, stage: &str, rows_in: usize, rows_out: usize, note: String) {
        self.record(stage, rows_in, rows_out);
        if let Some(last) = self.stages.last_mut() {
            last.note = Some(note);
        }
    }

    /// Look up a stage by name
    pub fn stage(&self, stage: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn add_output(&mut self, path: PathBuf) {
        self.outputs.push(path);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
