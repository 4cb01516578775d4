//! Buyer candidate list
//!
//! Lists the distinct (buyer id, buyer name) pairs of the AIFE-published
//! contracts so that the in-scope buyers can be flagged by hand. The flagged
//! list becomes the buyer-scope table read by the contract pipeline.

use std::collections::BTreeMap;

use tracing::debug;

use super::filter::{Filter, Predicate};
use super::join::normalize_key;
use super::record_filter;
use crate::config::{DecpPaths, Settings};
use crate::error::{DecpResult, StageContext};
use crate::export::write_delimited_file;
use crate::import::read_delimited_file;
use crate::models::buyer::{BUYER_ID, BUYER_NAME, CONTRACT_COUNT, LOCATION_COLUMNS, SCOPE_FLAG};
use crate::models::contract::SOURCE;
use crate::models::{Row, Table, Value};
use crate::reports::RunReport;

/// Aggregated register rows of one buyer
///
/// The id and name keep the first spelling seen in the register.
struct Candidate {
    id: Value,
    name: Value,
    locations: Vec<Value>,
    contracts: i64,
}

/// Service building the buyer candidate list
pub struct BuyerCandidateService<'a> {
    paths: &'a DecpPaths,
    settings: &'a Settings,
}

impl<'a> BuyerCandidateService<'a> {
    /// Create a new buyer candidate service
    pub fn new(paths: &'a DecpPaths, settings: &'a Settings) -> Self {
        Self { paths, settings }
    }

    /// Load the register, build the list and write it
    pub fn run(&self) -> DecpResult<RunReport> {
        let mut report = RunReport::new("buyers");

        let register = read_delimited_file(
            "procurement register",
            &self.paths.resolve(&self.settings.inputs.procurement_register),
            &self.settings.dialects.procurement_register,
        )
        .stage("load procurement register")?;
        report.record("load procurement register", 0, register.len());

        let candidates = self.process(&register, &mut report)?;

        let path = self.paths.resolve(&self.settings.outputs.buyer_candidates);
        write_delimited_file(&candidates, &path, &self.settings.export)
            .stage("export buyer candidates")?;
        report.add_output(path);

        report.finish();
        Ok(report)
    }

    /// Build the candidate list from a loaded register
    pub fn process(&self, register: &Table, report: &mut RunReport) -> DecpResult<Table> {
        let aife = record_filter(
            report,
            "filter source",
            register,
            Filter::new().with(
                SOURCE,
                Predicate::Equals(Value::text(self.settings.procurement.source.as_str())),
            ),
        )?;

        let mut columns = vec![BUYER_ID, BUYER_NAME];
        columns.extend(LOCATION_COLUMNS);
        let buyers = aife.select(&columns).stage("select buyer columns")?;

        // Grouped on the same normalized keys the buyer-scope join matches on,
        // so one annotated candidate row matches each register buyer once
        let mut groups: BTreeMap<(String, String), Candidate> = BTreeMap::new();
        let mut unnamed = 0;

        for row in buyers.rows() {
            let key = match (normalize_key(&row[0]), normalize_key(&row[1])) {
                (Some(id), Some(name)) => (id, name),
                _ => {
                    unnamed += 1;
                    continue;
                }
            };

            let candidate = groups.entry(key).or_insert_with(|| Candidate {
                id: row[0].clone(),
                name: row[1].clone(),
                locations: vec![Value::Null; LOCATION_COLUMNS.len()],
                contracts: 0,
            });
            candidate.contracts += 1;
            for (slot, cell) in candidate.locations.iter_mut().zip(&row[2..]) {
                if slot.is_null() {
                    *slot = cell.clone();
                }
            }
        }

        if unnamed > 0 {
            debug!(rows = unnamed, "register rows without buyer id or name");
        }

        let rows: Vec<Row> = groups
            .into_values()
            .map(|candidate| {
                let mut row = vec![candidate.id, candidate.name];
                row.extend(candidate.locations);
                row.push(Value::Integer(candidate.contracts));
                row.push(Value::Null);
                row
            })
            .collect();

        let mut output_columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        output_columns.push(CONTRACT_COUNT.to_string());
        output_columns.push(SCOPE_FLAG.to_string());

        let candidates = Table::from_rows("buyer candidates", output_columns, rows)?;
        report.record_with_note(
            "group buyers",
            aife.len(),
            candidates.len(),
            format!("{} rows without buyer id or name", unnamed),
        );

        Ok(candidates)
    }
}
