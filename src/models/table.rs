//! In-memory tabular dataset
//!
//! A `Table` is a named list of columns and a list of rows of `Value`s.
//! Operations that reshape a table (select, filter, join) build a new table
//! rather than mutating the one they were given.

use super::value::{ColumnType, NumberFormat, Value};
use crate::error::{DecpError, DecpResult};

/// A single row of cells, aligned with the table's columns
pub type Row = Vec<Value>;

/// Named, column-ordered in-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Human-readable name used in error messages ("budget ledger", ...)
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking that every row has one cell per column
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> DecpResult<Self> {
        let name = name.into();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(DecpError::Value(format!(
                "{}: row {} has {} cells, expected {}",
                name,
                idx + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the same table under a different name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of a column, or a schema error naming this table
    pub fn column_index(&self, column: &str) -> DecpResult<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| DecpError::missing_column(&self.name, column))
    }

    /// Resolve several columns at once
    pub fn column_indices(&self, columns: &[&str]) -> DecpResult<Vec<usize>> {
        columns.iter().map(|c| self.column_index(c)).collect()
    }

    /// Append a row, checking its width
    pub fn push_row(&mut self, row: Row) -> DecpResult<()> {
        if row.len() != self.columns.len() {
            return Err(DecpError::Value(format!(
                "{}: row has {} cells, expected {}",
                self.name,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Iterate over the cells of one column
    pub fn column_values(&self, column: &str) -> DecpResult<impl Iterator<Item = &Value>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Keep only the listed columns, in the listed order
    pub fn select(&self, columns: &[&str]) -> DecpResult<Table> {
        let indices = self.column_indices(columns)?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            name: self.name.clone(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Rename a column
    pub fn rename(mut self, from: &str, to: &str) -> DecpResult<Table> {
        let idx = self.column_index(from)?;
        if from != to && self.has_column(to) {
            return Err(DecpError::Value(format!(
                "{}: cannot rename '{}' to existing column '{}'",
                self.name, from, to
            )));
        }
        self.columns[idx] = to.to_string();
        Ok(self)
    }

    /// Append a column computed for every row
    pub fn with_column(mut self, column: &str, values: Vec<Value>) -> DecpResult<Table> {
        if self.has_column(column) {
            return Err(DecpError::Value(format!(
                "{}: column '{}' already exists",
                self.name, column
            )));
        }
        if values.len() != self.rows.len() {
            return Err(DecpError::Value(format!(
                "{}: column '{}' has {} values for {} rows",
                self.name,
                column,
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(column.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// Coerce a column to a type; the first unparsable cell is a type error
    pub fn coerce(
        mut self,
        column: &str,
        target: ColumnType,
        numbers: &NumberFormat,
    ) -> DecpResult<Table> {
        let idx = self.column_index(column)?;
        for (row_number, row) in self.rows.iter_mut().enumerate() {
            row[idx] = row[idx].coerce(target, numbers).map_err(|e| {
                DecpError::type_error(
                    column,
                    format!("{} (row {} of {})", e, row_number + 1, self.name),
                )
            })?;
        }
        Ok(self)
    }

    /// Coerce several columns
    pub fn coerce_all(
        self,
        columns: &[(&str, ColumnType)],
        numbers: &NumberFormat,
    ) -> DecpResult<Table> {
        columns
            .iter()
            .try_fold(self, |table, (column, target)| {
                table.coerce(column, *target, numbers)
            })
    }

    /// Keep the rows for which `keep` returns true
    pub fn retain_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            "sample",
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![Value::text("1"), Value::text("x"), Value::Null],
                vec![Value::text("2"), Value::text("y"), Value::text("z")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Table::from_rows("t", vec!["a".into()], vec![vec![Value::Null, Value::Null]]);
        assert!(result.unwrap_err().is_value());
    }

    #[test]
    fn test_select_reorders() {
        let table = sample().select(&["c", "a"]).unwrap();
        assert_eq!(table.columns(), &["c".to_string(), "a".to_string()]);
        assert_eq!(table.rows()[1], vec![Value::text("z"), Value::text("2")]);
    }

    #[test]
    fn test_select_missing_column() {
        let err = sample().select(&["a", "missing"]).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("sample"));
    }

    #[test]
    fn test_rename() {
        let table = sample().rename("a", "id").unwrap();
        assert!(table.has_column("id"));
        assert!(!table.has_column("a"));
        assert!(sample().rename("a", "b").is_err());
    }

    #[test]
    fn test_with_column() {
        let table = sample()
            .with_column("d", vec![Value::Integer(1), Value::Integer(2)])
            .unwrap();
        assert_eq!(table.rows()[1][3], Value::Integer(2));
        assert!(sample().with_column("d", vec![Value::Null]).is_err());
    }

    #[test]
    fn test_coerce_reports_row() {
        let table = sample()
            .coerce("a", ColumnType::Integer, &NumberFormat::default())
            .unwrap();
        assert_eq!(table.rows()[0][0], Value::Integer(1));

        let err = sample()
            .coerce("b", ColumnType::Integer, &NumberFormat::default())
            .unwrap_err();
        assert!(err.is_type());
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_retain_rows_copies() {
        let original = sample();
        let kept = original.retain_rows(|r| !r[2].is_null());
        assert_eq!(kept.len(), 1);
        assert_eq!(original.len(), 2);
    }
}
