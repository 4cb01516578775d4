//! Column predicate filters
//!
//! A `Filter` is a list of (column, predicate) conditions that must all
//! hold. Applying it never touches the input table: the kept rows are
//! copied into a new one, in their original order.
//!
//! Columns and operand types are checked before any row is examined, so a
//! date bound on a column that was never parsed fails up front instead of
//! silently dropping every row.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::error::{DecpError, DecpResult};
use crate::models::{Table, Value};

/// A condition on a single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell equals the operand; nulls never match
    Equals(Value),
    /// Cell differs from the operand; nulls are kept
    NotEquals(Value),
    /// Cell is one of the operands; nulls never match
    OneOf(Vec<Value>),
    /// Cell is strictly greater than the operand; nulls never match
    GreaterThan(Value),
    /// Cell is greater than or equal to the operand; nulls never match
    AtLeast(Value),
    /// Cell is a number with no fractional part; nulls never match
    WholeNumber,
}

impl Predicate {
    /// Strict date lower bound
    pub fn after(date: NaiveDate) -> Self {
        Self::GreaterThan(Value::Date(date))
    }

    fn operands(&self) -> Vec<&Value> {
        match self {
            Self::Equals(v) | Self::NotEquals(v) | Self::GreaterThan(v) | Self::AtLeast(v) => {
                vec![v]
            }
            Self::OneOf(values) => values.iter().collect(),
            Self::WholeNumber => Vec::new(),
        }
    }

    /// Evaluate the predicate on one cell
    pub fn holds(&self, cell: &Value) -> bool {
        match self {
            Self::Equals(v) => cell.matches(v),
            Self::NotEquals(v) => !cell.matches(v),
            Self::OneOf(values) => values.iter().any(|v| cell.matches(v)),
            Self::GreaterThan(v) => cell.compare(v) == Some(Ordering::Greater),
            Self::AtLeast(v) => matches!(
                cell.compare(v),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            Self::WholeNumber => cell.as_whole_number().is_some(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "== '{}'", v),
            Self::NotEquals(v) => write!(f, "!= '{}'", v),
            Self::OneOf(values) => {
                let list: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "in {{{}}}", list.join(", "))
            }
            Self::GreaterThan(v) => write!(f, "> '{}'", v),
            Self::AtLeast(v) => write!(f, ">= '{}'", v),
            Self::WholeNumber => write!(f, "is a whole number"),
        }
    }
}

/// Conjunction of column predicates
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Predicate)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on a column
    pub fn with(mut self, column: &str, predicate: Predicate) -> Self {
        self.conditions.push((column.to_string(), predicate));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Return a new table holding the rows that satisfy every condition
    pub fn apply(&self, table: &Table) -> DecpResult<Table> {
        let resolved = self.resolve(table)?;
        Ok(table.retain_rows(|row| {
            resolved
                .iter()
                .all(|(idx, predicate)| predicate.holds(&row[*idx]))
        }))
    }

    /// Resolve columns and check operand types against the table's cells
    fn resolve<'a>(&'a self, table: &Table) -> DecpResult<Vec<(usize, &'a Predicate)>> {
        let mut resolved = Vec::with_capacity(self.conditions.len());

        for (column, predicate) in &self.conditions {
            let idx = table.column_index(column)?;

            for operand in predicate.operands() {
                if operand.is_null() {
                    return Err(DecpError::Value(format!(
                        "filter on '{}' has a null operand",
                        column
                    )));
                }

                let mismatch = table
                    .rows()
                    .iter()
                    .enumerate()
                    .find(|(_, row)| !row[idx].comparable_with(operand));

                if let Some((row_number, row)) = mismatch {
                    return Err(DecpError::type_error(
                        column.as_str(),
                        format!(
                            "cannot apply '{}' to {} value '{}' (row {} of {})",
                            predicate,
                            row[idx]
                                .column_type()
                                .map(|t| t.to_string())
                                .unwrap_or_default(),
                            row[idx],
                            row_number + 1,
                            table.name()
                        ),
                    ));
                }
            }

            resolved.push((idx, predicate));
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> Table {
        Table::from_rows(
            "ledger",
            vec!["Compte budgétaire".into(), "Ministere".into(), "dateNotification".into()],
            vec![
                vec![Value::Integer(31), Value::text("Culture"), Value::Date(date(2018, 1, 1))],
                vec![Value::Integer(21), Value::text("Armées"), Value::Date(date(2018, 1, 2))],
                vec![Value::Integer(52), Value::Null, Value::Null],
                vec![Value::Integer(51), Value::text("Justice"), Value::Date(date(2020, 6, 30))],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_equals() {
        let kept = Filter::new()
            .with("Ministere", Predicate::Equals(Value::text("Culture")))
            .apply(&ledger())
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_not_equals_keeps_nulls() {
        let kept = Filter::new()
            .with("Ministere", Predicate::NotEquals(Value::text("Armées")))
            .apply(&ledger())
            .unwrap();
        assert_eq!(kept.len(), 3);
        assert!(kept
            .column_values("Ministere")
            .unwrap()
            .all(|v| v != &Value::text("Armées")));
    }

    #[test]
    fn test_one_of() {
        let kept = Filter::new()
            .with(
                "Compte budgétaire",
                Predicate::OneOf(vec![Value::Integer(31), Value::Integer(51), Value::Integer(52)]),
            )
            .apply(&ledger())
            .unwrap();
        let codes: Vec<_> = kept
            .column_values("Compte budgétaire")
            .unwrap()
            .cloned()
            .collect();
        assert_eq!(codes, vec![Value::Integer(31), Value::Integer(52), Value::Integer(51)]);
    }

    #[test]
    fn test_after_is_strict() {
        let kept = Filter::new()
            .with("dateNotification", Predicate::after(date(2018, 1, 1)))
            .apply(&ledger())
            .unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.rows()[0][2], Value::Date(date(2018, 1, 2)));
    }

    #[test]
    fn test_at_least() {
        let kept = Filter::new()
            .with("Compte budgétaire", Predicate::AtLeast(Value::Integer(51)))
            .apply(&ledger())
            .unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_whole_number() {
        let table = Table::from_rows(
            "register",
            vec!["dureeMoisCalculee".into()],
            vec![
                vec![Value::Decimal(2.0)],
                vec![Value::Decimal(2.5)],
                vec![Value::Integer(3)],
                vec![Value::Null],
            ],
        )
        .unwrap();
        let kept = Filter::new()
            .with("dureeMoisCalculee", Predicate::WholeNumber)
            .apply(&table)
            .unwrap();
        let values: Vec<_> = kept.column_values("dureeMoisCalculee").unwrap().cloned().collect();
        assert_eq!(values, vec![Value::Decimal(2.0), Value::Integer(3)]);
    }

    #[test]
    fn test_conditions_combine() {
        let kept = Filter::new()
            .with("Ministere", Predicate::NotEquals(Value::text("Armées")))
            .with("dateNotification", Predicate::after(date(2018, 1, 1)))
            .apply(&ledger())
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let err = Filter::new()
            .with("source", Predicate::Equals(Value::text("data.gouv.fr_aife")))
            .apply(&ledger())
            .unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_unparsed_date_column_is_type_error() {
        let raw = Table::from_rows(
            "register",
            vec!["dateNotification".into()],
            vec![vec![Value::text("2019-03-15")]],
        )
        .unwrap();
        let err = Filter::new()
            .with("dateNotification", Predicate::after(date(2018, 1, 1)))
            .apply(&raw)
            .unwrap_err();
        assert!(err.is_type());
    }

    #[test]
    fn test_input_is_untouched() {
        let table = ledger();
        let before = table.clone();
        let _ = Filter::new()
            .with("Ministere", Predicate::Equals(Value::text("Justice")))
            .apply(&table)
            .unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&ledger()).unwrap().len(), 4);
    }
}
