//! Relational joins on key columns
//!
//! Keys are compared after normalization (surrounding and repeated
//! whitespace removed, case folded, whole numbers compared by their integer
//! text) so that the same buyer or account spelled slightly differently in
//! two sources still matches. Null keys never match.
//!
//! Duplicate keys on the right fan out: a left row is emitted once per
//! matching right row.

use std::collections::HashMap;

use crate::error::{DecpError, DecpResult};
use crate::models::{Row, Table, Value};

/// Number of unmatched keys kept for reporting
const UNMATCHED_SAMPLE: usize = 10;

/// Join mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Only rows with a match on every key survive
    Inner,
    /// Every left row survives; unmatched rows get null right-side columns
    Left,
}

/// Result of a join
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub table: Table,
    /// Left rows that found no match
    pub unmatched: usize,
    /// A few of the unmatched keys, as they appear in the left table
    pub unmatched_keys: Vec<Vec<String>>,
}

/// Normalize a key cell for comparison
pub fn normalize_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => {
            let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                None
            } else {
                Some(collapsed.to_lowercase())
            }
        }
        Value::Integer(v) => Some(v.to_string()),
        Value::Decimal(v) => match value.as_whole_number() {
            Some(whole) => Some(whole.to_string()),
            None => Some(v.to_string()),
        },
        Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
    }
}

fn row_key(row: &Row, indices: &[usize]) -> Option<Vec<String>> {
    indices.iter().map(|&i| normalize_key(&row[i])).collect()
}

/// Join two tables on the given key columns
pub fn join(left: &Table, right: &Table, keys: &[&str], mode: JoinMode) -> DecpResult<JoinOutcome> {
    if keys.is_empty() {
        return Err(DecpError::Value(format!(
            "join of {} and {} needs at least one key",
            left.name(),
            right.name()
        )));
    }
    let left_keys = left.column_indices(keys)?;
    let right_keys = right.column_indices(keys)?;

    let right_payload: Vec<usize> = (0..right.columns().len())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let columns = output_columns(left, right, keys, &right_payload);

    let mut index: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows().iter().enumerate() {
        if let Some(key) = row_key(row, &right_keys) {
            index.entry(key).or_default().push(row_idx);
        }
    }

    let mut rows = Vec::with_capacity(left.len());
    let mut unmatched = 0;
    let mut unmatched_keys = Vec::new();

    for left_row in left.rows() {
        let matches = row_key(left_row, &left_keys).and_then(|key| index.get(&key));

        match matches {
            Some(right_rows) => {
                for &right_idx in right_rows {
                    let right_row = &right.rows()[right_idx];
                    let mut row = left_row.clone();
                    row.extend(right_payload.iter().map(|&i| right_row[i].clone()));
                    rows.push(row);
                }
            }
            None => {
                unmatched += 1;
                if unmatched_keys.len() < UNMATCHED_SAMPLE {
                    unmatched_keys.push(left_keys.iter().map(|&i| left_row[i].to_string()).collect());
                }
                if mode == JoinMode::Left {
                    let mut row = left_row.clone();
                    row.extend(std::iter::repeat(Value::Null).take(right_payload.len()));
                    rows.push(row);
                }
            }
        }
    }

    Ok(JoinOutcome {
        table: Table::from_rows(left.name(), columns, rows)?,
        unmatched,
        unmatched_keys,
    })
}

/// Left columns then right non-key columns; clashing names get `_x` / `_y`
fn output_columns(left: &Table, right: &Table, keys: &[&str], right_payload: &[usize]) -> Vec<String> {
    let right_names: Vec<&String> = right_payload.iter().map(|&i| &right.columns()[i]).collect();
    let clashes = |name: &String| !keys.contains(&name.as_str()) && right_names.contains(&name);

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|c| if clashes(c) { format!("{}_x", c) } else { c.clone() })
        .collect();

    columns.extend(right_names.iter().map(|c| {
        if left.has_column(c) {
            format!("{}_y", c)
        } else {
            c.to_string()
        }
    }));

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
        Table::from_rows(name, columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    fn ledger() -> Table {
        table(
            "ledger",
            &["ID_Activite", "EUR"],
            vec![
                vec![Value::text("A1"), Value::Decimal(10.0)],
                vec![Value::text("A2"), Value::Decimal(20.0)],
                vec![Value::Null, Value::Decimal(30.0)],
            ],
        )
    }

    fn ministries() -> Table {
        table(
            "ministries",
            &["ID_Activite", "Ministere"],
            vec![vec![Value::text("A1"), Value::text("Culture")]],
        )
    }

    #[test]
    fn test_left_join_null_fills() {
        let outcome = join(&ledger(), &ministries(), &["ID_Activite"], JoinMode::Left).unwrap();
        let table = outcome.table;

        assert_eq!(table.columns(), &["ID_Activite", "EUR", "Ministere"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0][2], Value::text("Culture"));
        assert!(table.rows()[1][2].is_null());
        assert!(table.rows()[2][2].is_null());
        assert_eq!(outcome.unmatched, 2);
    }

    #[test]
    fn test_inner_join_fans_out_duplicates() {
        let budget = table(
            "budget",
            &["Compte général", "EUR"],
            vec![
                vec![Value::text("6061000"), Value::Decimal(5.0)],
                vec![Value::text("6230000"), Value::Decimal(7.0)],
            ],
        );
        let whitelist = table(
            "whitelist",
            &["Compte général"],
            vec![vec![Value::text("6061000")], vec![Value::text("6061000")]],
        );

        let outcome = join(&budget, &whitelist, &["Compte général"], JoinMode::Inner).unwrap();
        assert_eq!(outcome.table.len(), 2);
        assert!(outcome
            .table
            .rows()
            .iter()
            .all(|r| r[0] == Value::text("6061000")));
        assert_eq!(outcome.unmatched, 1);
        assert_eq!(outcome.unmatched_keys, vec![vec!["6230000".to_string()]]);
    }

    #[test]
    fn test_keys_are_normalized() {
        let register = table(
            "register",
            &["idAcheteur", "nomAcheteur"],
            vec![vec![Value::text("110 020 013"), Value::text("Ministère  de la Culture ")]],
        );
        let scope = table(
            "scope",
            &["idAcheteur", "nomAcheteur", "OKKO"],
            vec![vec![
                Value::text("110 020 013"),
                Value::text("MINISTÈRE DE LA CULTURE"),
                Value::text("OK"),
            ]],
        );

        let outcome = join(&register, &scope, &["idAcheteur", "nomAcheteur"], JoinMode::Inner).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.rows()[0][1], Value::text("Ministère  de la Culture "));
        assert_eq!(outcome.table.rows()[0][2], Value::text("OK"));
    }

    #[test]
    fn test_numeric_key_matches_text() {
        assert_eq!(normalize_key(&Value::Decimal(6061000.0)), Some("6061000".into()));
        assert_eq!(normalize_key(&Value::Integer(6061000)), Some("6061000".into()));
        assert_eq!(normalize_key(&Value::text(" 6061000 ")), Some("6061000".into()));
        assert_eq!(normalize_key(&Value::text("   ")), None);
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let err = join(&ledger(), &ministries(), &["Compte"], JoinMode::Left).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_clashing_columns_get_suffixes() {
        let left = table("l", &["k", "v"], vec![vec![Value::text("a"), Value::Integer(1)]]);
        let right = table("r", &["k", "v"], vec![vec![Value::text("a"), Value::Integer(2)]]);

        let outcome = join(&left, &right, &["k"], JoinMode::Inner).unwrap();
        assert_eq!(outcome.table.columns(), &["k", "v_x", "v_y"]);
        assert_eq!(outcome.table.rows()[0], vec![Value::text("a"), Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_left_order_is_preserved() {
        let left = table(
            "l",
            &["k"],
            vec![vec![Value::text("b")], vec![Value::text("a")], vec![Value::text("b")]],
        );
        let right = table(
            "r",
            &["k", "n"],
            vec![
                vec![Value::text("a"), Value::Integer(1)],
                vec![Value::text("b"), Value::Integer(2)],
                vec![Value::text("b"), Value::Integer(3)],
            ],
        );

        let outcome = join(&left, &right, &["k"], JoinMode::Inner).unwrap();
        let ns: Vec<_> = outcome.table.column_values("n").unwrap().cloned().collect();
        assert_eq!(
            ns,
            vec![Value::Integer(2), Value::Integer(3), Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }
}
