//! Marking edge rows by unordered endpoint key pairs.
//!
//! Both operations need the `endpoint_u`/`endpoint_v` columns and fail with
//! `MissingColumn` before touching the table when they are absent. A target
//! column that does not exist yet is created with `0` in every row. Pairs with
//! no matching row are ignored; the returned count says how many rows were written.
//! The endpoint columns themselves are never a valid target.

use std::collections::{HashMap, HashSet};

use crate::error::{DualGraphError, Result};
use crate::model::{KeyPair, Value};
use crate::table::{EdgeTable, ENDPOINT_U, ENDPOINT_V};

/// Value a freshly created annotation column starts with.
pub const DEFAULT_MARK: i64 = 0;

fn prepare(table: &mut EdgeTable, col: &str) -> Result<Vec<KeyPair>> {
    if col == ENDPOINT_U || col == ENDPOINT_V {
        return Err(DualGraphError::ReservedColumn(col.to_string()));
    }
    let pairs = table.endpoint_pairs()?;
    table.add_column_with_default(col, Value::Int(DEFAULT_MARK));
    Ok(pairs)
}

/// Sets `col` to `val` on every row whose endpoints match one of `marks`.
pub fn mark_edges<I, P>(table: &mut EdgeTable, marks: I, col: &str, val: impl Into<Value>) -> Result<usize>
where
    I: IntoIterator<Item = P>,
    P: Into<KeyPair>,
{
    let wanted: HashSet<KeyPair> = marks.into_iter().map(Into::into).collect();
    let val = val.into();
    let rows = prepare(table, col)?;
    let mut written = 0usize;
    if let Some(values) = table.column_mut(col) {
        for (row, pair) in rows.iter().enumerate() {
            if wanted.contains(pair) {
                values[row] = val.clone();
                written += 1;
            }
        }
    }
    log::debug!("marked {} rows in {:?} from {} pairs", written, col, wanted.len());
    Ok(written)
}

/// Sets `col` on every matching row to the value mapped to its pair.
///
/// `(a, b)` and `(b, a)` name the same pair; if both are given the later one wins.
pub fn mark_edges_with<I, P, V>(table: &mut EdgeTable, marks: I, col: &str) -> Result<usize>
where
    I: IntoIterator<Item = (P, V)>,
    P: Into<KeyPair>,
    V: Into<Value>,
{
    let wanted: HashMap<KeyPair, Value> = marks
        .into_iter()
        .map(|(p, v)| (p.into(), v.into()))
        .collect();
    let rows = prepare(table, col)?;
    let mut written = 0usize;
    if let Some(values) = table.column_mut(col) {
        for (row, pair) in rows.iter().enumerate() {
            if let Some(v) = wanted.get(pair) {
                values[row] = v.clone();
                written += 1;
            }
        }
    }
    log::debug!("marked {} rows in {:?} from {} pairs", written, col, wanted.len());
    Ok(written)
}

impl EdgeTable {
    pub fn mark_edges<I, P>(&mut self, marks: I, col: &str, val: impl Into<Value>) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPair>,
    {
        mark_edges(self, marks, col, val)
    }

    pub fn mark_edges_with<I, P, V>(&mut self, marks: I, col: &str) -> Result<usize>
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<KeyPair>,
        V: Into<Value>,
    {
        mark_edges_with(self, marks, col)
    }
}
