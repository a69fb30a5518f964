// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group-by partitioning in first-seen key order.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::column::Column;
use crate::table::{Table, TableError};
use crate::value::Value;

/// The tuple of group-by values identifying one partition.
///
/// Ungrouped partitions have an empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupKey(SmallVec<[Value; 2]>);

impl GroupKey {
    /// Creates a key from its components.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }

    /// Returns the key components in group-by order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl Deref for GroupKey {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone)]
enum Rows {
    All,
    Subset(Vec<usize>),
}

/// A borrowed view of the rows of a table that share one [`GroupKey`].
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    table: &'a Table,
    rows: Rows,
}

impl<'a> Partition<'a> {
    /// A partition covering every row of `table`.
    pub fn whole(table: &'a Table) -> Self {
        Self {
            table,
            rows: Rows::All,
        }
    }

    /// A partition covering the given row indices.
    pub fn subset(table: &'a Table, rows: Vec<usize>) -> Self {
        Self {
            table,
            rows: Rows::Subset(rows),
        }
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Returns the number of rows in the partition.
    pub fn len(&self) -> usize {
        match &self.rows {
            Rows::All => self.table.row_count(),
            Rows::Subset(rows) => rows.len(),
        }
    }

    /// Returns `true` if the partition has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the partition's row indices in table order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        let (all, subset) = match &self.rows {
            Rows::All => (Some(0..self.table.row_count()), None),
            Rows::Subset(rows) => (None, Some(rows.iter().copied())),
        };
        all.into_iter().flatten().chain(subset.into_iter().flatten())
    }

    /// Collects the usable numeric observations of `column` in this partition.
    ///
    /// Nulls and NaNs are skipped.
    pub fn numeric_values(&self, column: &Column) -> Vec<f64> {
        self.rows().filter_map(|r| column.f64(r)).collect()
    }

    /// Lists the distinct non-null values of `column` in first-seen order.
    pub fn distinct_values(&self, column: &Column) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for r in self.rows() {
            let v = column.get(r);
            if !v.is_null() && seen.insert(v.clone()) {
                out.push(v);
            }
        }
        out
    }
}

/// Splits `table` into partitions keyed by the values of `group_by`.
///
/// With no group-by columns this yields exactly one partition holding every
/// row, under an empty key. Otherwise rows are bucketed in a single scan and
/// partitions come out in the order their key was first seen. Null key
/// components are ordinary key values: rows with nulls form their own
/// partitions rather than being dropped.
pub fn partition_by<'a, S: AsRef<str>>(
    table: &'a Table,
    group_by: &[S],
) -> Result<Vec<(GroupKey, Partition<'a>)>, TableError> {
    if group_by.is_empty() {
        return Ok(alloc::vec![(GroupKey::default(), Partition::whole(table))]);
    }

    let key_columns = group_by
        .iter()
        .map(|name| table.require_column(name.as_ref()))
        .collect::<Result<SmallVec<[&Column; 2]>, _>>()?;

    let mut ordering: Vec<(GroupKey, Vec<usize>)> = Vec::new();
    let mut slot: HashMap<GroupKey, usize> = HashMap::new();

    for row in 0..table.row_count() {
        let key = GroupKey::new(key_columns.iter().map(|c| c.get(row)));
        match slot.entry(key) {
            Entry::Occupied(e) => ordering[*e.get()].1.push(row),
            Entry::Vacant(e) => {
                ordering.push((e.key().clone(), alloc::vec![row]));
                e.insert(ordering.len() - 1);
            }
        }
    }

    log::trace!(
        "partitioned {} rows into {} groups",
        table.row_count(),
        ordering.len()
    );

    Ok(ordering
        .into_iter()
        .map(|(key, rows)| (key, Partition::subset(table, rows)))
        .collect())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Column::new("v", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Column::new("g", vec![Some("b"), Some("a"), Some("b"), None, Some("a"), None]),
            Column::new("h", vec![1_i64, 1, 2, 1, 1, 1]),
        ])
        .unwrap()
    }

    #[test]
    fn ungrouped_is_one_whole_partition() {
        let t = table();
        let parts = partition_by::<&str>(&t, &[]).unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].0.is_empty(), "ungrouped key has no components");
        assert_eq!(parts[0].1.rows().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn groups_follow_first_seen_order_with_null_keys() {
        let t = table();
        let parts = partition_by(&t, &["g"]).unwrap();
        let keys: Vec<Value> = parts.iter().map(|(k, _)| k[0].clone()).collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a"), Value::Null]);
        assert_eq!(parts[2].1.rows().collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn multi_column_keys() {
        let t = table();
        let parts = partition_by(&t, &["g", "h"]).unwrap();
        let keys: Vec<GroupKey> = parts.into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::new([Value::from("b"), Value::Int(1)]),
                GroupKey::new([Value::from("a"), Value::Int(1)]),
                GroupKey::new([Value::from("b"), Value::Int(2)]),
                GroupKey::new([Value::Null, Value::Int(1)]),
            ]
        );
    }

    #[test]
    fn unknown_group_column_fails() {
        let t = table();
        let err = partition_by(&t, &["nope"]).unwrap_err();
        assert_eq!(err, TableError::ColumnNotFound("nope".into()));
    }

    #[test]
    fn distinct_values_skip_nulls() {
        let t = table();
        let g = t.column("g").unwrap();
        let whole = Partition::whole(&t);
        assert_eq!(
            whole.distinct_values(g),
            vec![Value::from("b"), Value::from("a")]
        );
        let v = t.column("v").unwrap();
        let sub = Partition::subset(&t, vec![1, 3]);
        assert_eq!(sub.numeric_values(v), vec![2.0, 4.0]);
    }

    #[test]
    fn group_key_display() {
        let k = GroupKey::new([Value::from("a"), Value::Null, Value::Int(3)]);
        assert_eq!(std::format!("{k}"), "(a, null, 3)");
    }
}
