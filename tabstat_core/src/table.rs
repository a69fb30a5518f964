// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned, immutable columnar tables.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::column::Column;
use crate::lazy::LazyTable;
use crate::value::{DataType, Value};

/// Errors returned when building, reading or transforming a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A column's length differs from the first column's length.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        /// The offending column.
        column: String,
        /// Row count of the first column.
        expected: usize,
        /// Row count of the offending column.
        found: usize,
    },
    /// Two columns share a name.
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
    /// A referenced column does not exist.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    /// A column was used where numbers are required.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    /// A value did not match the column's type.
    #[error("Column '{column}' expects values of type {expected}")]
    TypeMismatch {
        /// The column being built.
        column: String,
        /// The column's type.
        expected: DataType,
    },
}

/// An immutable table: an ordered list of equal-length, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates a table, checking that column lengths agree and names are unique.
    ///
    /// ```
    /// use tabstat_core::{Column, Table};
    ///
    /// let t = Table::new(vec![
    ///     Column::new("x", vec![1.0, 2.0]),
    ///     Column::new("g", vec!["a", "b"]),
    /// ])
    /// .unwrap();
    /// assert_eq!(t.row_count(), 2);
    /// ```
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        {
            let mut seen = HashSet::with_capacity(columns.len());
            for c in &columns {
                if c.len() != row_count {
                    return Err(TableError::LengthMismatch {
                        column: c.name().to_string(),
                        expected: row_count,
                        found: c.len(),
                    });
                }
                if !seen.insert(c.name()) {
                    return Err(TableError::DuplicateColumn(c.name().to_string()));
                }
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the columns in schema order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Returns `(name, type)` pairs in schema order.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.columns
            .iter()
            .map(|c| (c.name(), c.data_type()))
            .collect()
    }

    /// Returns the position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns `true` if a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Looks up a column by name, failing with [`TableError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<&Column, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Like [`Table::require_column`], but also requires a numeric column.
    pub fn require_numeric(&self, name: &str) -> Result<&Column, TableError> {
        let c = self.require_column(name)?;
        if !c.is_numeric() {
            return Err(TableError::NotNumeric(name.to_string()));
        }
        Ok(c)
    }

    /// Reads one cell. Returns `None` if the column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<Value> {
        self.column(column).map(|c| c.get(row))
    }

    /// Reads a full row in schema order.
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Returns a table with only the given rows, in the given order.
    ///
    /// Indices may repeat. An index at or past [`Table::row_count`] yields a
    /// row of nulls.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            row_count: rows.len(),
        }
    }

    /// Returns a table with only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let columns = names
            .iter()
            .map(|n| self.require_column(n.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        // Re-check uniqueness: `select(["x", "x"])` is a caller error.
        let mut out = Self::new(columns)?;
        out.row_count = self.row_count;
        Ok(out)
    }

    /// Starts a deferred plan over this table.
    pub fn lazy(self) -> LazyTable {
        LazyTable::new(self)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("x", vec![Some(1.0), None, Some(3.0)]),
            Column::new("g", vec!["a", "b", "a"]),
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("x", vec![1.0, 2.0]),
            Column::new("y", vec![1.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "y".into(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::new("x", vec![1.0]),
            Column::new("x", vec![2.0]),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("x".into()));
    }

    #[test]
    fn require_column_reports_missing_name() {
        let t = sample();
        assert_eq!(
            t.require_column("nope").unwrap_err().to_string(),
            "Column 'nope' not found"
        );
        assert_eq!(
            t.require_numeric("g").unwrap_err(),
            TableError::NotNumeric("g".into())
        );
    }

    #[test]
    fn select_keeps_row_count_and_order() {
        let t = sample().select(&["g", "x"]).unwrap();
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["g", "x"]);
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.row(2), vec![Value::from("a"), Value::Float(3.0)]);
    }

    #[test]
    fn take_picks_rows() {
        let t = sample().take(&[2, 0]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.value(0, "x"), Some(Value::Float(3.0)));
    }

    #[test]
    fn take_past_the_end_yields_null_rows() {
        let s = sample();
        let t = s.take(&[s.row_count()]);
        assert_eq!(t.row_count(), 1);
        assert!(
            t.row(0).iter().all(Value::is_null),
            "every cell of an out-of-range row is null"
        );
    }
}
