// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred table plans.
//!
//! A [`LazyTable`] records operations against a source table and runs them all
//! at once in [`LazyTable::collect`]. There is no optimizer: operations execute
//! in the order they were pushed, each producing a new owned table.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::table::{Table, TableError};

/// Comparison operators for numeric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==` (exact float equality)
    Eq,
    /// `!=` (exact float inequality)
    Ne,
}

/// A row predicate: a single numeric comparison against a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column to read.
    pub column: String,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right-hand constant.
    pub value: f64,
}

impl Predicate {
    /// Evaluate the predicate for a given numeric value.
    pub fn eval(&self, v: f64) -> bool {
        match self.op {
            CompareOp::Lt => v < self.value,
            CompareOp::Le => v <= self.value,
            CompareOp::Gt => v > self.value,
            CompareOp::Ge => v >= self.value,
            CompareOp::Eq => v == self.value,
            CompareOp::Ne => v != self.value,
        }
    }
}

/// One step of a deferred plan.
#[derive(Debug, Clone, PartialEq)]
pub enum LazyOp {
    /// Keep only the named columns, in order.
    Select(Vec<String>),
    /// Keep rows where the predicate holds. Null cells never match.
    Filter(Predicate),
    /// Drop rows whose cell in this column is null.
    DropNulls(String),
    /// Keep the first `n` rows.
    Head(usize),
}

/// A deferred computation over a shared source table.
#[derive(Debug, Clone)]
pub struct LazyTable {
    source: Arc<Table>,
    ops: Vec<LazyOp>,
}

impl LazyTable {
    /// Starts an empty plan over `source`.
    pub fn new(source: impl Into<Arc<Table>>) -> Self {
        Self {
            source: source.into(),
            ops: Vec::new(),
        }
    }

    /// Returns the recorded operations.
    pub fn ops(&self) -> &[LazyOp] {
        &self.ops
    }

    /// Appends an operation.
    pub fn push(mut self, op: LazyOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Appends a [`LazyOp::Select`].
    pub fn select<S: AsRef<str>>(self, columns: &[S]) -> Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.push(LazyOp::Select(columns))
    }

    /// Appends a [`LazyOp::Filter`].
    pub fn filter(self, column: &str, op: CompareOp, value: f64) -> Self {
        self.push(LazyOp::Filter(Predicate {
            column: column.to_string(),
            op,
            value,
        }))
    }

    /// Appends a [`LazyOp::DropNulls`].
    pub fn drop_nulls(self, column: &str) -> Self {
        self.push(LazyOp::DropNulls(column.to_string()))
    }

    /// Appends a [`LazyOp::Head`].
    pub fn head(self, n: usize) -> Self {
        self.push(LazyOp::Head(n))
    }

    /// Runs the plan and returns the resulting table.
    ///
    /// A plan with no operations returns a copy of the source.
    pub fn collect(&self) -> Result<Table, TableError> {
        log::trace!("collecting lazy plan with {} ops", self.ops.len());
        let mut current = (*self.source).clone();
        for op in &self.ops {
            current = apply(&current, op)?;
        }
        Ok(current)
    }
}

impl From<Table> for LazyTable {
    fn from(value: Table) -> Self {
        Self::new(value)
    }
}

fn apply(table: &Table, op: &LazyOp) -> Result<Table, TableError> {
    match op {
        LazyOp::Select(columns) => table.select(columns),
        LazyOp::Filter(predicate) => {
            let col = table.require_numeric(&predicate.column)?;
            let rows: Vec<usize> = (0..table.row_count())
                .filter(|&r| col.f64(r).is_some_and(|v| predicate.eval(v)))
                .collect();
            Ok(table.take(&rows))
        }
        LazyOp::DropNulls(column) => {
            let col = table.require_column(column)?;
            let rows: Vec<usize> = (0..table.row_count())
                .filter(|&r| !col.is_null(r))
                .collect();
            Ok(table.take(&rows))
        }
        LazyOp::Head(n) => {
            let rows: Vec<usize> = (0..table.row_count().min(*n)).collect();
            Ok(table.take(&rows))
        }
    }
}
