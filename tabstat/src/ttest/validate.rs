// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column lookups, run once per call before partitioning.

use tabstat_core::{Column, Table};

use crate::TestError;

/// Resolves a value column, which must exist and be numeric.
pub(crate) fn value_column<'t>(table: &'t Table, name: &str) -> Result<&'t Column, TestError> {
    let column = table
        .column(name)
        .ok_or_else(|| TestError::ColumnNotFound(name.to_string()))?;
    if !column.is_numeric() {
        return Err(TestError::NotNumeric(name.to_string()));
    }
    Ok(column)
}

/// Resolves a grouping column of any type.
pub(crate) fn group_column<'t>(table: &'t Table, name: &str) -> Result<&'t Column, TestError> {
    table
        .column(name)
        .ok_or_else(|| TestError::GroupColumnNotFound(name.to_string()))
}

/// Resolves the group-by key columns in caller order.
pub(crate) fn key_columns<'t, S: AsRef<str>>(
    table: &'t Table,
    group_by: &[S],
) -> Result<Vec<&'t Column>, TestError> {
    group_by
        .iter()
        .map(|name| group_column(table, name.as_ref()))
        .collect()
}
