// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tabstat_core::TableError;

/// Errors returned by the test and summary entry points.
///
/// Insufficient data is not an error: a sample with fewer than two
/// observations produces a row whose statistics are null.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    /// Neither `column2` nor `group_column` was given.
    #[error("Must specify either column2 or group_column")]
    MissingMode,
    /// Both `column2` and `group_column` were given.
    #[error("Cannot specify both column2 and group_column")]
    ConflictingMode,
    /// The alternative tag is not one of `two-sided`, `greater`, `less`.
    #[error("Unknown alternative '{0}'; expected one of two-sided, greater, less")]
    UnknownAlternative(String),
    /// A value column is missing from the input.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    /// A grouping column (`group_column` or a `group_by` key) is missing.
    #[error("Group column '{0}' not found")]
    GroupColumnNotFound(String),
    /// A value column is not numeric.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    /// The two-group test found other than two distinct group values.
    #[error("{column} must have exactly 2 unique values, found {found}")]
    GroupCardinality {
        /// The grouping column.
        column: String,
        /// Number of distinct non-null values seen.
        found: usize,
    },
    /// Materializing or assembling a table failed.
    #[error(transparent)]
    Table(#[from] TableError),
}
