// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Welch t-tests over tables, optionally stratified by group-by keys.
//!
//! Three modes share one pipeline:
//!
//! - one-sample: is the mean of a column different from `mu`?
//! - two-column: do two columns (independent, unpaired samples) differ?
//! - two-group: does a column differ between the two values of a group column?
//!
//! Every call materializes its input (an eager [`Table`] or a deferred
//! [`LazyTable`]), validates the referenced columns, splits the rows by the
//! `group_by` columns in first-seen key order and emits one result row per
//! partition. Group-key columns come first in the result, followed by a fixed
//! column list per mode (see [`ONE_SAMPLE_COLUMNS`] and [`TWO_SAMPLE_COLUMNS`]).
//!
//! A sample with fewer than two observations is not an error: its row reports
//! the sample size and leaves every statistic null.
//!
//! ## Two-group ordering
//!
//! In two-group mode the two group values are sorted by [`Value`] order, and
//! the smaller one is `group1`. The statistic is `mean1 - mean2`, so the sign
//! of `t` and the meaning of `greater`/`less` do not depend on row order.
//!
//! ## Group cardinality
//!
//! A two-group partition must have exactly two distinct non-null group values.
//! By default ([`CardinalityPolicy::Raise`]) any violation fails the call,
//! grouped or not. With [`CardinalityPolicy::Skip`] a grouped call instead
//! omits the partition and lists its key in [`TestReport::skipped`].
//!
//! ```
//! use tabstat::{Column, Table, Value, two_sample_test};
//!
//! let t = Table::new(vec![
//!     Column::new("score", vec![4.0, 9.0, 5.0, 10.0, 6.0, 11.0]),
//!     Column::new("arm", vec!["control", "treated", "control", "treated", "control", "treated"]),
//! ])
//! .unwrap();
//! let out = two_sample_test(&t, "score", None, Some("arm"), "less", &[]).unwrap();
//! assert_eq!(out.value(0, "group1"), Some(Value::from("control")));
//! assert_eq!(out.value(0, "significant_at_0.05"), Some(Value::Bool(true)));
//! ```

mod dist;
mod error;
pub mod summary;
mod ttest;


pub use dist::{Alternative, SIGNIFICANCE_LEVEL, StudentT, TDistribution};
pub use error::TestError;
pub use summary::{ColumnSummary, summarize, summarize_column};
pub use ttest::{
    CardinalityPolicy, ONE_SAMPLE_COLUMNS, OneSampleRecord, OneSampleTest, TStatistic,
    TWO_SAMPLE_COLUMNS, TestReport, TwoSampleMode, TwoSampleRecord, TwoSampleTest,
    one_sample_test, two_sample_test, welch_df,
};

pub use tabstat_core::{
    Column, ColumnData, CompareOp, DataType, Frame, GroupKey, LazyOp, LazyTable, Table,
    TableError, Value,
};
