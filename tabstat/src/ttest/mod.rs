// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Welch t-tests over tables.
//!
//! Each call resolves its input into a concrete table, validates the
//! referenced columns, partitions the rows by the group-by keys and emits one
//! result row per partition, in the order the partitions were first seen.

mod assemble;
mod evaluate;
mod record;
mod sample;
mod validate;

use tabstat_core::{Frame, GroupKey, Table, partition_by};

use crate::TestError;
use crate::dist::{Alternative, StudentT, TDistribution};

pub use record::{
    ONE_SAMPLE_COLUMNS, OneSampleRecord, TStatistic, TWO_SAMPLE_COLUMNS, TwoSampleRecord,
};
pub use sample::welch_df;

/// What to do when a two-group partition does not have exactly two group values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardinalityPolicy {
    /// Fail the whole call with [`TestError::GroupCardinality`].
    #[default]
    Raise,
    /// Omit the partition's row and record its key in [`TestReport::skipped`].
    ///
    /// Only applies when `group_by` is non-empty. An ungrouped call has no
    /// partition to omit and raises regardless.
    Skip,
}

/// The outcome of a builder-driven test run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    /// One row per evaluated partition.
    pub table: Table,
    /// Group keys whose partitions were omitted under [`CardinalityPolicy::Skip`].
    pub skipped: Vec<GroupKey>,
}

impl TestReport {
    /// Discards the skip list.
    pub fn into_table(self) -> Table {
        self.table
    }
}

/// A one-sample t-test of `column` against a hypothesized mean.
///
/// ```
/// use tabstat::{Alternative, Column, OneSampleTest, Table, Value};
///
/// let t = Table::new(vec![Column::new("x", vec![1.0, 2.0, 3.0, 4.0, 5.0])]).unwrap();
/// let report = OneSampleTest::new("x")
///     .with_mu(3.0)
///     .with_alternative(Alternative::TwoSided)
///     .run(&t)
///     .unwrap();
/// assert_eq!(report.table.value(0, "mean"), Some(Value::Float(3.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OneSampleTest {
    column: String,
    mu: f64,
    alternative: Alternative,
    group_by: Vec<String>,
}

impl OneSampleTest {
    /// Tests `column` against `mu = 0`, two-sided, ungrouped.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            mu: 0.0,
            alternative: Alternative::TwoSided,
            group_by: Vec::new(),
        }
    }

    /// Sets the hypothesized mean.
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Sets the alternative hypothesis.
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Runs the test separately for each combination of these columns.
    pub fn with_group_by<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.group_by = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Runs the test with the `statrs` t distribution.
    pub fn run<'a>(&self, frame: impl Into<Frame<'a>>) -> Result<TestReport, TestError> {
        self.run_with(frame, &StudentT)
    }

    /// Runs the test with a caller-supplied t distribution.
    pub fn run_with<'a, D: TDistribution + ?Sized>(
        &self,
        frame: impl Into<Frame<'a>>,
        dist: &D,
    ) -> Result<TestReport, TestError> {
        let table = frame.into().materialize()?;
        let table: &Table = &table;

        let value = validate::value_column(table, &self.column)?;
        let keys = validate::key_columns(table, &self.group_by)?;
        let partitions = partition_by(table, &self.group_by)?;
        log::debug!(
            "one-sample t-test on '{}' (mu = {}, {}): {} partition(s)",
            self.column,
            self.mu,
            self.alternative,
            partitions.len()
        );

        let records = partitions
            .into_iter()
            .map(|(key, part)| {
                log::trace!("evaluating partition {key} ({} rows)", part.len());
                let record = evaluate::one_sample(&part, value, self.mu, self.alternative, dist);
                (key, record)
            })
            .collect::<Vec<_>>();

        Ok(TestReport {
            table: assemble::one_sample_table(&keys, &records)?,
            skipped: Vec::new(),
        })
    }
}

/// How a two-sample test obtains its two samples.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TwoSampleMode {
    /// Compare two numeric columns as independent, unpaired samples.
    Columns {
        /// First sample.
        column1: String,
        /// Second sample.
        column2: String,
    },
    /// Split one numeric column by the two values of a group column.
    Groups {
        /// The numeric column being compared.
        value: String,
        /// Column with exactly two distinct non-null values per partition.
        group_column: String,
    },
}

impl TwoSampleMode {
    /// Picks the mode from optional selectors; exactly one must be given.
    ///
    /// ```
    /// use tabstat::{TestError, TwoSampleMode};
    ///
    /// assert_eq!(
    ///     TwoSampleMode::from_options("x", None, None),
    ///     Err(TestError::MissingMode)
    /// );
    /// assert!(
    ///     matches!(
    ///         TwoSampleMode::from_options("x", None, Some("arm")),
    ///         Ok(TwoSampleMode::Groups { .. })
    ///     ),
    ///     "a group column selects two-group mode"
    /// );
    /// ```
    pub fn from_options(
        column1: &str,
        column2: Option<&str>,
        group_column: Option<&str>,
    ) -> Result<Self, TestError> {
        match (column2, group_column) {
            (Some(column2), None) => Ok(Self::Columns {
                column1: column1.to_string(),
                column2: column2.to_string(),
            }),
            (None, Some(group_column)) => Ok(Self::Groups {
                value: column1.to_string(),
                group_column: group_column.to_string(),
            }),
            (None, None) => Err(TestError::MissingMode),
            (Some(_), Some(_)) => Err(TestError::ConflictingMode),
        }
    }
}

/// A two-sample Welch t-test.
///
/// In two-group mode the two group values are sorted by [`Value`] order:
/// `group1` is the smaller and `group2` the larger, so the statistic and
/// any one-sided alternative refer to `mean(group1) - mean(group2)`
/// regardless of row order.
///
/// [`Value`]: tabstat_core::Value
#[derive(Debug, Clone, PartialEq)]
pub struct TwoSampleTest {
    mode: TwoSampleMode,
    alternative: Alternative,
    group_by: Vec<String>,
    policy: CardinalityPolicy,
}

impl TwoSampleTest {
    /// Creates a two-sided, ungrouped test in the given mode.
    pub fn new(mode: TwoSampleMode) -> Self {
        Self {
            mode,
            alternative: Alternative::TwoSided,
            group_by: Vec::new(),
            policy: CardinalityPolicy::Raise,
        }
    }

    /// Compares two columns.
    pub fn columns(column1: impl Into<String>, column2: impl Into<String>) -> Self {
        Self::new(TwoSampleMode::Columns {
            column1: column1.into(),
            column2: column2.into(),
        })
    }

    /// Compares `value` between the two groups of `group_column`.
    pub fn groups(value: impl Into<String>, group_column: impl Into<String>) -> Self {
        Self::new(TwoSampleMode::Groups {
            value: value.into(),
            group_column: group_column.into(),
        })
    }

    /// Returns the sample mode.
    pub fn mode(&self) -> &TwoSampleMode {
        &self.mode
    }

    /// Sets the alternative hypothesis, applied to `mean1 - mean2`.
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Runs the test separately for each combination of these columns.
    pub fn with_group_by<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.group_by = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Sets how two-group partitions with the wrong number of groups are handled.
    pub fn with_cardinality_policy(mut self, policy: CardinalityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs the test with the `statrs` t distribution.
    pub fn run<'a>(&self, frame: impl Into<Frame<'a>>) -> Result<TestReport, TestError> {
        self.run_with(frame, &StudentT)
    }

    /// Runs the test with a caller-supplied t distribution.
    pub fn run_with<'a, D: TDistribution + ?Sized>(
        &self,
        frame: impl Into<Frame<'a>>,
        dist: &D,
    ) -> Result<TestReport, TestError> {
        let table = frame.into().materialize()?;
        let table: &Table = &table;
        let alternative = self.alternative;

        match &self.mode {
            TwoSampleMode::Columns { column1, column2 } => {
                let c1 = validate::value_column(table, column1)?;
                let c2 = validate::value_column(table, column2)?;
                let keys = validate::key_columns(table, &self.group_by)?;
                let partitions = partition_by(table, &self.group_by)?;
                log::debug!(
                    "two-column t-test '{column1}' vs '{column2}' ({alternative}): {} partition(s)",
                    partitions.len()
                );

                let records = partitions
                    .into_iter()
                    .map(|(key, part)| {
                        log::trace!("evaluating partition {key} ({} rows)", part.len());
                        let record = evaluate::two_columns(&part, c1, c2, alternative, dist);
                        (key, record)
                    })
                    .collect::<Vec<_>>();

                Ok(TestReport {
                    table: assemble::two_sample_table(&keys, None, &records)?,
                    skipped: Vec::new(),
                })
            }
            TwoSampleMode::Groups {
                value,
                group_column,
            } => {
                let v = validate::value_column(table, value)?;
                let g = validate::group_column(table, group_column)?;
                let keys = validate::key_columns(table, &self.group_by)?;
                let partitions = partition_by(table, &self.group_by)?;
                log::debug!(
                    "two-group t-test on '{value}' by '{group_column}' ({alternative}): {} partition(s)",
                    partitions.len()
                );

                let skip = self.policy == CardinalityPolicy::Skip && !self.group_by.is_empty();
                let mut records = Vec::with_capacity(partitions.len());
                let mut skipped = Vec::new();
                for (key, part) in partitions {
                    log::trace!("evaluating partition {key} ({} rows)", part.len());
                    match evaluate::two_groups(&part, v, g, alternative, dist) {
                        Ok(record) => records.push((key, record)),
                        Err(err @ TestError::GroupCardinality { .. }) if skip => {
                            log::warn!("skipping partition {key}: {err}");
                            skipped.push(key);
                        }
                        Err(err) => return Err(err),
                    }
                }

                Ok(TestReport {
                    table: assemble::two_sample_table(&keys, Some(g), &records)?,
                    skipped,
                })
            }
        }
    }
}

/// One-sample t-test of `column` against `mu`, returning the result table.
///
/// `alternative` is one of `two-sided`, `greater` or `less`. With a
/// non-empty `group_by` the result has one row per observed key combination.
pub fn one_sample_test<'a>(
    frame: impl Into<Frame<'a>>,
    column: &str,
    mu: f64,
    alternative: &str,
    group_by: &[&str],
) -> Result<Table, TestError> {
    let alternative = alternative.parse()?;
    OneSampleTest::new(column)
        .with_mu(mu)
        .with_alternative(alternative)
        .with_group_by(group_by)
        .run(frame)
        .map(TestReport::into_table)
}

/// Two-sample Welch t-test, returning the result table.
///
/// Exactly one of `column2` (two-column mode) and `group_column` (two-group
/// mode) must be given. Cardinality violations always raise here; use
/// [`TwoSampleTest::with_cardinality_policy`] to skip them instead.
pub fn two_sample_test<'a>(
    frame: impl Into<Frame<'a>>,
    column1: &str,
    column2: Option<&str>,
    group_column: Option<&str>,
    alternative: &str,
    group_by: &[&str],
) -> Result<Table, TestError> {
    let mode = TwoSampleMode::from_options(column1, column2, group_column)?;
    let alternative = alternative.parse()?;
    TwoSampleTest::new(mode)
        .with_alternative(alternative)
        .with_group_by(group_by)
        .run(frame)
        .map(TestReport::into_table)
}
