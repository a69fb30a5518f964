// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-shape per-partition result records.

use tabstat_core::Value;

use crate::dist::{Alternative, SIGNIFICANCE_LEVEL};

/// Output columns of a one-sample test, after any group-by keys.
pub const ONE_SAMPLE_COLUMNS: [&str; 8] = [
    "n",
    "mean",
    "std",
    "t_statistic",
    "df",
    "p_value",
    "alternative",
    "significant_at_0.05",
];

/// Output columns of a two-sample test, after any group-by keys.
///
/// Two-group mode prefixes these with `group1, group2`.
pub const TWO_SAMPLE_COLUMNS: [&str; 11] = [
    "n1",
    "n2",
    "mean1",
    "mean2",
    "std1",
    "std2",
    "t_statistic",
    "df",
    "p_value",
    "alternative",
    "significant_at_0.05",
];

/// The statistic shared by every test mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TStatistic {
    /// The t statistic.
    pub t: f64,
    /// Degrees of freedom (possibly fractional).
    pub df: f64,
    /// p-value under the record's alternative.
    pub p_value: f64,
}

impl TStatistic {
    /// Returns `true` if `p_value < 0.05`.
    pub fn significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_LEVEL
    }
}

/// One row of a one-sample test.
///
/// With fewer than two observations every `Option` is `None` and only `n` is
/// meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct OneSampleRecord {
    /// Number of non-null observations.
    pub n: usize,
    /// Sample mean.
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor `n - 1`).
    pub std: Option<f64>,
    /// Test statistic, degrees of freedom and p-value.
    pub stat: Option<TStatistic>,
    /// Direction of the test.
    pub alternative: Alternative,
}

impl OneSampleRecord {
    pub(crate) fn insufficient(n: usize, alternative: Alternative) -> Self {
        Self {
            n,
            mean: None,
            std: None,
            stat: None,
            alternative,
        }
    }

    /// The `significant_at_0.05` flag.
    pub fn significant(&self) -> Option<bool> {
        self.stat.as_ref().map(TStatistic::significant)
    }
}

/// One row of a two-sample test, in either mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoSampleRecord {
    /// In two-group mode, the sorted `(group1, group2)` values.
    pub groups: Option<(Value, Value)>,
    /// Observations in the first sample.
    pub n1: usize,
    /// Observations in the second sample.
    pub n2: usize,
    /// Mean of the first sample.
    pub mean1: Option<f64>,
    /// Mean of the second sample.
    pub mean2: Option<f64>,
    /// Standard deviation of the first sample.
    pub std1: Option<f64>,
    /// Standard deviation of the second sample.
    pub std2: Option<f64>,
    /// Welch statistic, Welch-Satterthwaite df and p-value.
    pub stat: Option<TStatistic>,
    /// Direction of the test, applied to `mean1 - mean2`.
    pub alternative: Alternative,
}

impl TwoSampleRecord {
    pub(crate) fn insufficient(n1: usize, n2: usize, alternative: Alternative) -> Self {
        Self {
            groups: None,
            n1,
            n2,
            mean1: None,
            mean2: None,
            std1: None,
            std2: None,
            stat: None,
            alternative,
        }
    }

    /// The `significant_at_0.05` flag.
    pub fn significant(&self) -> Option<bool> {
        self.stat.as_ref().map(TStatistic::significant)
    }
}
