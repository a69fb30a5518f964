// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Student's t distribution and directional p-values.

use core::fmt;
use core::str::FromStr;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::TestError;

/// p-values strictly below this are flagged `significant_at_0.05`.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// The alternative hypothesis, i.e. the direction of the test.
///
/// For two-sample tests the direction refers to `mean1 - mean2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alternative {
    /// `mean != mu` (or `mean1 != mean2`).
    #[default]
    TwoSided,
    /// `mean > mu` (or `mean1 > mean2`).
    Greater,
    /// `mean < mu` (or `mean1 < mean2`).
    Less,
}

impl Alternative {
    /// Returns the tag used in result tables: `two-sided`, `greater` or `less`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Greater => "greater",
            Self::Less => "less",
        }
    }

    /// Computes the p-value of `t` with `df` degrees of freedom under `dist`.
    ///
    /// - two-sided: `2 * (1 - F(|t|))`
    /// - greater: `1 - F(t)`
    /// - less: `F(t)`
    pub fn p_value<D: TDistribution + ?Sized>(self, dist: &D, t: f64, df: f64) -> f64 {
        match self {
            Self::TwoSided => 2.0 * (1.0 - dist.cdf(t.abs(), df)),
            Self::Greater => 1.0 - dist.cdf(t, df),
            Self::Less => dist.cdf(t, df),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = TestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-sided" => Ok(Self::TwoSided),
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            other => Err(TestError::UnknownAlternative(other.to_string())),
        }
    }
}

/// A cumulative distribution function for Student's t.
///
/// The engine only ever asks for `P(T <= t)`; implementations may be swapped
/// for testing or for a different numerical backend.
pub trait TDistribution {
    /// Returns `P(T <= t)` for `df` degrees of freedom.
    ///
    /// `df` may be fractional (Welch-Satterthwaite). Implementations should
    /// return `NaN` for `df <= 0` or a NaN `t`.
    fn cdf(&self, t: f64, df: f64) -> f64;
}

/// The `statrs`-backed standard t distribution (location 0, scale 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentT;

impl TDistribution for StudentT {
    fn cdf(&self, t: f64, df: f64) -> f64 {
        if t.is_nan() || df.is_nan() || df <= 0.0 {
            return f64::NAN;
        }
        if t == f64::INFINITY {
            return 1.0;
        }
        if t == f64::NEG_INFINITY {
            return 0.0;
        }
        match StudentsT::new(0.0, 1.0, df) {
            Ok(d) => d.cdf(t),
            Err(_) => f64::NAN,
        }
    }
}
