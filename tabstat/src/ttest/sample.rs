// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-sample moments and the Welch formulas.

/// Mean and Bessel-corrected variance of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SampleStats {
    pub(crate) n: usize,
    pub(crate) mean: f64,
    pub(crate) var: f64,
}

impl SampleStats {
    /// Returns `None` below two observations, where the variance is undefined.
    pub(crate) fn from_values(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;
        let ss = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        Some(Self {
            n,
            mean,
            var: ss / (nf - 1.0),
        })
    }

    pub(crate) fn std(&self) -> f64 {
        self.var.sqrt()
    }

    /// Squared standard error of the mean, `var / n`.
    pub(crate) fn se2(&self) -> f64 {
        self.var / self.n as f64
    }
}

/// Divides a mean difference by its standard error.
///
/// A zero standard error means a zero-variance sample: the statistic is
/// unbounded with the sign of `diff`, and exactly zero when `diff` is zero.
pub(crate) fn t_statistic(diff: f64, se: f64) -> f64 {
    if se > 0.0 {
        diff / se
    } else if diff > 0.0 {
        f64::INFINITY
    } else if diff < 0.0 {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

/// Welch-Satterthwaite effective degrees of freedom.
///
/// ```text
/// df = (v1/n1 + v2/n2)^2 / ((v1/n1)^2/(n1-1) + (v2/n2)^2/(n2-1))
/// ```
///
/// Falls back to the pooled `n1 + n2 - 2` when either variance is exactly
/// zero or the denominator is not positive. Both sample sizes must be at
/// least two.
///
/// ```
/// let df = tabstat::welch_df(4.0, 50, 9.0, 50);
/// assert!((df - 85.37).abs() < 0.01, "df = {df}");
/// ```
pub fn welch_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
    let pooled = (n1 + n2) as f64 - 2.0;
    if var1 == 0.0 || var2 == 0.0 {
        return pooled;
    }
    let (n1, n2) = (n1 as f64, n2 as f64);
    let a = var1 / n1;
    let b = var2 / n2;
    let denom = a * a / (n1 - 1.0) + b * b / (n2 - 1.0);
    if denom > 0.0 {
        (a + b).powi(2) / denom
    } else {
        pooled
    }
}
