// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-column descriptive statistics.

use hashbrown::HashSet;
use tabstat_core::{Column, Frame, Table, Value};

use crate::TestError;

/// Output columns of [`summarize`], in order.
pub const SUMMARY_COLUMNS: [&str; 16] = [
    "variable",
    "type",
    "nobs",
    "pct_missing",
    "mean",
    "sd",
    "min",
    "max",
    "p1",
    "p5",
    "p25",
    "p50",
    "p75",
    "p95",
    "p99",
    "n_unique",
];

/// Quantile levels reported as `p1 ... p99`.
pub const QUANTILES: [f64; 7] = [0.01, 0.05, 0.25, 0.50, 0.75, 0.95, 0.99];

/// Broad kind of a column. Categorical sorts before numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableKind {
    /// Boolean or string columns.
    Categorical,
    /// Integer or float columns.
    Numeric,
}

impl VariableKind {
    /// Returns `categorical` or `numeric`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
        }
    }
}

/// Summary of one column.
///
/// Numeric statistics are `None` for categorical columns and for numeric
/// columns without usable (non-null, non-NaN) values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Column name.
    pub variable: String,
    /// Column kind.
    pub kind: VariableKind,
    /// Non-null cell count.
    pub nobs: usize,
    /// Percentage of null cells; `None` for an empty column.
    pub pct_missing: Option<f64>,
    /// Mean.
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values.
    pub sd: Option<f64>,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
    /// Nearest-rank quantiles at [`QUANTILES`].
    pub quantiles: [Option<f64>; 7],
    /// Distinct non-null values.
    pub n_unique: usize,
}

/// Summarizes one column.
pub fn summarize_column(column: &Column) -> ColumnSummary {
    let len = column.len();
    let nulls = column.null_count();
    let distinct = (0..len)
        .map(|row| column.get(row))
        .filter(|v| !v.is_null())
        .collect::<HashSet<Value>>();

    let mut summary = ColumnSummary {
        variable: column.name().to_string(),
        kind: VariableKind::Categorical,
        nobs: len - nulls,
        pct_missing: (len > 0).then(|| 100.0 * nulls as f64 / len as f64),
        mean: None,
        sd: None,
        min: None,
        max: None,
        quantiles: [None; 7],
        n_unique: distinct.len(),
    };
    if !column.is_numeric() {
        return summary;
    }
    summary.kind = VariableKind::Numeric;

    let mut values = (0..len).filter_map(|row| column.f64(row)).collect::<Vec<_>>();
    if values.is_empty() {
        return summary;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    summary.mean = Some(mean);
    if values.len() > 1 {
        let ss = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        summary.sd = Some((ss / (n - 1.0)).sqrt());
    }
    summary.min = values.first().copied();
    summary.max = values.last().copied();
    summary.quantiles = QUANTILES.map(|q| nearest_rank(&values, q));
    summary
}

/// Nearest-rank quantile of sorted, non-empty `values`.
fn nearest_rank(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = (q.clamp(0.0, 1.0) * last as f64).round();
    #[allow(clippy::cast_possible_truncation, reason = "clamped to index range")]
    let index = (pos as usize).min(last);
    sorted.get(index).copied()
}

/// Summarizes every column of the input, one row per column.
///
/// Categorical columns come first, then numeric, each in schema order. The
/// result columns are [`SUMMARY_COLUMNS`].
pub fn summarize<'a>(frame: impl Into<Frame<'a>>) -> Result<Table, TestError> {
    let table = frame.into().materialize()?;
    let mut rows = table
        .columns()
        .iter()
        .map(summarize_column)
        .collect::<Vec<_>>();
    rows.sort_by_key(|s| s.kind);
    log::debug!(
        "summarized {} columns over {} rows",
        rows.len(),
        table.row_count()
    );

    let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
    let stat = |f: fn(&ColumnSummary) -> Option<f64>| rows.iter().map(f).collect::<Vec<_>>();

    let [variable, kind, nobs, pct_missing, mean, sd, min, max, quantile_names @ .., n_unique] =
        &SUMMARY_COLUMNS;
    let mut columns = vec![
        Column::new(
            *variable,
            rows.iter().map(|s| s.variable.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            *kind,
            rows.iter().map(|s| s.kind.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(*nobs, rows.iter().map(|s| count(s.nobs)).collect::<Vec<_>>()),
        Column::new(*pct_missing, stat(|s| s.pct_missing)),
        Column::new(*mean, stat(|s| s.mean)),
        Column::new(*sd, stat(|s| s.sd)),
        Column::new(*min, stat(|s| s.min)),
        Column::new(*max, stat(|s| s.max)),
    ];
    for (i, name) in quantile_names.iter().enumerate() {
        columns.push(Column::new(
            *name,
            rows.iter()
                .map(|s| s.quantiles.get(i).copied().flatten())
                .collect::<Vec<_>>(),
        ));
    }
    columns.push(Column::new(
        *n_unique,
        rows.iter().map(|s| count(s.n_unique)).collect::<Vec<_>>(),
    ));
    Ok(Table::new(columns)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tabstat_core::{CompareOp, DataType};

    use super::*;

    #[test]
    fn numeric_column_statistics() {
        let values: Vec<Option<f64>> = (1..=100)
            .map(|i| Some(f64::from(i)))
            .chain([None, Some(f64::NAN)])
            .collect();
        let s = summarize_column(&Column::new("x", values));
        assert_eq!(s.kind, VariableKind::Numeric);
        assert_eq!(s.nobs, 101);
        assert_abs_diff_eq!(s.pct_missing.unwrap(), 100.0 / 102.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.mean.unwrap(), 50.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.sd.unwrap(), 29.011_491_975, epsilon = 1e-8);
        assert_eq!((s.min, s.max), (Some(1.0), Some(100.0)));
        // index = round(q * 99)
        assert_eq!(s.quantiles[0], Some(2.0));
        assert_eq!(s.quantiles[3], Some(51.0));
        assert_eq!(s.quantiles[6], Some(99.0));
        assert_eq!(s.n_unique, 101);
    }

    #[test]
    fn categorical_column_has_no_numeric_statistics() {
        let s = summarize_column(&Column::new("c", vec![Some("a"), Some("b"), Some("a"), None]));
        assert_eq!(s.kind, VariableKind::Categorical);
        assert_eq!(s.nobs, 3);
        assert_eq!(s.n_unique, 2);
        assert_eq!(s.mean, None);
        assert_eq!(s.quantiles, [None; 7]);
    }

    #[test]
    fn single_value_has_no_sd() {
        let s = summarize_column(&Column::new("x", vec![Some(3_i64), None]));
        assert_eq!(s.mean, Some(3.0));
        assert_eq!(s.sd, None);
        assert_eq!(s.quantiles, [Some(3.0); 7]);
    }

    #[test]
    fn summary_table_orders_categorical_first() {
        let t = Table::new(vec![
            Column::new("x", vec![1.0, 2.0, 3.0]),
            Column::new("flag", vec![true, false, true]),
            Column::new("n", vec![5_i64, 6, 7]),
            Column::new("name", vec!["a", "b", "c"]),
        ])
        .unwrap();
        let out = summarize(&t).unwrap();
        assert_eq!(
            out.column_names().collect::<Vec<_>>(),
            SUMMARY_COLUMNS.to_vec()
        );
        let order = (0..out.row_count())
            .map(|r| out.value(r, "variable").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                Value::from("flag"),
                Value::from("name"),
                Value::from("x"),
                Value::from("n"),
            ]
        );
        assert_eq!(out.value(0, "type"), Some(Value::from("categorical")));
        assert_eq!(out.value(3, "p50"), Some(Value::Float(6.0)));
        assert_eq!(out.column("nobs").unwrap().data_type(), DataType::Int);
    }

    #[test]
    fn summary_accepts_lazy_input() {
        let t = Table::new(vec![Column::new("x", vec![1.0, 2.0, 3.0, 4.0])]).unwrap();
        let out = summarize(t.lazy().filter("x", CompareOp::Gt, 2.0)).unwrap();
        assert_eq!(out.value(0, "nobs"), Some(Value::Int(2)));
        assert_eq!(out.value(0, "min"), Some(Value::Float(3.0)));
    }

    #[test]
    fn empty_table_has_no_missing_percentage() {
        let s = summarize_column(&Column::new("x", Vec::<f64>::new()));
        assert_eq!(s.nobs, 0);
        assert_eq!(s.pct_missing, None);
        assert_eq!(s.mean, None);
    }
}
