// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-partition test evaluation.

use tabstat_core::{Column, Partition, Value};

use super::record::{OneSampleRecord, TStatistic, TwoSampleRecord};
use super::sample::{SampleStats, t_statistic, welch_df};
use crate::TestError;
use crate::dist::{Alternative, TDistribution};

pub(crate) fn one_sample<D: TDistribution + ?Sized>(
    part: &Partition<'_>,
    column: &Column,
    mu: f64,
    alternative: Alternative,
    dist: &D,
) -> OneSampleRecord {
    let values = part.numeric_values(column);
    let Some(s) = SampleStats::from_values(&values) else {
        return OneSampleRecord::insufficient(values.len(), alternative);
    };

    let se = s.std() / (s.n as f64).sqrt();
    let t = t_statistic(s.mean - mu, se);
    let df = (s.n - 1) as f64;
    OneSampleRecord {
        n: s.n,
        mean: Some(s.mean),
        std: Some(s.std()),
        stat: Some(TStatistic {
            t,
            df,
            p_value: alternative.p_value(dist, t, df),
        }),
        alternative,
    }
}

/// Compares two columns as independent samples; rows are not paired.
pub(crate) fn two_columns<D: TDistribution + ?Sized>(
    part: &Partition<'_>,
    column1: &Column,
    column2: &Column,
    alternative: Alternative,
    dist: &D,
) -> TwoSampleRecord {
    let x1 = part.numeric_values(column1);
    let x2 = part.numeric_values(column2);
    welch(&x1, &x2, alternative, dist)
}

/// Splits `value` by the two distinct values of `group_column` and compares them.
///
/// The smaller group value (by [`tabstat_core::Value`] ordering) is sample 1.
pub(crate) fn two_groups<D: TDistribution + ?Sized>(
    part: &Partition<'_>,
    value: &Column,
    group_column: &Column,
    alternative: Alternative,
    dist: &D,
) -> Result<TwoSampleRecord, TestError> {
    let groups = part.distinct_values(group_column);
    let found = groups.len();
    let Ok(mut pair) = <[Value; 2]>::try_from(groups) else {
        return Err(TestError::GroupCardinality {
            column: group_column.name().to_string(),
            found,
        });
    };
    pair.sort();
    let [g1, g2] = pair;

    let mut x1 = Vec::new();
    let mut x2 = Vec::new();
    for row in part.rows() {
        let Some(v) = value.f64(row) else {
            continue;
        };
        let g = group_column.get(row);
        if g == g1 {
            x1.push(v);
        } else if g == g2 {
            x2.push(v);
        }
    }

    let mut record = welch(&x1, &x2, alternative, dist);
    record.groups = Some((g1, g2));
    Ok(record)
}

fn welch<D: TDistribution + ?Sized>(
    x1: &[f64],
    x2: &[f64],
    alternative: Alternative,
    dist: &D,
) -> TwoSampleRecord {
    let (Some(s1), Some(s2)) = (SampleStats::from_values(x1), SampleStats::from_values(x2))
    else {
        return TwoSampleRecord::insufficient(x1.len(), x2.len(), alternative);
    };

    let se = (s1.se2() + s2.se2()).sqrt();
    let t = t_statistic(s1.mean - s2.mean, se);
    let df = welch_df(s1.var, s1.n, s2.var, s2.n);
    TwoSampleRecord {
        groups: None,
        n1: s1.n,
        n2: s2.n,
        mean1: Some(s1.mean),
        mean2: Some(s2.mean),
        std1: Some(s1.std()),
        std2: Some(s2.std()),
        stat: Some(TStatistic {
            t,
            df,
            p_value: alternative.p_value(dist, t, df),
        }),
        alternative,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tabstat_core::Table;

    use super::*;
    use crate::dist::StudentT;

    fn whole(table: &Table) -> Partition<'_> {
        Partition::whole(table)
    }

    #[test]
    fn one_sample_centered_data_has_zero_t() {
        let t = Table::new(vec![Column::new("x", vec![1.0, 2.0, 3.0, 4.0, 5.0])]).unwrap();
        let c = t.column("x").unwrap();
        let r = one_sample(&whole(&t), c, 3.0, Alternative::TwoSided, &StudentT);
        assert_eq!(r.n, 5);
        assert_eq!(r.mean, Some(3.0));
        let stat = r.stat.unwrap();
        assert!(stat.t.abs() < 1e-9, "t should vanish, got {}", stat.t);
        assert_eq!(stat.df, 4.0);
        assert!(stat.p_value > 0.95, "p should be near one, got {}", stat.p_value);
        assert_eq!(r.significant(), Some(false));
    }

    #[test]
    fn one_sample_known_values() {
        // mean 5.5, sd 3.02765, se 0.957427, t = (5.5 - 4) / se = 1.566699
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let t = Table::new(vec![Column::new("x", data)]).unwrap();
        let c = t.column("x").unwrap();
        let r = one_sample(&whole(&t), c, 4.0, Alternative::Greater, &StudentT);
        let stat = r.stat.unwrap();
        assert_abs_diff_eq!(r.std.unwrap(), 3.027_650_354, epsilon = 1e-8);
        assert_abs_diff_eq!(stat.t, 1.566_698_903, epsilon = 1e-8);
        assert_eq!(stat.df, 9.0);
        // One-sided p for t = 1.5667 at df 9 lies between the 0.10 and 0.05 critical values.
        assert!(stat.p_value > 0.05 && stat.p_value < 0.10, "{}", stat.p_value);
    }

    #[test]
    fn one_sample_constant_sample_is_unbounded() {
        let t = Table::new(vec![Column::new("x", vec![2.0, 2.0, 2.0])]).unwrap();
        let c = t.column("x").unwrap();
        let r = one_sample(&whole(&t), c, 1.0, Alternative::TwoSided, &StudentT);
        let stat = r.stat.unwrap();
        assert_eq!(stat.t, f64::INFINITY);
        assert_eq!(stat.p_value, 0.0);
        assert_eq!(r.significant(), Some(true));

        let r = one_sample(&whole(&t), c, 2.0, Alternative::TwoSided, &StudentT);
        let stat = r.stat.unwrap();
        assert_eq!(stat.t, 0.0);
        assert_abs_diff_eq!(stat.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn one_sample_single_value_is_insufficient() {
        let t = Table::new(vec![Column::new("x", vec![Some(42.0), None])]).unwrap();
        let c = t.column("x").unwrap();
        let r = one_sample(&whole(&t), c, 0.0, Alternative::Less, &StudentT);
        assert_eq!(r, OneSampleRecord::insufficient(1, Alternative::Less));
        assert_eq!(r.significant(), None);
    }

    #[test]
    fn two_columns_are_unpaired() {
        let t = Table::new(vec![
            Column::new("a", vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]),
            Column::new("b", vec![Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)]),
        ])
        .unwrap();
        let r = two_columns(
            &whole(&t),
            t.column("a").unwrap(),
            t.column("b").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        );
        assert_eq!((r.n1, r.n2), (4, 4));
        assert_eq!(r.mean1, Some(3.0));
        assert_eq!(r.mean2, Some(4.25));
        assert!(r.groups.is_none(), "two-column mode has no group values");
    }

    #[test]
    fn two_columns_welch_reference() {
        // Hand-computed: m1 = 3, v1 = 2.5, m2 = 7, v2 = 10 (n = 5 each)
        // se = sqrt(0.5 + 2) = 1.581139, t = -2.529822
        // df = 6.25 / (0.25/4 + 4/4) = 5.882353
        let t = Table::new(vec![
            Column::new("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::new("b", vec![3.0, 5.0, 7.0, 9.0, 11.0]),
        ])
        .unwrap();
        let r = two_columns(
            &whole(&t),
            t.column("a").unwrap(),
            t.column("b").unwrap(),
            Alternative::Less,
            &StudentT,
        );
        let stat = r.stat.unwrap();
        assert_abs_diff_eq!(stat.t, -2.529_822_128, epsilon = 1e-8);
        assert_abs_diff_eq!(stat.df, 5.882_352_941, epsilon = 1e-8);
        assert!(stat.p_value < 0.05, "a lies clearly below b, got p = {}", stat.p_value);
        let greater = Alternative::Greater.p_value(&StudentT, stat.t, stat.df);
        assert_abs_diff_eq!(stat.p_value + greater, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn two_columns_insufficient_reports_both_sizes() {
        let t = Table::new(vec![
            Column::new("a", vec![Some(1.0), None]),
            Column::new("b", vec![2.0, 3.0]),
        ])
        .unwrap();
        let r = two_columns(
            &whole(&t),
            t.column("a").unwrap(),
            t.column("b").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        );
        assert_eq!((r.n1, r.n2), (1, 2));
        assert!(
            r.stat.is_none() && r.mean2.is_none(),
            "an insufficient sample nulls every statistic"
        );
    }

    #[test]
    fn two_groups_sorts_group_values() {
        let t = Table::new(vec![
            Column::new("v", vec![10.0, 1.0, 11.0, 2.0, 12.0, 3.0]),
            Column::new(
                "arm",
                vec!["Treatment", "Control", "Treatment", "Control", "Treatment", "Control"],
            ),
        ])
        .unwrap();
        let r = two_groups(
            &whole(&t),
            t.column("v").unwrap(),
            t.column("arm").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        )
        .unwrap();
        assert_eq!(
            r.groups,
            Some((Value::from("Control"), Value::from("Treatment")))
        );
        assert_eq!(r.mean1, Some(2.0));
        assert_eq!(r.mean2, Some(11.0));
        assert!(r.stat.unwrap().t < 0.0, "Control has the lower mean");
    }

    #[test]
    fn two_groups_ignores_null_group_values() {
        let t = Table::new(vec![
            Column::new("v", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::new("g", vec![Some(1_i64), Some(2), None, Some(1), Some(2)]),
        ])
        .unwrap();
        let r = two_groups(
            &whole(&t),
            t.column("v").unwrap(),
            t.column("g").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        )
        .unwrap();
        assert_eq!((r.n1, r.n2), (2, 2));
        assert_eq!(r.groups, Some((Value::Int(1), Value::Int(2))));
    }

    #[test]
    fn two_groups_drops_null_values_from_counts() {
        let t = Table::new(vec![
            Column::new(
                "v",
                vec![
                    Some(1.0),
                    None,
                    Some(3.0),
                    Some(10.0),
                    None,
                    Some(12.0),
                    Some(14.0),
                ],
            ),
            Column::new("g", vec!["a", "a", "a", "b", "b", "b", "b"]),
        ])
        .unwrap();
        let r = two_groups(
            &whole(&t),
            t.column("v").unwrap(),
            t.column("g").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        )
        .unwrap();
        assert_eq!((r.n1, r.n2), (2, 3));
        assert_eq!(r.mean1, Some(2.0));
        assert_eq!(r.mean2, Some(12.0));
        assert!(r.stat.is_some(), "both groups have two or more values");
    }

    #[test]
    fn two_groups_requires_exactly_two_values() {
        let t = Table::new(vec![
            Column::new("v", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Column::new("g", vec!["A", "B", "C", "A", "B", "C"]),
        ])
        .unwrap();
        let err = two_groups(
            &whole(&t),
            t.column("v").unwrap(),
            t.column("g").unwrap(),
            Alternative::TwoSided,
            &StudentT,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TestError::GroupCardinality {
                column: "g".into(),
                found: 3,
            }
        );
        assert_eq!(err.to_string(), "g must have exactly 2 unique values, found 3");
    }
}
