// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns keyed records into one result table.
//!
//! Output columns are the group-by keys (in caller order) followed by the
//! mode's fixed column list. The schema never depends on the data: a call in
//! which every record is null-filled, or in which there are no records at
//! all, produces the same columns with the same types.

use tabstat_core::{Column, GroupKey, Table, TableError, Value};

use super::record::{
    ONE_SAMPLE_COLUMNS, OneSampleRecord, TStatistic, TWO_SAMPLE_COLUMNS, TwoSampleRecord,
};

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn key_columns(
    keys: &[&Column],
    rows: impl Iterator<Item = GroupKey> + Clone,
) -> Result<Vec<Column>, TableError> {
    keys.iter()
        .enumerate()
        .map(|(i, source)| {
            Column::from_values(
                source.name_arc().clone(),
                source.data_type(),
                rows.clone()
                    .map(|key| key.get(i).cloned().unwrap_or(Value::Null)),
            )
        })
        .collect()
}

/// Appends `t_statistic, df, p_value, alternative, significant_at_0.05`.
fn push_stat_columns<'r>(
    out: &mut Vec<Column>,
    names: &[&str; 5],
    stats: impl Iterator<Item = (Option<&'r TStatistic>, &'static str)> + Clone,
) {
    let [t, df, p, alt, sig] = names;
    out.push(Column::new(
        *t,
        stats.clone().map(|(s, _)| s.map(|s| s.t)).collect::<Vec<_>>(),
    ));
    out.push(Column::new(
        *df,
        stats.clone().map(|(s, _)| s.map(|s| s.df)).collect::<Vec<_>>(),
    ));
    out.push(Column::new(
        *p,
        stats
            .clone()
            .map(|(s, _)| s.map(|s| s.p_value))
            .collect::<Vec<_>>(),
    ));
    out.push(Column::new(
        *alt,
        stats.clone().map(|(_, a)| a).collect::<Vec<_>>(),
    ));
    out.push(Column::new(
        *sig,
        stats
            .map(|(s, _)| s.map(TStatistic::significant))
            .collect::<Vec<_>>(),
    ));
}

pub(crate) fn one_sample_table(
    keys: &[&Column],
    records: &[(GroupKey, OneSampleRecord)],
) -> Result<Table, TableError> {
    let mut out = key_columns(keys, records.iter().map(|(k, _)| k.clone()))?;
    let [n, mean, sd, rest @ ..] = &ONE_SAMPLE_COLUMNS;
    let rows = || records.iter().map(|(_, r)| r);

    out.push(Column::new(
        *n,
        rows().map(|r| count(r.n)).collect::<Vec<_>>(),
    ));
    out.push(Column::new(*mean, rows().map(|r| r.mean).collect::<Vec<_>>()));
    out.push(Column::new(*sd, rows().map(|r| r.std).collect::<Vec<_>>()));
    push_stat_columns(
        &mut out,
        rest,
        rows().map(|r| (r.stat.as_ref(), r.alternative.as_str())),
    );
    Table::new(out)
}

/// `group_column` is set in two-group mode; its type types `group1`/`group2`.
pub(crate) fn two_sample_table(
    keys: &[&Column],
    group_column: Option<&Column>,
    records: &[(GroupKey, TwoSampleRecord)],
) -> Result<Table, TableError> {
    let mut out = key_columns(keys, records.iter().map(|(k, _)| k.clone()))?;
    let rows = || records.iter().map(|(_, r)| r);

    if let Some(source) = group_column {
        let dtype = source.data_type();
        let pick = |first: bool| {
            rows().map(move |r| match &r.groups {
                Some((g1, g2)) => {
                    if first {
                        g1.clone()
                    } else {
                        g2.clone()
                    }
                }
                None => Value::Null,
            })
        };
        out.push(Column::from_values("group1", dtype, pick(true))?);
        out.push(Column::from_values("group2", dtype, pick(false))?);
    }

    let [n1, n2, mean1, mean2, std1, std2, rest @ ..] = &TWO_SAMPLE_COLUMNS;
    out.push(Column::new(
        *n1,
        rows().map(|r| count(r.n1)).collect::<Vec<_>>(),
    ));
    out.push(Column::new(
        *n2,
        rows().map(|r| count(r.n2)).collect::<Vec<_>>(),
    ));
    out.push(Column::new(*mean1, rows().map(|r| r.mean1).collect::<Vec<_>>()));
    out.push(Column::new(*mean2, rows().map(|r| r.mean2).collect::<Vec<_>>()));
    out.push(Column::new(*std1, rows().map(|r| r.std1).collect::<Vec<_>>()));
    out.push(Column::new(*std2, rows().map(|r| r.std2).collect::<Vec<_>>()));
    push_stat_columns(
        &mut out,
        rest,
        rows().map(|r| (r.stat.as_ref(), r.alternative.as_str())),
    );
    Table::new(out)
}
