// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walkthrough of the `tabstat` t-tests on seeded synthetic data.

use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

use rand_distr::{Distribution, Normal, NormalError};
use tabstat::{
    Alternative, CardinalityPolicy, Column, CompareOp, Table, TestError, TwoSampleTest, Value,
    one_sample_test, summarize, two_sample_test,
};

#[derive(Debug, Parser)]
#[command(about = "Run the tabstat t-test examples on synthetic data")]
struct Args {
    /// Seed for the random samples.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Also print a descriptive summary of each input table.
    #[arg(long)]
    summary: bool,
}

/// Draws `n` samples from `N(mean, sd)`; `sd` must be finite and positive.
fn normal(rng: &mut StdRng, mean: f64, sd: f64, n: usize) -> Result<Vec<f64>, NormalError> {
    let dist = Normal::new(mean, sd)?;
    log::trace!("drawing {n} samples from N({mean}, {sd})");
    Ok(dist.sample_iter(rng).take(n).collect())
}

fn labels(groups: &[(&'static str, usize)]) -> Vec<&'static str> {
    groups
        .iter()
        .flat_map(|&(label, n)| std::iter::repeat_n(label, n))
        .collect()
}

fn render(table: &Table) -> comfy_table::Table {
    let mut out = comfy_table::Table::new();
    out.load_preset(UTF8_FULL);
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(table.column_names().map(Cell::new).collect::<Vec<_>>());
    for row in 0..table.row_count() {
        out.add_row(
            table
                .row(row)
                .iter()
                .map(|v| match v {
                    Value::Float(f) if f.is_finite() && f.abs() < 1e-3 && *f != 0.0 => {
                        Cell::new(format!("{f:.3e}"))
                    }
                    Value::Float(f) => Cell::new(format!("{f:.4}")),
                    other => Cell::new(other),
                })
                .collect::<Vec<_>>(),
        );
    }
    out
}

fn heading(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{title}");
    println!("{}", "=".repeat(80));
}

fn show(label: &str, table: &Table) {
    println!("\n{label}");
    println!("{}", render(table));
}

fn float(table: &Table, row: usize, column: &str) -> f64 {
    table
        .value(row, column)
        .and_then(|v| v.as_f64())
        .unwrap_or(f64::NAN)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let describe = |label: &str, table: &Table| -> Result<(), TestError> {
        if args.summary {
            show(&format!("Summary of {label}:"), &summarize(table)?);
        }
        Ok(())
    };

    heading("Example 1: one-sample test, is the mean different from 0?");
    let df1 = Table::new(vec![Column::new(
        "measurements",
        normal(&mut rng, 5.0, 2.0, 100)?,
    )])?;
    describe("measurements", &df1)?;
    let r1 = one_sample_test(&df1, "measurements", 0.0, "two-sided", &[])?;
    show("Result:", &r1);
    println!("- sample mean: {:.3}", float(&r1, 0, "mean"));
    println!("- t statistic: {:.3}", float(&r1, 0, "t_statistic"));
    println!("- p-value: {:.6}", float(&r1, 0, "p_value"));

    heading("Example 2: one-sample test, greater than 4.5");
    let r2 = one_sample_test(&df1, "measurements", 4.5, "greater", &[])?;
    show("Result (H1: mu > 4.5):", &r2);

    heading("Example 3: one-sample test per class");
    let mut scores = normal(&mut rng, 75.0, 10.0, 50)?;
    scores.extend(normal(&mut rng, 82.0, 10.0, 50)?);
    scores.extend(normal(&mut rng, 68.0, 10.0, 50)?);
    let df3 = Table::new(vec![
        Column::new("score", scores),
        Column::new("class", labels(&[("A", 50), ("B", 50), ("C", 50)])),
    ])?;
    describe("scores", &df3)?;
    let r3 = one_sample_test(&df3, "score", 70.0, "two-sided", &["class"])?;
    show("Results (H0: mu = 70 for each class):", &r3);

    heading("Example 4: two-sample test, comparing two columns");
    let df4 = Table::new(vec![
        Column::new("before_treatment", normal(&mut rng, 100.0, 15.0, 80)?),
        Column::new("after_treatment", normal(&mut rng, 105.0, 15.0, 80)?),
    ])?;
    let r4 = two_sample_test(
        &df4,
        "after_treatment",
        Some("before_treatment"),
        None,
        "greater",
        &[],
    )?;
    show("Result (H1: after > before):", &r4);
    println!(
        "- difference: {:.2}",
        float(&r4, 0, "mean1") - float(&r4, 0, "mean2")
    );

    heading("Example 5: two-sample test, A/B groups");
    let mut conversion = normal(&mut rng, 0.12, 0.03, 500)?;
    conversion.extend(normal(&mut rng, 0.15, 0.03, 500)?);
    let df5 = Table::new(vec![
        Column::new("conversion_rate", conversion),
        Column::new("variant", labels(&[("Control", 500), ("Treatment", 500)])),
    ])?;
    let r5 = two_sample_test(&df5, "conversion_rate", None, Some("variant"), "two-sided", &[])?;
    show("Result (Control vs Treatment):", &r5);
    println!(
        "- lift: {:.2}%",
        (float(&r5, 0, "mean2") / float(&r5, 0, "mean1") - 1.0) * 100.0
    );

    heading("Example 6: A/B tests per segment");
    let mut segment = Vec::new();
    let mut variant = Vec::new();
    let mut revenue = Vec::new();
    for name in ["Mobile", "Desktop", "Tablet"] {
        for (label, mean) in [("Control", 50.0), ("Treatment", 55.0)] {
            let draws = normal(&mut rng, mean, 10.0, 200)?;
            segment.extend(std::iter::repeat_n(name, draws.len()));
            variant.extend(std::iter::repeat_n(label, draws.len()));
            revenue.extend(draws);
        }
    }
    // A segment that only ran the control arm.
    let kiosk = normal(&mut rng, 48.0, 10.0, 40)?;
    segment.extend(std::iter::repeat_n("Kiosk", kiosk.len()));
    variant.extend(std::iter::repeat_n("Control", kiosk.len()));
    revenue.extend(kiosk);
    let df6 = Table::new(vec![
        Column::new("segment", segment),
        Column::new("revenue", revenue),
        Column::new("variant", variant),
    ])?;
    let report = TwoSampleTest::groups("revenue", "variant")
        .with_alternative(Alternative::TwoSided)
        .with_group_by(&["segment"])
        .with_cardinality_policy(CardinalityPolicy::Skip)
        .run(&df6)?;
    show("Results by segment:", &report.table);
    for key in &report.skipped {
        println!("- skipped segment {key}: needs exactly two variants");
    }

    heading("Example 7: quality control against a 100mm target");
    let df7 = Table::new(vec![
        Column::new("measurement_mm", normal(&mut rng, 100.5, 2.0, 150)?),
        Column::new(
            "machine",
            labels(&[("Machine_A", 50), ("Machine_B", 50), ("Machine_C", 50)]),
        ),
    ])?;
    let r7 = one_sample_test(&df7, "measurement_mm", 100.0, "two-sided", &["machine"])?;
    show("Results (H0: mu = 100mm):", &r7);

    heading("Example 8: lazy input");
    let values = normal(&mut rng, 50.0, 10.0, 10_000)?;
    let groups = (0..values.len())
        .map(|_| if rng.random_bool(0.5) { "A" } else { "B" })
        .collect::<Vec<_>>();
    let large = Table::new(vec![
        Column::new("value", values),
        Column::new("group", groups),
    ])?;
    let plan = large.lazy().filter("value", CompareOp::Gt, 0.0);
    let r8 = two_sample_test(plan, "value", None, Some("group"), "two-sided", &[])?;
    show("Result:", &r8);
    println!(
        "- sample sizes: n1={}, n2={}",
        r8.value(0, "n1").unwrap_or(Value::Null),
        r8.value(0, "n2").unwrap_or(Value::Null)
    );

    println!("\nDemo completed successfully!");
    Ok(())
}
