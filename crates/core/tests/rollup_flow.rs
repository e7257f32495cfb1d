//! Integration tests for the rollup engine over the built-in catalog
//! (PRD-125, Task 4.2).
//!
//! Exercises the full path a dashboard request takes: catalog lookup,
//! period resolution, plan/actual aggregation, and signal classification,
//! including the JSON shape the API layer serializes back to the UI.

use opsboard_core::{
    compute_quarter_and_ytd_rollups, compute_rollup, compute_rollup_for_key, plan::default_catalog,
    ActualValues, FiscalQuarter, MonthKey, Period, PeriodTag, SignalStatus,
};

const FISCAL_YEAR: i32 = 2025;

fn mk(month: u32) -> MonthKey {
    MonthKey::new(FISCAL_YEAR, month).unwrap()
}

fn actuals(entries: &[(u32, f64)]) -> ActualValues {
    entries.iter().map(|&(m, v)| (mk(m), v)).collect()
}

// ---------------------------------------------------------------------------
// Test: revenue YTD with a partial year of observations
// ---------------------------------------------------------------------------

/// Revenue actuals through April roll up against the January-April plan
/// window, not the full year, and an on-plan year reads green.
#[test]
fn revenue_ytd_through_april() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let revenue = catalog.require("revenue_net").unwrap();

    // Slightly ahead of plan each month.
    let observed = actuals(&[(1, 425_000.0), (2, 441_000.0), (3, 455_000.0), (4, 470_000.0)]);
    let result = compute_rollup(revenue, Period::YearToDate, &observed, None, None);

    // Plan window inferred from data density: Jan-Apr.
    let plan_jan_apr = 420_000.0 + 435_000.0 + 450_000.0 + 468_000.0;
    assert_eq!(result.plan, Some(plan_jan_apr));
    assert_eq!(result.actual, Some(1_791_000.0));
    assert_eq!(result.status, SignalStatus::Green);
}

// ---------------------------------------------------------------------------
// Test: point-in-time metric with a missing quarter end
// ---------------------------------------------------------------------------

/// Headcount observed for the first two months of Q1 but not March: the
/// quarter has no meaningful snapshot, so the rollup reports no actual and
/// a gray status while the plan side still resolves.
#[test]
fn headcount_quarter_missing_closing_month() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let headcount = catalog.require("headcount").unwrap();

    let observed = actuals(&[(1, 47.0), (2, 49.0)]);
    let result = compute_rollup(
        headcount,
        Period::Quarter(FiscalQuarter::Q1),
        &observed,
        None,
        None,
    );

    assert_eq!(result.plan, Some(50.0)); // March plan snapshot
    assert_eq!(result.actual, None);
    assert_eq!(result.status, SignalStatus::Gray);
}

// ---------------------------------------------------------------------------
// Test: percentage metric averages across a quarter
// ---------------------------------------------------------------------------

/// Gross margin for Q1 is the mean of the three monthly ratios on both the
/// plan and actual sides.
#[test]
fn gross_margin_quarter_averages() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let margin = catalog.require("gross_margin_pct").unwrap();

    let observed = actuals(&[(1, 0.61), (2, 0.62), (3, 0.63)]);
    let result = compute_rollup(
        margin,
        Period::Quarter(FiscalQuarter::Q1),
        &observed,
        None,
        None,
    );

    let plan_mean = (0.619 + 0.621 + 0.622) / 3.0;
    assert!((result.plan.unwrap() - plan_mean).abs() < 1e-9);
    assert!((result.actual.unwrap() - 0.62).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Test: batch summary view
// ---------------------------------------------------------------------------

/// The five-period batch matches per-period calls and reports future
/// quarters as plan-only gray entries.
#[test]
fn batch_summary_midyear() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let revenue = catalog.require("revenue_net").unwrap();

    let observed = actuals(&[
        (1, 410_000.0),
        (2, 430_000.0),
        (3, 452_000.0),
        (4, 460_000.0),
        (5, 478_000.0),
    ]);
    let batch = compute_quarter_and_ytd_rollups(revenue, &observed, None, None);

    assert_eq!(batch.len(), 5);
    for tag in PeriodTag::ALL {
        let single = compute_rollup(revenue, tag.period(), &observed, None, None);
        assert_eq!(batch[&tag], single, "mismatch for {tag:?}");
    }

    // Q1 fully observed; Q2 partially; Q3/Q4 untouched.
    assert_eq!(batch[&PeriodTag::Q1].actual, Some(1_292_000.0));
    assert_eq!(batch[&PeriodTag::Q3].actual, None);
    assert_eq!(batch[&PeriodTag::Q3].status, SignalStatus::Gray);
    assert_eq!(batch[&PeriodTag::Q4].status, SignalStatus::Gray);

    // YTD window stops at May, the latest observed month.
    let ytd_plan = 420_000.0 + 435_000.0 + 450_000.0 + 468_000.0 + 480_000.0;
    assert_eq!(batch[&PeriodTag::Ytd].plan, Some(ytd_plan));
}

// ---------------------------------------------------------------------------
// Test: unknown metric key
// ---------------------------------------------------------------------------

/// An unknown key degrades to the all-null gray result the same way a
/// known metric with no data does; the dashboard renders both as "no data".
#[test]
fn unknown_metric_key_is_all_null_gray() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let result = compute_rollup_for_key(
        &catalog,
        "not_a_metric",
        Period::YearToDate,
        &ActualValues::new(),
        None,
        None,
    );

    assert_eq!(result.plan, None);
    assert_eq!(result.actual, None);
    assert_eq!(result.variance, None);
    assert_eq!(result.variance_pct, None);
    assert_eq!(result.status, SignalStatus::Gray);
}

// ---------------------------------------------------------------------------
// Test: JSON shape consumed by the dashboard
// ---------------------------------------------------------------------------

/// The batch rollup serializes with lowercase period tags as object keys
/// and snake_case fields, which is the contract the UI reads.
#[test]
fn batch_serializes_with_period_tag_keys() {
    let catalog = default_catalog(FISCAL_YEAR).unwrap();
    let revenue = catalog.require("revenue_net").unwrap();

    let observed = actuals(&[(1, 430_000.0), (2, 440_000.0), (3, 455_000.0)]);
    let batch = compute_quarter_and_ytd_rollups(revenue, &observed, None, None);

    let json = serde_json::to_value(&batch).expect("batch serializes");
    assert!(json.get("q1").is_some());
    assert!(json.get("ytd").is_some());
    assert_eq!(json["q1"]["status"], "green");
    assert_eq!(json["q3"]["status"], "gray");
    assert_eq!(json["q3"]["variance_pct"], serde_json::Value::Null);
}
