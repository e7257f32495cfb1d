//! Plan-vs-actual rollup and signal engine (PRD-125).
//!
//! Pure functions only: the caller supplies a metric definition and a
//! sparse month->value map of observed actuals; the engine resolves the
//! reporting period, aggregates plan and actual independently, computes
//! variance, and classifies the gap into a traffic-light status.
//!
//! Missing data degrades to `None` values and a `Gray` status instead of
//! an error. Early in a fiscal year most future quarters legitimately have
//! no actuals yet, and a dashboard call must not fail over that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{AggregationRule, Direction, MetricCatalog, MetricDefinition, MetricUnit};
use crate::month::MonthKey;
use crate::period::{months_in_period, Period, PeriodTag};
use crate::tolerance::ToleranceConfig;

/// Observed monthly values for one metric, keyed by month. Sparse: absent
/// months are excluded from aggregation, never treated as zero.
pub type ActualValues = BTreeMap<MonthKey, f64>;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Traffic-light classification of actual vs. plan for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Green,
    Yellow,
    Red,
    /// Comparison not meaningful: plan or actual absent, or plan is zero.
    Gray,
}

/// Plan-vs-actual comparison for one metric over one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupResult {
    pub plan: Option<f64>,
    pub actual: Option<f64>,
    /// `actual - plan`; `None` unless both sides are present and plan != 0.
    pub variance: Option<f64>,
    /// Variance as a percentage of plan; same presence rule as `variance`.
    pub variance_pct: Option<f64>,
    pub status: SignalStatus,
}

impl RollupResult {
    /// The "nothing to report" result: every value absent, `Gray` status.
    pub fn empty() -> Self {
        Self {
            plan: None,
            actual: None,
            variance: None,
            variance_pct: None,
            status: SignalStatus::Gray,
        }
    }
}

// ---------------------------------------------------------------------------
// Cutoff inference
// ---------------------------------------------------------------------------

/// Latest month carrying any observed value.
///
/// This is the implicit year-to-date cutoff used when a caller supplies
/// none: the engine has no clock, so the shape of the data stands in for
/// "now". Exposed so call sites can make the inference explicit instead,
/// which is preferred for anything user-facing.
pub fn latest_actual_month(actuals: &ActualValues) -> Option<MonthKey> {
    actuals.keys().next_back().copied()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Reduce per-month values to one period value.
///
/// `months` is the resolved window in calendar order; `source` is either a
/// plan's months or caller-supplied actuals. Months absent from `source`
/// are dropped, and an empty remainder yields `None` ("not ready").
///
/// Percentage metrics always average the present months regardless of the
/// aggregation rule; a ratio summed across months is meaningless. A
/// point-in-time metric takes the value at the window's closing month, or
/// `None` when that month is absent, even if earlier months have data.
/// Everything else sums.
pub fn aggregate_monthly_values(
    unit: MetricUnit,
    rule: AggregationRule,
    months: &[MonthKey],
    source: &BTreeMap<MonthKey, f64>,
) -> Option<f64> {
    let present: Vec<f64> = months.iter().filter_map(|m| source.get(m).copied()).collect();
    if present.is_empty() {
        return None;
    }

    match (unit, rule) {
        (MetricUnit::Percentage, _) => {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        }
        (_, AggregationRule::PointInTime) => {
            months.last().and_then(|m| source.get(m).copied())
        }
        (_, AggregationRule::PeriodSum) => Some(present.iter().sum()),
    }
}

// ---------------------------------------------------------------------------
// Signal classification
// ---------------------------------------------------------------------------

/// Classify the actual/plan gap into a signal status.
///
/// `Gray` when either side is absent or plan is zero; otherwise the
/// actual/plan ratio is banded by the metric's improvement direction.
pub fn classify_signal(
    plan: Option<f64>,
    actual: Option<f64>,
    direction: Direction,
    tolerance: &ToleranceConfig,
) -> SignalStatus {
    let (Some(plan), Some(actual)) = (plan, actual) else {
        return SignalStatus::Gray;
    };
    if plan == 0.0 {
        return SignalStatus::Gray;
    }

    let ratio = actual / plan;
    match direction {
        Direction::IncreaseIsGood => {
            if ratio >= 1.0 {
                SignalStatus::Green
            } else if ratio >= 1.0 - tolerance.yellow_threshold {
                SignalStatus::Yellow
            } else {
                SignalStatus::Red
            }
        }
        Direction::DecreaseIsGood => {
            if ratio <= 1.0 {
                SignalStatus::Green
            } else if ratio <= 1.0 + tolerance.yellow_threshold {
                SignalStatus::Yellow
            } else {
                SignalStatus::Red
            }
        }
        Direction::TargetIsFlat => {
            let deviation = (ratio - 1.0).abs();
            if deviation <= tolerance.yellow_threshold {
                SignalStatus::Green
            } else if deviation <= tolerance.red_threshold {
                SignalStatus::Yellow
            } else {
                SignalStatus::Red
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rollup
// ---------------------------------------------------------------------------

/// Compute the full plan-vs-actual rollup for one metric and one period.
///
/// `cutoff` bounds year-to-date windows; when `None` it is inferred from
/// the latest observed month ([`latest_actual_month`]). `tolerance`
/// defaults from the metric's unit when not supplied.
pub fn compute_rollup(
    def: &MetricDefinition,
    period: Period,
    actuals: &ActualValues,
    cutoff: Option<MonthKey>,
    tolerance: Option<&ToleranceConfig>,
) -> RollupResult {
    let Some(fiscal_year) = def.fiscal_year() else {
        return RollupResult::empty();
    };
    let cutoff = cutoff.or_else(|| latest_actual_month(actuals));
    let months = months_in_period(period, fiscal_year, cutoff);

    let plan = aggregate_monthly_values(def.unit, def.aggregation, &months, &def.months);
    let actual = aggregate_monthly_values(def.unit, def.aggregation, &months, actuals);

    let (variance, variance_pct) = match (plan, actual) {
        (Some(p), Some(a)) if p != 0.0 => (Some(a - p), Some((a - p) / p * 100.0)),
        _ => (None, None),
    };

    let tolerance = tolerance
        .copied()
        .unwrap_or_else(|| ToleranceConfig::for_unit(def.unit));
    let status = classify_signal(plan, actual, def.direction, &tolerance);

    RollupResult {
        plan,
        actual,
        variance,
        variance_pct,
        status,
    }
}

/// Rollup by metric key.
///
/// An unknown key is reported identically to "known metric, no data yet":
/// an all-`None` `Gray` result, with a warning for the log stream. Callers
/// that need a hard failure use [`MetricCatalog::require`] up front.
pub fn compute_rollup_for_key(
    catalog: &MetricCatalog,
    key: &str,
    period: Period,
    actuals: &ActualValues,
    cutoff: Option<MonthKey>,
    tolerance: Option<&ToleranceConfig>,
) -> RollupResult {
    match catalog.get(key) {
        Some(def) => compute_rollup(def, period, actuals, cutoff, tolerance),
        None => {
            tracing::warn!(metric_key = key, "rollup requested for unknown metric");
            RollupResult::empty()
        }
    }
}

/// The dashboard summary view: all four quarters plus YTD in one call.
///
/// One shared implementation keeps the quarter boundaries used for display
/// identical to the ones composing the YTD window.
pub fn compute_quarter_and_ytd_rollups(
    def: &MetricDefinition,
    actuals: &ActualValues,
    cutoff: Option<MonthKey>,
    tolerance: Option<&ToleranceConfig>,
) -> BTreeMap<PeriodTag, RollupResult> {
    PeriodTag::ALL
        .iter()
        .map(|tag| {
            (
                *tag,
                compute_rollup(def, tag.period(), actuals, cutoff, tolerance),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
