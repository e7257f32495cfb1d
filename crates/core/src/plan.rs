//! Built-in business-plan catalog (PRD-126).
//!
//! The committed monthly targets for each tracked metric, one fiscal year
//! of values per metric. Plan values are fixed configuration: the seeding
//! surface loads them once and the engine treats them as read-only.
//! Percentage plans are stored as fractions (0.62 = 62%).
//!
//! Derived metrics carry their formula as annotation only; the engine
//! never evaluates formulas, and their monthly targets below are committed
//! numbers in their own right (rounded, so they need not reconcile exactly
//! with the operand metrics).

use std::collections::BTreeMap;

use crate::catalog::{AggregationRule, Direction, MetricCatalog, MetricDefinition, MetricUnit};
use crate::error::CoreError;
use crate::month::MonthKey;

/// Plan values by calendar month, January through December of `fiscal_year`.
fn monthly_plan(fiscal_year: i32, values: [f64; 12]) -> BTreeMap<MonthKey, f64> {
    MonthKey::months_of_year(fiscal_year)
        .into_iter()
        .zip(values)
        .collect()
}

fn metric(
    key: &str,
    title: &str,
    unit: MetricUnit,
    aggregation: AggregationRule,
    direction: Direction,
    formula: Option<&str>,
    months: BTreeMap<MonthKey, f64>,
) -> MetricDefinition {
    MetricDefinition {
        key: key.to_string(),
        title: title.to_string(),
        unit,
        aggregation,
        direction,
        formula: formula.map(str::to_string),
        months,
    }
}

/// The built-in metric catalog for `fiscal_year`.
///
/// The error path only fires if the data tables in this module are
/// internally inconsistent, which the tests below pin down.
pub fn default_catalog(fiscal_year: i32) -> Result<MetricCatalog, CoreError> {
    let fy = fiscal_year;
    MetricCatalog::new(
        fiscal_year,
        vec![
            metric(
                "revenue_net",
                "Net Revenue",
                MetricUnit::Currency,
                AggregationRule::PeriodSum,
                Direction::IncreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        420_000.0, 435_000.0, 450_000.0, 468_000.0, 480_000.0, 495_000.0,
                        510_000.0, 525_000.0, 540_000.0, 558_000.0, 575_000.0, 600_000.0,
                    ],
                ),
            ),
            metric(
                "cogs",
                "Cost of Goods Sold",
                MetricUnit::Currency,
                AggregationRule::PeriodSum,
                Direction::DecreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        160_000.0, 165_000.0, 170_000.0, 176_000.0, 180_000.0, 186_000.0,
                        191_000.0, 196_000.0, 202_000.0, 208_000.0, 214_000.0, 222_000.0,
                    ],
                ),
            ),
            metric(
                "gross_margin_pct",
                "Gross Margin %",
                MetricUnit::Percentage,
                AggregationRule::PeriodSum,
                Direction::IncreaseIsGood,
                Some("(revenue_net - cogs) / revenue_net"),
                monthly_plan(
                    fy,
                    [
                        0.619, 0.621, 0.622, 0.624, 0.625, 0.624, 0.625, 0.627, 0.626, 0.627,
                        0.628, 0.630,
                    ],
                ),
            ),
            metric(
                "opex",
                "Operating Expenses",
                MetricUnit::Currency,
                AggregationRule::PeriodSum,
                Direction::DecreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        210_000.0, 212_000.0, 214_000.0, 216_000.0, 218_000.0, 220_000.0,
                        222_000.0, 224_000.0, 226_000.0, 228_000.0, 230_000.0, 232_000.0,
                    ],
                ),
            ),
            metric(
                "ebitda",
                "EBITDA",
                MetricUnit::Currency,
                AggregationRule::PeriodSum,
                Direction::IncreaseIsGood,
                Some("revenue_net - cogs - opex"),
                monthly_plan(
                    fy,
                    [
                        50_000.0, 58_000.0, 66_000.0, 76_000.0, 82_000.0, 89_000.0, 97_000.0,
                        105_000.0, 112_000.0, 122_000.0, 131_000.0, 146_000.0,
                    ],
                ),
            ),
            metric(
                "cash_balance",
                "Cash Balance",
                MetricUnit::Currency,
                AggregationRule::PointInTime,
                Direction::IncreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        1_500_000.0, 1_540_000.0, 1_590_000.0, 1_650_000.0, 1_710_000.0,
                        1_780_000.0, 1_850_000.0, 1_930_000.0, 2_010_000.0, 2_100_000.0,
                        2_190_000.0, 2_280_000.0,
                    ],
                ),
            ),
            metric(
                "committed_arr",
                "Committed ARR",
                MetricUnit::Currency,
                AggregationRule::PointInTime,
                Direction::IncreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        5_000_000.0, 5_090_000.0, 5_185_000.0, 5_290_000.0, 5_395_000.0,
                        5_505_000.0, 5_620_000.0, 5_740_000.0, 5_865_000.0, 5_995_000.0,
                        6_130_000.0, 6_270_000.0,
                    ],
                ),
            ),
            metric(
                "headcount",
                "Headcount",
                MetricUnit::Count,
                AggregationRule::PointInTime,
                Direction::TargetIsFlat,
                None,
                monthly_plan(
                    fy,
                    [48.0, 48.0, 50.0, 50.0, 52.0, 52.0, 54.0, 54.0, 55.0, 55.0, 56.0, 56.0],
                ),
            ),
            metric(
                "new_customers",
                "New Customers",
                MetricUnit::Count,
                AggregationRule::PeriodSum,
                Direction::IncreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [25.0, 26.0, 28.0, 30.0, 31.0, 33.0, 34.0, 36.0, 38.0, 40.0, 41.0, 44.0],
                ),
            ),
            metric(
                "churn_rate_pct",
                "Monthly Churn Rate",
                MetricUnit::Percentage,
                AggregationRule::PeriodSum,
                Direction::DecreaseIsGood,
                None,
                monthly_plan(
                    fy,
                    [
                        0.031, 0.030, 0.029, 0.029, 0.028, 0.028, 0.027, 0.027, 0.026, 0.026,
                        0.025, 0.025,
                    ],
                ),
            ),
            metric(
                "marketing_spend",
                "Marketing Spend",
                MetricUnit::Currency,
                AggregationRule::PeriodSum,
                Direction::TargetIsFlat,
                None,
                monthly_plan(
                    fy,
                    [
                        75_000.0, 75_000.0, 75_000.0, 75_000.0, 75_000.0, 75_000.0, 75_000.0,
                        75_000.0, 75_000.0, 75_000.0, 75_000.0, 75_000.0,
                    ],
                ),
            ),
            metric(
                "revenue_per_head",
                "Revenue per Head",
                MetricUnit::Currency,
                AggregationRule::PointInTime,
                Direction::IncreaseIsGood,
                Some("revenue_net / headcount"),
                monthly_plan(
                    fy,
                    [
                        8_750.0, 9_063.0, 9_000.0, 9_360.0, 9_231.0, 9_519.0, 9_444.0, 9_722.0,
                        9_818.0, 10_145.0, 10_268.0, 10_714.0,
                    ],
                ),
            ),
        ],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
