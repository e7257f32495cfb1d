//! Pure domain logic for the opsboard dashboard backend.
//!
//! The heart of this crate is the business-plan rollup and signal engine:
//! given a fiscal-year metric catalog and a sparse map of observed monthly
//! actuals, it aggregates plan and actual over a reporting period, computes
//! variance, and classifies the gap into a traffic-light status. Everything
//! here is synchronous and side-effect-free; this crate has no database or
//! HTTP dependencies, and all data is passed in by the caller.

pub mod catalog;
pub mod error;
pub mod month;
pub mod period;
pub mod plan;
pub mod rollup;
pub mod tolerance;

pub use catalog::{AggregationRule, Direction, MetricCatalog, MetricDefinition, MetricUnit};
pub use error::CoreError;
pub use month::MonthKey;
pub use period::{
    end_month_of_period, months_in_period, resolve_period_months, FiscalQuarter, Period, PeriodTag,
};
pub use rollup::{
    aggregate_monthly_values, classify_signal, compute_quarter_and_ytd_rollups, compute_rollup,
    compute_rollup_for_key, latest_actual_month, ActualValues, RollupResult, SignalStatus,
};
pub use tolerance::ToleranceConfig;
