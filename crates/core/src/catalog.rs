//! Metric catalog types and validation (PRD-122).
//!
//! A [`MetricCatalog`] describes every metric the dashboard tracks for one
//! fiscal year, including each metric's committed monthly plan values. The
//! catalog is immutable configuration: it is constructed once (from the
//! built-in plan in [`crate::plan`] or from JSON config) and passed
//! explicitly into the rollup functions. There is no global catalog
//! singleton, so multiple fiscal years or tenants can coexist.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::month::MonthKey;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Unit of measure for a metric. Governs how monthly values combine across
/// a period and which tolerance preset applies by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Currency,
    Count,
    Percentage,
}

/// How a metric's monthly values reduce to a single period value.
///
/// Percentage-unit metrics ignore this flag and always average: a ratio is
/// never summed across months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationRule {
    /// The period's value is a snapshot at its closing month (balances,
    /// headcount).
    PointInTime,
    /// The period's value is the sum of its months (revenue, expenses).
    PeriodSum,
}

/// Which way "better than plan" points for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreaseIsGood,
    DecreaseIsGood,
    TargetIsFlat,
}

// ---------------------------------------------------------------------------
// Metric definition
// ---------------------------------------------------------------------------

/// The immutable definition of one tracked business metric, including its
/// full-year monthly plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Stable identifier, unique across the catalog.
    pub key: String,
    /// Human label for dashboard display; never used in computation.
    pub title: String,
    pub unit: MetricUnit,
    pub aggregation: AggregationRule,
    pub direction: Direction,
    /// Formula annotation for derived metrics, e.g. `"revenue_net - cogs"`.
    /// Documentation only; the engine never evaluates it. Callers supply
    /// pre-computed actuals for derived metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Planned value per calendar month. Exactly one fiscal year, no gaps.
    /// Percentages are stored as fractions (0.18 = 18%).
    pub months: BTreeMap<MonthKey, f64>,
}

impl MetricDefinition {
    /// Whether this metric is conceptually computed from other metrics.
    pub fn is_derived(&self) -> bool {
        self.formula.is_some()
    }

    /// The fiscal year covered by this metric's plan, taken from its first
    /// plan month. `None` for an empty (invalid) plan.
    pub fn fiscal_year(&self) -> Option<i32> {
        self.months.keys().next().map(|m| m.year())
    }

    /// Validate the plan invariant: exactly 12 entries, one per calendar
    /// month of `fiscal_year`, every value finite.
    pub fn validate(&self, fiscal_year: i32) -> Result<(), CoreError> {
        for expected in MonthKey::months_of_year(fiscal_year) {
            let Some(value) = self.months.get(&expected) else {
                return Err(CoreError::Validation(format!(
                    "Metric '{}' is missing a plan value for {expected}",
                    self.key
                )));
            };
            if !value.is_finite() {
                return Err(CoreError::Validation(format!(
                    "Metric '{}' has a non-finite plan value for {expected}",
                    self.key
                )));
            }
        }
        // All 12 months of the year are present, so any extra entry lies
        // outside the fiscal year.
        if self.months.len() != 12 {
            return Err(CoreError::Validation(format!(
                "Metric '{}' has plan entries outside fiscal year {fiscal_year}",
                self.key
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered, validated collection of metric definitions for one fiscal year.
#[derive(Debug, Clone, Serialize)]
pub struct MetricCatalog {
    fiscal_year: i32,
    metrics: Vec<MetricDefinition>,
}

/// Unvalidated wire form of a catalog, used by [`MetricCatalog::from_json_str`].
#[derive(Deserialize)]
struct RawCatalog {
    fiscal_year: i32,
    metrics: Vec<MetricDefinition>,
}

impl MetricCatalog {
    /// Build a catalog, validating every definition and rejecting duplicate
    /// keys. Definition order is preserved for display.
    pub fn new(fiscal_year: i32, metrics: Vec<MetricDefinition>) -> Result<Self, CoreError> {
        let mut seen = BTreeSet::new();
        for def in &metrics {
            if !seen.insert(def.key.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate metric key '{}'",
                    def.key
                )));
            }
            def.validate(fiscal_year)?;
        }
        tracing::debug!(
            fiscal_year,
            metric_count = metrics.len(),
            "metric catalog constructed"
        );
        Ok(Self {
            fiscal_year,
            metrics,
        })
    }

    /// Load and validate a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let raw: RawCatalog = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid catalog JSON: {e}")))?;
        Self::new(raw.fiscal_year, raw.metrics)
    }

    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Look up a metric by key.
    pub fn get(&self, key: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Look up a metric by key, treating a miss as a programmer error.
    pub fn require(&self, key: &str) -> Result<&MetricDefinition, CoreError> {
        self.get(key)
            .ok_or_else(|| CoreError::UnknownMetric(key.to_string()))
    }

    /// All metric definitions in catalog order.
    pub fn list(&self) -> &[MetricDefinition] {
        &self.metrics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
