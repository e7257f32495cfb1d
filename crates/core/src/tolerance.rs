//! Signal tolerance bands (PRD-124).
//!
//! Thresholds are deviations of the actual/plan ratio from 1. Two presets
//! ship with the dashboard; callers may substitute their own policy by
//! passing a [`ToleranceConfig`] into the rollup functions.

use serde::{Deserialize, Serialize};

use crate::catalog::MetricUnit;
use crate::error::CoreError;

/// Preset for currency and count metrics: a miss of up to 5% is yellow,
/// and a flat-target deviation beyond 10% is red.
pub const CURRENCY_COUNT_TOLERANCE: ToleranceConfig = ToleranceConfig {
    yellow_threshold: 0.05,
    red_threshold: 0.10,
};

/// Preset for percentage metrics: tighter bands (2pp yellow, 4pp red),
/// since plan ratios move in small increments.
pub const PERCENTAGE_TOLERANCE: ToleranceConfig = ToleranceConfig {
    yellow_threshold: 0.02,
    red_threshold: 0.04,
};

/// Tolerance bands for signal classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Ratio deviation up to which a miss still reads yellow (or green for
    /// flat-target metrics).
    pub yellow_threshold: f64,
    /// Ratio deviation beyond which a flat-target metric reads red.
    pub red_threshold: f64,
}

impl ToleranceConfig {
    /// The default preset for a metric unit.
    pub fn for_unit(unit: MetricUnit) -> Self {
        match unit {
            MetricUnit::Currency | MetricUnit::Count => CURRENCY_COUNT_TOLERANCE,
            MetricUnit::Percentage => PERCENTAGE_TOLERANCE,
        }
    }

    /// Validate a caller-supplied override: both thresholds finite and
    /// non-negative, red at least as wide as yellow.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("yellow_threshold", self.yellow_threshold),
            ("red_threshold", self.red_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if self.red_threshold < self.yellow_threshold {
            return Err(CoreError::Validation(format!(
                "red_threshold ({}) must not be narrower than yellow_threshold ({})",
                self.red_threshold, self.yellow_threshold
            )));
        }
        Ok(())
    }
}
