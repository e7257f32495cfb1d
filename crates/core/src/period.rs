//! Reporting period resolution (PRD-123).
//!
//! Converts an abstract reporting window (single month, fiscal quarter,
//! year-to-date) into the concrete calendar months it covers. Quarters and
//! YTD are always relative to a single fiscal year; multi-year spans are
//! not supported.

use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

// ---------------------------------------------------------------------------
// Quarters
// ---------------------------------------------------------------------------

/// A calendar-aligned fiscal quarter (Q1 = Jan-Mar, Q4 = Oct-Dec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalQuarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalQuarter {
    pub const ALL: [FiscalQuarter; 4] = [
        FiscalQuarter::Q1,
        FiscalQuarter::Q2,
        FiscalQuarter::Q3,
        FiscalQuarter::Q4,
    ];

    /// 1-based month number of the quarter's first month.
    fn start_month(self) -> u32 {
        match self {
            FiscalQuarter::Q1 => 1,
            FiscalQuarter::Q2 => 4,
            FiscalQuarter::Q3 => 7,
            FiscalQuarter::Q4 => 10,
        }
    }

    /// The quarter's three months within `fiscal_year`, in order.
    pub fn months(self, fiscal_year: i32) -> [MonthKey; 3] {
        std::array::from_fn(|i| MonthKey::from_parts(fiscal_year, self.start_month() + i as u32))
    }

    /// The quarter's closing month.
    pub fn end_month(self, fiscal_year: i32) -> MonthKey {
        MonthKey::from_parts(fiscal_year, self.start_month() + 2)
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// A reporting window for one rollup computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// A single calendar month.
    Month(MonthKey),
    /// A fixed three-month fiscal quarter.
    Quarter(FiscalQuarter),
    /// January through the cutoff month; the full year when no cutoff is
    /// supplied (the plan-only default).
    YearToDate,
}

impl Period {
    /// Parse a dashboard period identifier: `"Q1"`..`"Q4"` (any case),
    /// `"YTD"`, or a `YYYY-MM` month literal. Anything else is `None`.
    pub fn parse(ident: &str) -> Option<Period> {
        let ident = ident.trim();
        match ident.to_ascii_uppercase().as_str() {
            "Q1" => Some(Period::Quarter(FiscalQuarter::Q1)),
            "Q2" => Some(Period::Quarter(FiscalQuarter::Q2)),
            "Q3" => Some(Period::Quarter(FiscalQuarter::Q3)),
            "Q4" => Some(Period::Quarter(FiscalQuarter::Q4)),
            "YTD" => Some(Period::YearToDate),
            _ => ident.parse::<MonthKey>().ok().map(Period::Month),
        }
    }
}

/// Map-key tag for batch rollups over the standard dashboard periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodTag {
    Q1,
    Q2,
    Q3,
    Q4,
    Ytd,
}

impl PeriodTag {
    pub const ALL: [PeriodTag; 5] = [
        PeriodTag::Q1,
        PeriodTag::Q2,
        PeriodTag::Q3,
        PeriodTag::Q4,
        PeriodTag::Ytd,
    ];

    /// The period this tag stands for.
    pub fn period(self) -> Period {
        match self {
            PeriodTag::Q1 => Period::Quarter(FiscalQuarter::Q1),
            PeriodTag::Q2 => Period::Quarter(FiscalQuarter::Q2),
            PeriodTag::Q3 => Period::Quarter(FiscalQuarter::Q3),
            PeriodTag::Q4 => Period::Quarter(FiscalQuarter::Q4),
            PeriodTag::Ytd => Period::YearToDate,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Ordered list of calendar months composing `period` within `fiscal_year`.
///
/// `cutoff` bounds year-to-date windows: months after it are excluded, and
/// a cutoff before the fiscal year yields an empty list. Callers evaluating
/// actuals should pass an explicit cutoff (see
/// [`crate::rollup::latest_actual_month`] for the default inference).
pub fn months_in_period(
    period: Period,
    fiscal_year: i32,
    cutoff: Option<MonthKey>,
) -> Vec<MonthKey> {
    match period {
        Period::Month(month) => vec![month],
        Period::Quarter(quarter) => quarter.months(fiscal_year).to_vec(),
        Period::YearToDate => {
            let year = MonthKey::months_of_year(fiscal_year);
            match cutoff {
                None => year.to_vec(),
                Some(cut) => year.into_iter().filter(|m| *m <= cut).collect(),
            }
        }
    }
}

/// The single month representing the period's closing point, used for
/// point-in-time aggregation. `None` when the period resolves to no months.
pub fn end_month_of_period(
    period: Period,
    fiscal_year: i32,
    cutoff: Option<MonthKey>,
) -> Option<MonthKey> {
    months_in_period(period, fiscal_year, cutoff).last().copied()
}

/// Resolve a raw period identifier from the dashboard API into months.
///
/// Unrecognized identifiers resolve to an empty list, never an error;
/// downstream aggregation then reports "no data" rather than failing the
/// whole dashboard call.
pub fn resolve_period_months(
    ident: &str,
    fiscal_year: i32,
    cutoff: Option<MonthKey>,
) -> Vec<MonthKey> {
    match Period::parse(ident) {
        Some(period) => months_in_period(period, fiscal_year, cutoff),
        None => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
