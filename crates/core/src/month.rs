//! Calendar month keys (PRD-121).
//!
//! The plan engine works at calendar-month grain. [`MonthKey`] is ordered
//! chronologically and serializes as a `"YYYY-MM"` string so that
//! month-keyed maps come out as plain JSON objects.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A single calendar month (year + 1-based month number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Construct a month key, rejecting month numbers outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Internal constructor for months that are valid by construction
    /// (quarter tables, year enumeration).
    pub(crate) const fn from_parts(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month, rolling over the year boundary.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// All twelve months of `year`, January through December.
    pub fn months_of_year(year: i32) -> [MonthKey; 12] {
        std::array::from_fn(|i| MonthKey::from_parts(year, i as u32 + 1))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn invalid(s: &str) -> CoreError {
            CoreError::Validation(format!("Invalid month key '{s}', expected YYYY-MM"))
        }
        let (year_part, month_part) = s.split_once('-').ok_or_else(|| invalid(s))?;
        let year: i32 = year_part.parse().map_err(|_| invalid(s))?;
        let month: u32 = month_part.parse().map_err(|_| invalid(s))?;
        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
