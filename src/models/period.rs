//! Payroll period and record key models.
//!
//! This module contains the [`PayrollPeriod`] type describing a calendar month
//! and the [`RecordKey`] that uniquely identifies an employee-project-month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Earliest year accepted for a payroll period.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for a payroll period.
pub const MAX_YEAR: i32 = 9999;

/// A calendar month for which payroll is generated.
///
/// A period can only be built through [`PayrollPeriod::new`], so its month is
/// always in `1..=12` and its first and last days are valid dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::new(2, 2024).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts", into = "PeriodParts")]
pub struct PayrollPeriod {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct PeriodParts {
    month: u32,
    year: i32,
}

impl TryFrom<PeriodParts> for PayrollPeriod {
    type Error = EngineError;

    fn try_from(parts: PeriodParts) -> EngineResult<Self> {
        PayrollPeriod::new(parts.month, parts.year)
    }
}

impl From<PayrollPeriod> for PeriodParts {
    fn from(period: PayrollPeriod) -> Self {
        PeriodParts {
            month: period.month,
            year: period.year,
        }
    }
}

impl PayrollPeriod {
    /// Builds a period for the given month (1-12) and year.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the month is outside `1..=12` or the
    /// year is outside [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("must be between 1 and 12, got {}", month),
            ));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::validation(
                "year",
                format!("must be between {} and {}, got {}", MIN_YEAR, MAX_YEAR, year),
            ));
        }

        let days = days_in_month(month, year);
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::validation("month", "not a valid calendar month"))?;
        let last_day = NaiveDate::from_ymd_opt(year, month, days)
            .ok_or_else(|| EngineError::validation("month", "not a valid calendar month"))?;

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// Returns the month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the first calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Returns the last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns the number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.month, self.year)
    }

    /// Checks if a given date falls within this month (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Returns the `(year, month)` ordering key of the period.
    pub fn sort_key(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Unique key of a payroll snapshot or ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The project the record belongs to.
    pub project_id: String,
    /// The month number (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
}

impl RecordKey {
    /// Builds the key for an employee-project pair in a period.
    pub fn new(
        employee_id: impl Into<String>,
        project_id: impl Into<String>,
        period: &PayrollPeriod,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            month: period.month(),
            year: period.year(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{:04}-{:02}",
            self.employee_id, self.project_id, self.year, self.month
        )
    }
}
