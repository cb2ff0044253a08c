//! Assignment model.
//!
//! An assignment places an employee on a project at a monthly salary for a
//! date range. Assignments are owned by assignment management and are only
//! read by the payroll engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollPeriod;

/// Represents an employee's assignment to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier for the assignment.
    pub id: Uuid,
    /// The assigned employee.
    pub employee_id: String,
    /// The project the employee is assigned to.
    pub project_id: String,
    /// The employee's role on the project.
    #[serde(default)]
    pub role: String,
    /// Monthly salary paid for this assignment.
    pub monthly_salary: Decimal,
    /// First day of the assignment (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the assignment (inclusive); `None` when open-ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Assignment {
    /// Returns true if the assignment overlaps any day of the period.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Assignment, PayrollPeriod};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let assignment = Assignment {
    ///     id: Uuid::new_v4(),
    ///     employee_id: "emp_001".to_string(),
    ///     project_id: "prj_001".to_string(),
    ///     role: "Engineer".to_string(),
    ///     monthly_salary: Decimal::new(300_000, 0),
    ///     start_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
    ///     end_date: None,
    /// };
    /// assert!(assignment.is_active_during(&PayrollPeriod::new(1, 2026).unwrap()));
    /// assert!(!assignment.is_active_during(&PayrollPeriod::new(12, 2025).unwrap()));
    /// ```
    pub fn is_active_during(&self, period: &PayrollPeriod) -> bool {
        self.start_date <= period.last_day()
            && self.end_date.is_none_or(|end| end >= period.first_day())
    }
}
