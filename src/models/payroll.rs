//! Payroll snapshot models.
//!
//! A [`PayrollSnapshot`] is the persisted result of running the payroll
//! calculator for one employee-project-month. The pure calculation output is
//! carried by [`PayrollFigures`], which the snapshot absorbs on upsert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordKey;

/// Day counts per SC-bearing leave bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDayCounts {
    /// Sick leave days.
    pub sick: u32,
    /// Casual leave days.
    pub casual: u32,
    /// Earned leave days.
    pub earned: u32,
    /// Compensatory, tour, work-from-home and covid days combined.
    pub other: u32,
}

impl LeaveDayCounts {
    /// Returns the total number of leave days across all buckets.
    pub fn total(&self) -> u32 {
        self.sick + self.casual + self.earned + self.other
    }
}

/// The computed payroll figures for one assignment and month.
///
/// Ratios keep full decimal precision. `social_charges_amount` and
/// `deferred_social_charges` are rounded to whole currency units;
/// `earned_salary` and `daily_salary` are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFigures {
    /// Number of calendar days in the month.
    pub total_workdays: u32,
    /// Days counting toward salary.
    pub paid_days: u32,
    /// Days counting toward social charges accrual.
    pub eligible_days: u32,
    /// `eligible_days / total_workdays`.
    pub attendance_ratio: Decimal,
    /// Applied social charges rate as a fraction (`0.20 x attendance_ratio`).
    pub applied_sc_percent: Decimal,
    /// `monthly_salary / total_workdays`.
    pub daily_salary: Decimal,
    /// `daily_salary x paid_days`.
    pub earned_salary: Decimal,
    /// Earned social charges for the month.
    pub social_charges_amount: Decimal,
    /// Social charges consumed by leave days in the month.
    pub deferred_social_charges: Decimal,
    /// Leave day counts per bucket.
    pub leave_days: LeaveDayCounts,
}

/// The persisted payroll result for an employee-project-month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSnapshot {
    /// Unique identifier for the snapshot.
    pub id: Uuid,
    /// The employee.
    pub employee_id: String,
    /// The project.
    pub project_id: String,
    /// The month number (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
    /// Number of calendar days in the month.
    pub total_workdays: u32,
    /// Days counting toward salary.
    pub paid_days: u32,
    /// Days counting toward social charges accrual.
    pub eligible_days: u32,
    /// `eligible_days / total_workdays`, full precision.
    pub attendance_ratio: Decimal,
    /// Applied social charges rate as a fraction, full precision.
    pub applied_sc_percent: Decimal,
    /// Salary for the month, full precision.
    pub earned_salary: Decimal,
    /// Salary per calendar day, full precision.
    pub daily_salary: Decimal,
    /// Earned social charges, whole currency units.
    pub social_charges_amount: Decimal,
    /// Deferred social charges, whole currency units.
    pub deferred_social_charges: Decimal,
    /// Sick leave days.
    pub sick_leave_days: u32,
    /// Casual leave days.
    pub casual_leave_days: u32,
    /// Earned leave days.
    pub earned_leave_days: u32,
    /// Other leave days (compensatory, tour, work-from-home, covid).
    pub other_leave_days: u32,
    /// When the snapshot was first generated.
    pub created_at: DateTime<Utc>,
    /// When the snapshot was last regenerated.
    pub updated_at: DateTime<Utc>,
}

impl PayrollSnapshot {
    /// Creates a new snapshot for `key` from calculated figures.
    pub fn new(key: &RecordKey, figures: &PayrollFigures, now: DateTime<Utc>) -> Self {
        let mut snapshot = Self {
            id: Uuid::new_v4(),
            employee_id: key.employee_id.clone(),
            project_id: key.project_id.clone(),
            month: key.month,
            year: key.year,
            total_workdays: 0,
            paid_days: 0,
            eligible_days: 0,
            attendance_ratio: Decimal::ZERO,
            applied_sc_percent: Decimal::ZERO,
            earned_salary: Decimal::ZERO,
            daily_salary: Decimal::ZERO,
            social_charges_amount: Decimal::ZERO,
            deferred_social_charges: Decimal::ZERO,
            sick_leave_days: 0,
            casual_leave_days: 0,
            earned_leave_days: 0,
            other_leave_days: 0,
            created_at: now,
            updated_at: now,
        };
        snapshot.apply(figures, now);
        snapshot
    }

    /// Overwrites every calculated field, keeping identity and creation time.
    pub fn apply(&mut self, figures: &PayrollFigures, now: DateTime<Utc>) {
        self.total_workdays = figures.total_workdays;
        self.paid_days = figures.paid_days;
        self.eligible_days = figures.eligible_days;
        self.attendance_ratio = figures.attendance_ratio;
        self.applied_sc_percent = figures.applied_sc_percent;
        self.earned_salary = figures.earned_salary;
        self.daily_salary = figures.daily_salary;
        self.social_charges_amount = figures.social_charges_amount;
        self.deferred_social_charges = figures.deferred_social_charges;
        self.sick_leave_days = figures.leave_days.sick;
        self.casual_leave_days = figures.leave_days.casual;
        self.earned_leave_days = figures.leave_days.earned;
        self.other_leave_days = figures.leave_days.other;
        self.updated_at = now;
    }

    /// Returns the unique key of the snapshot.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            employee_id: self.employee_id.clone(),
            project_id: self.project_id.clone(),
            month: self.month,
            year: self.year,
        }
    }

    /// Returns the leave day counts of the snapshot.
    pub fn leave_days(&self) -> LeaveDayCounts {
        LeaveDayCounts {
            sick: self.sick_leave_days,
            casual: self.casual_leave_days,
            earned: self.earned_leave_days,
            other: self.other_leave_days,
        }
    }

    /// Returns the applied social charges rate as a percentage (e.g. 18.7...).
    pub fn applied_sc_percentage(&self) -> Decimal {
        self.applied_sc_percent * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_figures() -> PayrollFigures {
        PayrollFigures {
            total_workdays: 31,
            paid_days: 31,
            eligible_days: 29,
            attendance_ratio: dec("0.9354838709677419354838709677"),
            applied_sc_percent: dec("0.1870967741935483870967741935"),
            daily_salary: dec("9677.419354838709677419354839"),
            earned_salary: dec("300000"),
            social_charges_amount: dec("56129"),
            deferred_social_charges: dec("19355"),
            leave_days: LeaveDayCounts {
                sick: 1,
                casual: 1,
                earned: 0,
                other: 0,
            },
        }
    }

    fn sample_key() -> RecordKey {
        RecordKey {
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            month: 1,
            year: 2026,
        }
    }

    #[test]
    fn test_new_snapshot_copies_figures() {
        let now = Utc::now();
        let snapshot = PayrollSnapshot::new(&sample_key(), &sample_figures(), now);

        assert_eq!(snapshot.total_workdays, 31);
        assert_eq!(snapshot.social_charges_amount, dec("56129"));
        assert_eq!(snapshot.sick_leave_days, 1);
        assert_eq!(snapshot.casual_leave_days, 1);
        assert_eq!(snapshot.created_at, now);
        assert_eq!(snapshot.key(), sample_key());
    }

    #[test]
    fn test_apply_keeps_identity_and_creation_time() {
        let created = Utc::now();
        let mut snapshot = PayrollSnapshot::new(&sample_key(), &sample_figures(), created);
        let id = snapshot.id;

        let mut figures = sample_figures();
        figures.eligible_days = 31;
        figures.leave_days = LeaveDayCounts::default();
        let later = created + chrono::Duration::seconds(5);
        snapshot.apply(&figures, later);

        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.created_at, created);
        assert_eq!(snapshot.updated_at, later);
        assert_eq!(snapshot.eligible_days, 31);
        assert_eq!(snapshot.leave_days().total(), 0);
    }

    #[test]
    fn test_applied_sc_percentage_scales_fraction() {
        let snapshot = PayrollSnapshot::new(&sample_key(), &sample_figures(), Utc::now());
        assert_eq!(
            snapshot.applied_sc_percentage(),
            dec("18.709677419354838709677419350")
        );
    }

    #[test]
    fn test_snapshot_serializes_decimals_as_strings() {
        let snapshot = PayrollSnapshot::new(&sample_key(), &sample_figures(), Utc::now());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"social_charges_amount\":\"56129\""));
        assert!(json.contains("\"deferred_social_charges\":\"19355\""));
        assert!(json.contains("\"month\":1"));
    }

    #[test]
    fn test_leave_day_counts_total() {
        let counts = LeaveDayCounts {
            sick: 2,
            casual: 1,
            earned: 3,
            other: 4,
        };
        assert_eq!(counts.total(), 10);
    }
}
