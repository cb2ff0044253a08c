//! Monthly payroll calculation.
//!
//! This module turns one assignment and a month of attendance into the
//! payroll figures stored on a [`PayrollSnapshot`](crate::models::PayrollSnapshot):
//! paid and eligible day counts, the attendance ratio, the applied social
//! charges rate, salary, earned social charges and the social charges
//! deferred by leave.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Assignment, AttendanceRecord, LeaveDayCounts, PayrollFigures, PayrollPeriod};

use super::attendance_classifier::{LeaveBucket, classify_code};
use super::rounding::round_currency;

/// Returns the base social charges rate (20%).
pub fn sc_base_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Day counts gathered from a month of attendance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    /// Days counting toward salary.
    pub paid_days: u32,
    /// Days counting toward social charges accrual.
    pub eligible_days: u32,
    /// Days per SC-bearing leave bucket.
    pub leave_days: LeaveDayCounts,
}

/// Counts paid, eligible and leave days over a set of attendance records.
///
/// Each record is counted independently; a record can increment all three
/// kinds of counter (a tour day is paid, eligible and an "other" leave day).
pub fn tally_attendance<'a, I>(records: I) -> AttendanceTally
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut tally = AttendanceTally::default();

    for record in records {
        let class = classify_code(&record.status);
        if class.paid {
            tally.paid_days += 1;
        }
        if class.sc_eligible {
            tally.eligible_days += 1;
        }
        match class.leave_bucket {
            Some(LeaveBucket::Sick) => tally.leave_days.sick += 1,
            Some(LeaveBucket::Casual) => tally.leave_days.casual += 1,
            Some(LeaveBucket::Earned) => tally.leave_days.earned += 1,
            Some(LeaveBucket::Other) => tally.leave_days.other += 1,
            None => {}
        }
    }

    tally
}

/// Calculates the payroll figures for an assignment in a month.
///
/// Only records for the assignment's employee and project that fall inside
/// the period are counted, one per calendar day (the last record for a day
/// wins).
///
/// # Arguments
///
/// * `assignment` - The assignment providing the employee, project and salary
/// * `period` - The month being calculated
/// * `records` - Attendance records for the employee
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::models::{Assignment, AttendanceRecord, PayrollPeriod};
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
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: None,
/// };
/// let period = PayrollPeriod::new(1, 2026).unwrap();
/// let records: Vec<AttendanceRecord> = (1..=29)
///     .map(|day| AttendanceRecord {
///         id: Uuid::new_v4(),
///         employee_id: "emp_001".to_string(),
///         project_id: "prj_001".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
///         status: "P".to_string(),
///     })
///     .collect();
///
/// let figures = calculate_payroll(&assignment, &period, &records);
/// assert_eq!(figures.total_workdays, 31);
/// assert_eq!(figures.eligible_days, 29);
/// assert_eq!(figures.social_charges_amount, Decimal::from(56129));
/// ```
pub fn calculate_payroll(
    assignment: &Assignment,
    period: &PayrollPeriod,
    records: &[AttendanceRecord],
) -> PayrollFigures {
    let days: BTreeMap<NaiveDate, &AttendanceRecord> = records
        .iter()
        .filter(|r| {
            r.employee_id == assignment.employee_id
                && r.project_id == assignment.project_id
                && period.contains_date(r.date)
        })
        .map(|r| (r.date, r))
        .collect();

    let tally = tally_attendance(days.values().copied());
    let total_workdays = period.days_in_month();

    figures_from_tally(assignment.monthly_salary, total_workdays, &tally)
}

/// Derives payroll figures from a salary, a day count and an attendance tally.
pub fn figures_from_tally(
    monthly_salary: Decimal,
    total_workdays: u32,
    tally: &AttendanceTally,
) -> PayrollFigures {
    let workdays = Decimal::from(total_workdays);

    let attendance_ratio = if total_workdays > 0 {
        Decimal::from(tally.eligible_days) / workdays
    } else {
        Decimal::ZERO
    };
    let applied_sc_percent = sc_base_rate() * attendance_ratio;

    let daily_salary = if total_workdays > 0 {
        monthly_salary / workdays
    } else {
        Decimal::ZERO
    };
    let earned_salary = daily_salary * Decimal::from(tally.paid_days);

    let social_charges_amount = round_currency(monthly_salary * applied_sc_percent);

    let total_leave_days = tally.leave_days.total();
    let deferred_social_charges = if total_leave_days > 0 {
        round_currency(daily_salary * Decimal::from(total_leave_days))
    } else {
        Decimal::ZERO
    };

    PayrollFigures {
        total_workdays,
        paid_days: tally.paid_days,
        eligible_days: tally.eligible_days,
        attendance_ratio,
        applied_sc_percent,
        daily_salary,
        earned_salary,
        social_charges_amount,
        deferred_social_charges,
        leave_days: tally.leave_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_assignment(salary: &str) -> Assignment {
        Assignment {
            id: Uuid::nil(),
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            role: "Engineer".to_string(),
            monthly_salary: dec(salary),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
        }
    }

    fn record(day: u32, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            status: status.to_string(),
        }
    }

    fn january() -> PayrollPeriod {
        PayrollPeriod::new(1, 2026).unwrap()
    }

    /// 29 present days and 2 absences in a 31-day month.
    #[test]
    fn test_scenario_a_earned_social_charges() {
        let mut records: Vec<AttendanceRecord> = (1..=29).map(|d| record(d, "P")).collect();
        records.push(record(30, "A"));
        records.push(record(31, "A"));

        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.total_workdays, 31);
        assert_eq!(figures.eligible_days, 29);
        assert_eq!(figures.paid_days, 29);
        assert_eq!(
            figures.attendance_ratio.round_dp(15),
            dec("0.935483870967742")
        );
        assert_eq!(
            (figures.applied_sc_percent * Decimal::ONE_HUNDRED).round_dp(12),
            dec("18.709677419355")
        );
        assert_eq!(figures.social_charges_amount, dec("56129"));
        assert_eq!(figures.deferred_social_charges, Decimal::ZERO);
    }

    /// 29 present days and 2 sick days.
    #[test]
    fn test_scenario_b_deferred_social_charges() {
        let mut records: Vec<AttendanceRecord> = (1..=29).map(|d| record(d, "P")).collect();
        records.push(record(30, "SL"));
        records.push(record(31, "SL"));

        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.daily_salary.round_dp(12), dec("9677.419354838710"));
        assert_eq!(figures.leave_days.sick, 2);
        assert_eq!(figures.paid_days, 31);
        assert_eq!(figures.deferred_social_charges, dec("19355"));
        assert_eq!(figures.social_charges_amount, dec("56129"));
    }

    #[test]
    fn test_applied_rate_is_not_rounded_before_use() {
        let records: Vec<AttendanceRecord> = (1..=29).map(|d| record(d, "P")).collect();
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        // Rounding the rate to 18.71% first would give 56130.
        assert_eq!(figures.applied_sc_percent, sc_base_rate() * figures.attendance_ratio);
        assert_ne!(figures.social_charges_amount, dec("56130"));
    }

    #[test]
    fn test_earned_salary_is_not_rounded() {
        let records: Vec<AttendanceRecord> = (1..=10).map(|d| record(d, "P")).collect();
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.earned_salary, figures.daily_salary * Decimal::from(10));
        assert_ne!(figures.earned_salary, figures.earned_salary.round_dp(0));
    }

    #[test]
    fn test_no_attendance_yields_zero_figures() {
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &[]);

        assert_eq!(figures.paid_days, 0);
        assert_eq!(figures.attendance_ratio, Decimal::ZERO);
        assert_eq!(figures.earned_salary, Decimal::ZERO);
        assert_eq!(figures.social_charges_amount, Decimal::ZERO);
        assert_eq!(figures.deferred_social_charges, Decimal::ZERO);
    }

    #[test]
    fn test_tour_counts_as_eligible_and_other_leave() {
        let records = vec![record(1, "T"), record(2, "WH")];
        let figures = calculate_payroll(&create_test_assignment("310000"), &january(), &records);

        assert_eq!(figures.eligible_days, 2);
        assert_eq!(figures.paid_days, 2);
        assert_eq!(figures.leave_days.other, 2);
        // 310000 / 31 x 2
        assert_eq!(figures.deferred_social_charges, dec("20000"));
    }

    #[test]
    fn test_unknown_status_is_unpaid() {
        let records = vec![record(1, "P"), record(2, "??")];
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.paid_days, 1);
        assert_eq!(figures.eligible_days, 1);
    }

    #[test]
    fn test_records_outside_period_or_pair_are_ignored() {
        let mut other_project = record(2, "P");
        other_project.project_id = "prj_999".to_string();
        let mut february = record(3, "P");
        february.date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();

        let records = vec![record(1, "P"), other_project, february];
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.paid_days, 1);
    }

    #[test]
    fn test_duplicate_day_counts_once() {
        let records = vec![record(1, "A"), record(1, "P")];
        let figures = calculate_payroll(&create_test_assignment("300000"), &january(), &records);

        assert_eq!(figures.paid_days, 1);
        assert_eq!(figures.eligible_days, 1);
    }

    #[test]
    fn test_zero_workdays_guards_division() {
        let tally = AttendanceTally {
            paid_days: 3,
            eligible_days: 3,
            leave_days: LeaveDayCounts::default(),
        };
        let figures = figures_from_tally(dec("300000"), 0, &tally);

        assert_eq!(figures.attendance_ratio, Decimal::ZERO);
        assert_eq!(figures.daily_salary, Decimal::ZERO);
        assert_eq!(figures.social_charges_amount, Decimal::ZERO);
    }

    #[test]
    fn test_leave_counters_per_bucket() {
        let records = vec![
            record(1, "SL"),
            record(2, "CL"),
            record(3, "CL"),
            record(4, "EL"),
            record(5, "CO"),
            record(6, "CD"),
        ];
        let tally = tally_attendance(&records);

        assert_eq!(tally.leave_days.sick, 1);
        assert_eq!(tally.leave_days.casual, 2);
        assert_eq!(tally.leave_days.earned, 1);
        assert_eq!(tally.leave_days.other, 2);
        assert_eq!(tally.paid_days, 6);
        assert_eq!(tally.eligible_days, 0);
    }

    proptest! {
        #[test]
        fn prop_attendance_ratio_is_within_unit_interval(
            codes in proptest::collection::vec(
                prop_oneof![
                    Just("P"), Just("W"), Just("H"), Just("CL"), Just("SL"), Just("EL"),
                    Just("CO"), Just("T"), Just("WH"), Just("CD"), Just("A"), Just("X"),
                ],
                0..=31,
            ),
            salary in 0u64..10_000_000u64,
        ) {
            let records: Vec<AttendanceRecord> = codes
                .iter()
                .enumerate()
                .map(|(i, code)| record(i as u32 + 1, code))
                .collect();
            let assignment = create_test_assignment(&salary.to_string());
            let figures = calculate_payroll(&assignment, &january(), &records);

            prop_assert!(figures.attendance_ratio >= Decimal::ZERO);
            prop_assert!(figures.attendance_ratio <= Decimal::ONE);
            prop_assert_eq!(figures.applied_sc_percent, sc_base_rate() * figures.attendance_ratio);
            prop_assert!(figures.eligible_days <= figures.paid_days);
            prop_assert_eq!(figures.social_charges_amount, figures.social_charges_amount.round_dp(0));
            prop_assert_eq!(figures.deferred_social_charges, figures.deferred_social_charges.round_dp(0));
        }
    }
}
