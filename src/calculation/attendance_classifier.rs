//! Attendance status classification.
//!
//! Maps a status code to its memberships: whether the day is paid, whether it
//! accrues social charges, and which SC-bearing leave bucket it counts toward.

use crate::models::AttendanceStatus;

/// The four SC-bearing leave buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveBucket {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Earned leave.
    Earned,
    /// Compensatory leave, tour, work-from-home and covid leave.
    Other,
}

/// The category memberships of one attendance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClass {
    /// The day counts toward salary.
    pub paid: bool,
    /// The day counts toward social charges accrual.
    pub sc_eligible: bool,
    /// The leave bucket the day counts toward, if any.
    pub leave_bucket: Option<LeaveBucket>,
}

impl StatusClass {
    /// Classification applied to unknown codes: unpaid, ineligible, no bucket.
    pub const UNPAID: StatusClass = StatusClass {
        paid: false,
        sc_eligible: false,
        leave_bucket: None,
    };
}

/// Classifies a parsed attendance status.
pub fn classify_status(status: AttendanceStatus) -> StatusClass {
    use AttendanceStatus::*;

    let sc_eligible = matches!(status, Present | Weekend | Holiday | Tour | WorkFromHome);
    let paid = sc_eligible
        || matches!(
            status,
            CasualLeave | SickLeave | EarnedLeave | CompensatoryLeave | CovidLeave
        );
    let leave_bucket = match status {
        SickLeave => Some(LeaveBucket::Sick),
        CasualLeave => Some(LeaveBucket::Casual),
        EarnedLeave => Some(LeaveBucket::Earned),
        CompensatoryLeave | Tour | WorkFromHome | CovidLeave => Some(LeaveBucket::Other),
        Present | Weekend | Holiday | Absent => None,
    };

    StatusClass {
        paid,
        sc_eligible,
        leave_bucket,
    }
}

/// Classifies a raw status code. Unrecognised codes are unpaid and ineligible.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{classify_code, LeaveBucket};
///
/// let tour = classify_code("T");
/// assert!(tour.paid && tour.sc_eligible);
/// assert_eq!(tour.leave_bucket, Some(LeaveBucket::Other));
///
/// let unknown = classify_code("ZZ");
/// assert!(!unknown.paid && !unknown.sc_eligible);
/// ```
pub fn classify_code(code: &str) -> StatusClass {
    AttendanceStatus::from_code(code)
        .map(classify_status)
        .unwrap_or(StatusClass::UNPAID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sc_eligible_set() {
        let eligible: Vec<&str> = AttendanceStatus::ALL
            .into_iter()
            .filter(|s| classify_status(*s).sc_eligible)
            .map(|s| s.code())
            .collect();
        assert_eq!(eligible, vec!["P", "W", "H", "T", "WH"]);
    }

    #[test]
    fn test_paid_set_is_everything_but_absent() {
        for status in AttendanceStatus::ALL {
            assert_eq!(
                classify_status(status).paid,
                status != AttendanceStatus::Absent,
                "unexpected paid flag for {}",
                status
            );
        }
    }

    #[test]
    fn test_every_eligible_status_is_paid() {
        for status in AttendanceStatus::ALL {
            let class = classify_status(status);
            if class.sc_eligible {
                assert!(class.paid, "{} is eligible but unpaid", status);
            }
        }
    }

    #[test]
    fn test_leave_buckets() {
        assert_eq!(classify_code("SL").leave_bucket, Some(LeaveBucket::Sick));
        assert_eq!(classify_code("CL").leave_bucket, Some(LeaveBucket::Casual));
        assert_eq!(classify_code("EL").leave_bucket, Some(LeaveBucket::Earned));
        for code in ["CO", "T", "WH", "CD"] {
            assert_eq!(classify_code(code).leave_bucket, Some(LeaveBucket::Other));
        }
        for code in ["P", "W", "H", "A"] {
            assert_eq!(classify_code(code).leave_bucket, None);
        }
    }

    #[test]
    fn test_leave_days_are_paid_but_not_eligible() {
        for code in ["SL", "CL", "EL", "CO", "CD"] {
            let class = classify_code(code);
            assert!(class.paid);
            assert!(!class.sc_eligible);
        }
    }

    #[test]
    fn test_absent_is_unpaid() {
        assert_eq!(classify_code("A"), StatusClass::UNPAID);
    }

    #[test]
    fn test_unknown_code_never_errors() {
        assert_eq!(classify_code("X"), StatusClass::UNPAID);
        assert_eq!(classify_code("present"), StatusClass::UNPAID);
        assert_eq!(classify_code(""), StatusClass::UNPAID);
    }
}
