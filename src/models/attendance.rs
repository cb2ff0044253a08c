//! Attendance record and status code models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of daily attendance status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    /// `P` - present on site.
    Present,
    /// `W` - weekly off day.
    Weekend,
    /// `H` - public holiday.
    Holiday,
    /// `CL` - casual leave.
    CasualLeave,
    /// `SL` - sick leave.
    SickLeave,
    /// `EL` - earned (annual) leave.
    EarnedLeave,
    /// `CO` - compensatory leave.
    CompensatoryLeave,
    /// `T` - on tour.
    Tour,
    /// `WH` - working from home.
    WorkFromHome,
    /// `CD` - covid leave.
    CovidLeave,
    /// `A` - absent.
    Absent,
}

impl AttendanceStatus {
    /// All status codes, in code-table order.
    pub const ALL: [AttendanceStatus; 11] = [
        AttendanceStatus::Present,
        AttendanceStatus::Weekend,
        AttendanceStatus::Holiday,
        AttendanceStatus::CasualLeave,
        AttendanceStatus::SickLeave,
        AttendanceStatus::EarnedLeave,
        AttendanceStatus::CompensatoryLeave,
        AttendanceStatus::Tour,
        AttendanceStatus::WorkFromHome,
        AttendanceStatus::CovidLeave,
        AttendanceStatus::Absent,
    ];

    /// Returns the short code stored on attendance records.
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "P",
            AttendanceStatus::Weekend => "W",
            AttendanceStatus::Holiday => "H",
            AttendanceStatus::CasualLeave => "CL",
            AttendanceStatus::SickLeave => "SL",
            AttendanceStatus::EarnedLeave => "EL",
            AttendanceStatus::CompensatoryLeave => "CO",
            AttendanceStatus::Tour => "T",
            AttendanceStatus::WorkFromHome => "WH",
            AttendanceStatus::CovidLeave => "CD",
            AttendanceStatus::Absent => "A",
        }
    }

    /// Parses a status code. Codes are matched exactly; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One day of attendance for an employee.
///
/// Records are unique per `(employee_id, date)`. The status is kept as the raw
/// code so that records carrying an unknown code can still be stored and are
/// simply treated as unpaid by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The project the employee worked on that day.
    pub project_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// The status code (e.g. "P", "SL").
    pub status: String,
}

impl AttendanceRecord {
    /// Returns the parsed status, or `None` for an unrecognised code.
    pub fn parsed_status(&self) -> Option<AttendanceStatus> {
        AttendanceStatus::from_code(&self.status)
    }
}
