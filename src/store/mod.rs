//! Storage port for the payroll engine.
//!
//! The service talks to persistence only through [`PayrollStore`]. Calls are
//! synchronous and blocking; every write is an idempotent upsert keyed the
//! way the records are keyed. [`InMemoryStore`] is the bundled adapter.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Assignment, AttendanceRecord, LedgerEntry, Payment, PayrollSnapshot, RecordKey,
};

/// Optional filters over employee, project and period.
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordFilter {
    /// Restrict to one employee.
    pub employee_id: Option<String>,
    /// Restrict to one project.
    pub project_id: Option<String>,
    /// Restrict to one month (1-12).
    pub month: Option<u32>,
    /// Restrict to one year.
    pub year: Option<i32>,
}

impl RecordFilter {
    /// A filter selecting every period of one employee-project pair.
    pub fn for_pair(employee_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            project_id: Some(project_id.into()),
            month: None,
            year: None,
        }
    }

    /// A filter selecting every record of one employee.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    /// Returns true if the given fields pass the filter.
    ///
    /// `project_id` is optional on the record side so payments without a
    /// target only match filters that do not name a project.
    pub fn matches(
        &self,
        employee_id: &str,
        project_id: Option<&str>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> bool {
        self.employee_id.as_deref().is_none_or(|e| e == employee_id)
            && self.project_id.as_deref().is_none_or(|p| Some(p) == project_id)
            && self.month.is_none_or(|m| Some(m) == month)
            && self.year.is_none_or(|y| Some(y) == year)
    }
}

/// Filters over attendance records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttendanceQuery {
    /// Restrict to one employee.
    pub employee_id: Option<String>,
    /// Restrict to one project.
    pub project_id: Option<String>,
    /// First day to include.
    pub from: Option<NaiveDate>,
    /// Last day to include.
    pub to: Option<NaiveDate>,
}

impl AttendanceQuery {
    /// Returns true if the record passes the query.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.as_deref().is_none_or(|e| e == record.employee_id)
            && self.project_id.as_deref().is_none_or(|p| p == record.project_id)
            && self.from.is_none_or(|from| record.date >= from)
            && self.to.is_none_or(|to| record.date <= to)
    }
}

/// Persistence operations required by the payroll service.
///
/// Lookups that find nothing return `Ok(None)` (or `Ok(false)` for deletes);
/// errors are reserved for storage failures and uniqueness violations.
pub trait PayrollStore: Send + Sync {
    /// List assignments matching the filter's employee and project.
    fn list_assignments(&self, filter: &RecordFilter) -> EngineResult<Vec<Assignment>>;

    /// Store an assignment, replacing any with the same id.
    fn insert_assignment(&self, assignment: Assignment) -> EngineResult<()>;

    /// List attendance records matching the query.
    fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>>;

    /// Upsert an attendance record by `(employee_id, date)`. An existing
    /// record keeps its id and takes the new project and status.
    fn upsert_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord>;

    /// Find the payroll snapshot for a key.
    fn find_payroll(&self, key: &RecordKey) -> EngineResult<Option<PayrollSnapshot>>;

    /// Get a payroll snapshot by id.
    fn get_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollSnapshot>>;

    /// List payroll snapshots matching the filter.
    fn list_payroll(&self, filter: &RecordFilter) -> EngineResult<Vec<PayrollSnapshot>>;

    /// Insert or replace a payroll snapshot by id.
    fn save_payroll(&self, snapshot: PayrollSnapshot) -> EngineResult<()>;

    /// Delete a payroll snapshot. Returns false if it did not exist.
    fn delete_payroll(&self, id: Uuid) -> EngineResult<bool>;

    /// Get a ledger entry by id.
    fn get_ledger_entry(&self, id: Uuid) -> EngineResult<Option<LedgerEntry>>;

    /// Find the ledger entry for a key.
    fn find_ledger_entry(&self, key: &RecordKey) -> EngineResult<Option<LedgerEntry>>;

    /// List ledger entries matching the filter.
    fn list_ledger(&self, filter: &RecordFilter) -> EngineResult<Vec<LedgerEntry>>;

    /// Insert or replace a ledger entry by id.
    fn save_ledger_entry(&self, entry: LedgerEntry) -> EngineResult<()>;

    /// Overwrite the balance of an existing ledger entry.
    fn update_ledger_balance(&self, id: Uuid, balance: Decimal) -> EngineResult<()>;

    /// List payments matching the filter's employee and project.
    fn list_payments(&self, filter: &RecordFilter) -> EngineResult<Vec<Payment>>;

    /// Append a payment.
    fn insert_payment(&self, payment: Payment) -> EngineResult<()>;

    /// Get a payment by id.
    fn get_payment(&self, id: Uuid) -> EngineResult<Option<Payment>>;

    /// Delete a payment. Returns false if it did not exist.
    fn delete_payment(&self, id: Uuid) -> EngineResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = RecordFilter::default();
        assert!(filter.matches("emp_001", Some("prj_001"), Some(1), Some(2026)));
        assert!(filter.matches("emp_002", None, None, None));
    }

    #[test]
    fn test_pair_filter_matches_any_period() {
        let filter = RecordFilter::for_pair("emp_001", "prj_001");
        assert!(filter.matches("emp_001", Some("prj_001"), Some(3), Some(2025)));
        assert!(!filter.matches("emp_001", Some("prj_002"), Some(3), Some(2025)));
        assert!(!filter.matches("emp_002", Some("prj_001"), Some(3), Some(2025)));
    }

    #[test]
    fn test_project_filter_excludes_untargeted() {
        let filter = RecordFilter::for_pair("emp_001", "prj_001");
        assert!(!filter.matches("emp_001", None, None, None));
        assert!(RecordFilter::for_employee("emp_001").matches("emp_001", None, None, None));
    }

    #[test]
    fn test_period_filter() {
        let filter = RecordFilter {
            month: Some(2),
            year: Some(2026),
            ..RecordFilter::default()
        };
        assert!(filter.matches("emp_001", Some("prj_001"), Some(2), Some(2026)));
        assert!(!filter.matches("emp_001", Some("prj_001"), Some(2), Some(2025)));
        assert!(!filter.matches("emp_001", Some("prj_001"), Some(1), Some(2026)));
    }

    #[test]
    fn test_attendance_query_date_range() {
        let query = AttendanceQuery {
            employee_id: Some("emp_001".to_string()),
            from: Some(date(2026, 1, 10)),
            to: Some(date(2026, 1, 20)),
            ..AttendanceQuery::default()
        };
        let record = |day: u32| AttendanceRecord {
            id: Uuid::nil(),
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            date: date(2026, 1, day),
            status: "P".to_string(),
        };

        assert!(query.matches(&record(10)));
        assert!(query.matches(&record(20)));
        assert!(!query.matches(&record(9)));
        assert!(!query.matches(&record(21)));
    }
}
