//! Fixtures and a fault-injecting store for service tests.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Assignment, AttendanceRecord, LedgerEntry, Payment, PayrollSnapshot, RecordKey,
};
use crate::store::{AttendanceQuery, InMemoryStore, PayrollStore, RecordFilter};

use super::PayrollService;

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// An [`InMemoryStore`] whose ledger reads and balance writes can be made to fail.
#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: InMemoryStore,
    pub fail_ledger_list: AtomicBool,
    pub fail_balance_update: AtomicBool,
    /// Ledger lists still allowed plus one; zero means no limit.
    ledger_list_allowance: AtomicUsize,
    /// Same countdown for single ledger entry reads.
    ledger_get_allowance: AtomicUsize,
}

impl FlakyStore {
    /// Fails every ledger list, or with `false` clears all ledger list faults.
    pub fn fail_ledger_list(&self, fail: bool) {
        self.fail_ledger_list.store(fail, Ordering::SeqCst);
        if !fail {
            self.ledger_list_allowance.store(0, Ordering::SeqCst);
        }
    }

    pub fn fail_balance_update(&self, fail: bool) {
        self.fail_balance_update.store(fail, Ordering::SeqCst);
    }

    /// Lets the next `calls` ledger lists through and fails every one after.
    pub fn fail_ledger_list_after(&self, calls: usize) {
        self.ledger_list_allowance.store(calls + 1, Ordering::SeqCst);
    }

    /// Lets the next `calls` ledger entry reads through and fails every one after.
    pub fn fail_ledger_get_after(&self, calls: usize) {
        self.ledger_get_allowance.store(calls + 1, Ordering::SeqCst);
    }
}

/// Counts one call against an allowance; `false` once it is spent.
fn take_allowance(allowance: &AtomicUsize) -> bool {
    match allowance.load(Ordering::SeqCst) {
        0 => true,
        1 => false,
        _ => {
            allowance.fetch_sub(1, Ordering::SeqCst);
            true
        }
    }
}

impl PayrollStore for FlakyStore {
    fn list_assignments(&self, filter: &RecordFilter) -> EngineResult<Vec<Assignment>> {
        self.inner.list_assignments(filter)
    }

    fn insert_assignment(&self, assignment: Assignment) -> EngineResult<()> {
        self.inner.insert_assignment(assignment)
    }

    fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>> {
        self.inner.list_attendance(query)
    }

    fn upsert_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord> {
        self.inner.upsert_attendance(record)
    }

    fn find_payroll(&self, key: &RecordKey) -> EngineResult<Option<PayrollSnapshot>> {
        self.inner.find_payroll(key)
    }

    fn get_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollSnapshot>> {
        self.inner.get_payroll(id)
    }

    fn list_payroll(&self, filter: &RecordFilter) -> EngineResult<Vec<PayrollSnapshot>> {
        self.inner.list_payroll(filter)
    }

    fn save_payroll(&self, snapshot: PayrollSnapshot) -> EngineResult<()> {
        self.inner.save_payroll(snapshot)
    }

    fn delete_payroll(&self, id: Uuid) -> EngineResult<bool> {
        self.inner.delete_payroll(id)
    }

    fn get_ledger_entry(&self, id: Uuid) -> EngineResult<Option<LedgerEntry>> {
        if !take_allowance(&self.ledger_get_allowance) {
            return Err(EngineError::persistence("ledger entry read failed"));
        }
        self.inner.get_ledger_entry(id)
    }

    fn find_ledger_entry(&self, key: &RecordKey) -> EngineResult<Option<LedgerEntry>> {
        self.inner.find_ledger_entry(key)
    }

    fn list_ledger(&self, filter: &RecordFilter) -> EngineResult<Vec<LedgerEntry>> {
        if self.fail_ledger_list.load(Ordering::SeqCst) {
            return Err(EngineError::persistence("ledger table unavailable"));
        }
        if !take_allowance(&self.ledger_list_allowance) {
            return Err(EngineError::persistence("ledger table unavailable"));
        }
        self.inner.list_ledger(filter)
    }

    fn save_ledger_entry(&self, entry: LedgerEntry) -> EngineResult<()> {
        self.inner.save_ledger_entry(entry)
    }

    fn update_ledger_balance(&self, id: Uuid, balance: Decimal) -> EngineResult<()> {
        if self.fail_balance_update.load(Ordering::SeqCst) {
            return Err(EngineError::persistence("balance write rejected"));
        }
        self.inner.update_ledger_balance(id, balance)
    }

    fn list_payments(&self, filter: &RecordFilter) -> EngineResult<Vec<Payment>> {
        self.inner.list_payments(filter)
    }

    fn insert_payment(&self, payment: Payment) -> EngineResult<()> {
        self.inner.insert_payment(payment)
    }

    fn get_payment(&self, id: Uuid) -> EngineResult<Option<Payment>> {
        self.inner.get_payment(id)
    }

    fn delete_payment(&self, id: Uuid) -> EngineResult<bool> {
        self.inner.delete_payment(id)
    }
}

/// A service over a fresh [`FlakyStore`], plus a handle to the store.
pub(crate) fn service() -> (PayrollService, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::default());
    (PayrollService::new(store.clone()), store)
}

pub(crate) fn assignment(employee: &str, project: &str, salary: &str) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        employee_id: employee.to_string(),
        project_id: project.to_string(),
        role: "Engineer".to_string(),
        monthly_salary: dec(salary),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: None,
    }
}

pub(crate) fn attendance(
    employee: &str,
    project: &str,
    year: i32,
    month: u32,
    day: u32,
    status: &str,
) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        employee_id: employee.to_string(),
        project_id: project.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        status: status.to_string(),
    }
}

/// Records `present` present days followed by the given trailing codes for
/// every remaining day of January 2026.
pub(crate) fn record_january(
    service: &PayrollService,
    employee: &str,
    project: &str,
    present: u32,
    trailing: &[&str],
) {
    for day in 1..=present {
        service
            .record_attendance(attendance(employee, project, 2026, 1, day, "P"))
            .unwrap();
    }
    for (offset, code) in trailing.iter().enumerate() {
        let day = present + 1 + offset as u32;
        service
            .record_attendance(attendance(employee, project, 2026, 1, day, code))
            .unwrap();
    }
}
