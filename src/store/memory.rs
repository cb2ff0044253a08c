//! In-memory [`PayrollStore`] adapter.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Assignment, AttendanceRecord, LedgerEntry, Payment, PayrollSnapshot, RecordKey,
};

use super::{AttendanceQuery, PayrollStore, RecordFilter};

#[derive(Debug, Default)]
struct Tables {
    assignments: HashMap<Uuid, Assignment>,
    attendance: HashMap<Uuid, AttendanceRecord>,
    payroll: HashMap<Uuid, PayrollSnapshot>,
    ledger: HashMap<Uuid, LedgerEntry>,
    payments: HashMap<Uuid, Payment>,
}

/// A process-local store backed by hash maps.
///
/// The lock only protects memory; it does not serialise multi-step
/// operations on the same employee-project pair.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| EngineError::persistence("store lock poisoned"))
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| EngineError::persistence("store lock poisoned"))
    }
}

fn key_conflict(entity: &str, key: &RecordKey) -> EngineError {
    EngineError::persistence(format!("{} already exists for {}", entity, key))
}

impl PayrollStore for InMemoryStore {
    fn list_assignments(&self, filter: &RecordFilter) -> EngineResult<Vec<Assignment>> {
        let tables = self.read()?;
        Ok(tables
            .assignments
            .values()
            .filter(|a| filter.matches(&a.employee_id, Some(&a.project_id), None, None))
            .cloned()
            .collect())
    }

    fn insert_assignment(&self, assignment: Assignment) -> EngineResult<()> {
        self.write()?.assignments.insert(assignment.id, assignment);
        Ok(())
    }

    fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        Ok(tables
            .attendance
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    fn upsert_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord> {
        let mut tables = self.write()?;

        if let Some(current) = tables
            .attendance
            .values_mut()
            .find(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            current.project_id = record.project_id;
            current.status = record.status;
            return Ok(current.clone());
        }

        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    fn find_payroll(&self, key: &RecordKey) -> EngineResult<Option<PayrollSnapshot>> {
        let tables = self.read()?;
        Ok(tables.payroll.values().find(|s| &s.key() == key).cloned())
    }

    fn get_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollSnapshot>> {
        Ok(self.read()?.payroll.get(&id).cloned())
    }

    fn list_payroll(&self, filter: &RecordFilter) -> EngineResult<Vec<PayrollSnapshot>> {
        let tables = self.read()?;
        Ok(tables
            .payroll
            .values()
            .filter(|s| {
                filter.matches(&s.employee_id, Some(&s.project_id), Some(s.month), Some(s.year))
            })
            .cloned()
            .collect())
    }

    fn save_payroll(&self, snapshot: PayrollSnapshot) -> EngineResult<()> {
        let mut tables = self.write()?;
        let key = snapshot.key();
        if tables
            .payroll
            .values()
            .any(|s| s.id != snapshot.id && s.key() == key)
        {
            return Err(key_conflict("payroll snapshot", &key));
        }
        tables.payroll.insert(snapshot.id, snapshot);
        Ok(())
    }

    fn delete_payroll(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.write()?.payroll.remove(&id).is_some())
    }

    fn get_ledger_entry(&self, id: Uuid) -> EngineResult<Option<LedgerEntry>> {
        Ok(self.read()?.ledger.get(&id).cloned())
    }

    fn find_ledger_entry(&self, key: &RecordKey) -> EngineResult<Option<LedgerEntry>> {
        let tables = self.read()?;
        Ok(tables.ledger.values().find(|e| &e.key() == key).cloned())
    }

    fn list_ledger(&self, filter: &RecordFilter) -> EngineResult<Vec<LedgerEntry>> {
        let tables = self.read()?;
        Ok(tables
            .ledger
            .values()
            .filter(|e| {
                filter.matches(&e.employee_id, Some(&e.project_id), Some(e.month), Some(e.year))
            })
            .cloned()
            .collect())
    }

    fn save_ledger_entry(&self, entry: LedgerEntry) -> EngineResult<()> {
        let mut tables = self.write()?;
        let key = entry.key();
        if tables
            .ledger
            .values()
            .any(|e| e.id != entry.id && e.key() == key)
        {
            return Err(key_conflict("ledger entry", &key));
        }
        tables.ledger.insert(entry.id, entry);
        Ok(())
    }

    fn update_ledger_balance(&self, id: Uuid, balance: Decimal) -> EngineResult<()> {
        let mut tables = self.write()?;
        let entry = tables
            .ledger
            .get_mut(&id)
            .ok_or_else(|| EngineError::not_found("Ledger entry", id))?;
        entry.balance = balance;
        entry.updated_at = chrono::Utc::now();
        Ok(())
    }

    fn list_payments(&self, filter: &RecordFilter) -> EngineResult<Vec<Payment>> {
        let tables = self.read()?;
        Ok(tables
            .payments
            .values()
            .filter(|p| filter.matches(&p.employee_id, p.project_id.as_deref(), None, None))
            .cloned()
            .collect())
    }

    fn insert_payment(&self, payment: Payment) -> EngineResult<()> {
        self.write()?.payments.insert(payment.id, payment);
        Ok(())
    }

    fn get_payment(&self, id: Uuid) -> EngineResult<Option<Payment>> {
        Ok(self.read()?.payments.get(&id).cloned())
    }

    fn delete_payment(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.write()?.payments.remove(&id).is_some())
    }
}
