//! Payroll and social charges orchestration.
//!
//! [`PayrollService`] drives the pure calculation functions against a
//! [`PayrollStore`]: payroll generation runs calculate, ledger update and
//! balance recalculation for each assignment in turn; the paid toggle and
//! manual payments mutate ledger entries directly.

mod ledger;
mod payments;
mod payroll;

#[cfg(test)]
pub(crate) mod testing;

pub use ledger::{RecalculationSummary, ToggleOutcome};
pub use payments::{NewPayment, PaymentDeletion, PaymentOutcome};
pub use payroll::{GenerationFailure, GenerationReport};

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Assignment, AttendanceRecord};
use crate::store::{AttendanceQuery, PayrollStore, RecordFilter};

/// Entry point for every payroll, ledger and payment operation.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
}

impl PayrollService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &dyn PayrollStore {
        self.store.as_ref()
    }

    /// Registers an assignment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank ids, a negative salary, or an end
    /// date before the start date.
    pub fn register_assignment(&self, assignment: Assignment) -> EngineResult<Assignment> {
        require_id("employee_id", &assignment.employee_id)?;
        require_id("project_id", &assignment.project_id)?;
        if assignment.monthly_salary < Decimal::ZERO {
            return Err(EngineError::validation(
                "monthly_salary",
                "must not be negative",
            ));
        }
        if let Some(end) = assignment.end_date {
            if end < assignment.start_date {
                return Err(EngineError::validation(
                    "end_date",
                    format!("must not be before start_date {}", assignment.start_date),
                ));
            }
        }

        self.store.insert_assignment(assignment.clone())?;
        debug!(
            assignment_id = %assignment.id,
            employee_id = %assignment.employee_id,
            project_id = %assignment.project_id,
            "Assignment registered"
        );
        Ok(assignment)
    }

    /// Lists assignments ordered by employee, project and start date.
    pub fn list_assignments(&self, filter: &RecordFilter) -> EngineResult<Vec<Assignment>> {
        let mut assignments = self.store.list_assignments(filter)?;
        assignments.sort_by(|a, b| {
            (&a.employee_id, &a.project_id, a.start_date)
                .cmp(&(&b.employee_id, &b.project_id, b.start_date))
        });
        Ok(assignments)
    }

    /// Records one day of attendance, replacing any record for the same
    /// employee and date.
    ///
    /// Unknown status codes are stored and count as unpaid days.
    pub fn record_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord> {
        require_id("employee_id", &record.employee_id)?;
        require_id("project_id", &record.project_id)?;
        if record.status.trim().is_empty() {
            return Err(EngineError::validation("status", "must not be empty"));
        }
        if record.parsed_status().is_none() {
            warn!(
                employee_id = %record.employee_id,
                date = %record.date,
                status = %record.status,
                "Unknown attendance status, day will count as unpaid"
            );
        }

        self.store.upsert_attendance(record)
    }

    /// Lists attendance records ordered by date then employee.
    pub fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>> {
        let mut records = self.store.list_attendance(query)?;
        records.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
        Ok(records)
    }
}

fn require_id(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "must not be empty"));
    }
    Ok(())
}
