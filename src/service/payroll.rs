//! Payroll generation and snapshot queries.

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll;
use crate::error::{EngineError, EngineResult};
use crate::models::{Assignment, PayrollPeriod, PayrollSnapshot, RecordKey};
use crate::store::{AttendanceQuery, RecordFilter};

use super::PayrollService;

/// One assignment that could not be processed during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure {
    /// The assignment that failed.
    pub assignment_id: Uuid,
    /// Its employee.
    pub employee_id: String,
    /// Its project.
    pub project_id: String,
    /// What went wrong.
    pub error: String,
}

impl GenerationFailure {
    fn new(assignment: &Assignment, error: &EngineError) -> Self {
        Self {
            assignment_id: assignment.id,
            employee_id: assignment.employee_id.clone(),
            project_id: assignment.project_id.clone(),
            error: error.to_string(),
        }
    }
}

/// The outcome of a batch payroll generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// The period generated.
    pub period: PayrollPeriod,
    /// Number of assignments processed.
    pub processed: usize,
    /// Number of assignments with a stored snapshot.
    pub succeeded: usize,
    /// Number of assignments that failed.
    pub failed: usize,
    /// The snapshots written, in processing order.
    pub snapshots: Vec<PayrollSnapshot>,
    /// The failures, in processing order.
    pub failures: Vec<GenerationFailure>,
    /// Succeeded assignments whose balance recalculation failed afterwards.
    /// Their snapshot and ledger entry are stored; later balances of the
    /// pair may be stale until the next recalculation.
    #[serde(default)]
    pub recalculation_failures: Vec<GenerationFailure>,
}

impl PayrollService {
    /// Generates payroll for every assignment active in `period`.
    ///
    /// Only the employee and project of `scope` are used. Assignments are
    /// processed one at a time in employee, project order; each runs the
    /// calculation, the snapshot upsert, the ledger update and the balance
    /// recalculation for its pair before the next starts. A failing
    /// assignment is reported and the batch continues.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when no assignment is active for the
    /// period and scope, or a storage error if assignments cannot be listed.
    pub fn generate_payroll(
        &self,
        period: &PayrollPeriod,
        scope: &RecordFilter,
    ) -> EngineResult<GenerationReport> {
        let start_time = Instant::now();
        let scope = RecordFilter {
            employee_id: scope.employee_id.clone(),
            project_id: scope.project_id.clone(),
            month: None,
            year: None,
        };

        let assignments: Vec<Assignment> = self
            .list_assignments(&scope)?
            .into_iter()
            .filter(|a| a.is_active_during(period))
            .collect();

        if assignments.is_empty() {
            return Err(EngineError::not_found(
                "Active assignment",
                format!(
                    "{}/{}/{:04}-{:02}",
                    scope.employee_id.as_deref().unwrap_or("*"),
                    scope.project_id.as_deref().unwrap_or("*"),
                    period.year(),
                    period.month()
                ),
            ));
        }

        let mut snapshots = Vec::with_capacity(assignments.len());
        let mut failures = Vec::new();
        let mut recalculation_failures = Vec::new();

        for assignment in &assignments {
            match self.generate_for_assignment(assignment, period) {
                Ok((snapshot, recalculation)) => {
                    snapshots.push(snapshot);
                    if let Err(err) = recalculation {
                        recalculation_failures.push(GenerationFailure::new(assignment, &err));
                    }
                }
                Err(err) => {
                    warn!(
                        assignment_id = %assignment.id,
                        employee_id = %assignment.employee_id,
                        project_id = %assignment.project_id,
                        error = %err,
                        "Payroll generation failed for assignment"
                    );
                    failures.push(GenerationFailure::new(assignment, &err));
                }
            }
        }

        let report = GenerationReport {
            period: *period,
            processed: assignments.len(),
            succeeded: snapshots.len(),
            failed: failures.len(),
            snapshots,
            failures,
            recalculation_failures,
        };

        info!(
            month = period.month(),
            year = period.year(),
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            recalculation_failed = report.recalculation_failures.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Payroll generation completed"
        );

        Ok(report)
    }

    /// Runs the full chain for one assignment and returns the stored snapshot
    /// with the outcome of the balance recalculation.
    ///
    /// The snapshot and ledger entry are already stored when the
    /// recalculation runs, so its failure is returned beside the snapshot.
    fn generate_for_assignment(
        &self,
        assignment: &Assignment,
        period: &PayrollPeriod,
    ) -> EngineResult<(PayrollSnapshot, EngineResult<()>)> {
        let attendance = self.store().list_attendance(&AttendanceQuery {
            employee_id: Some(assignment.employee_id.clone()),
            project_id: Some(assignment.project_id.clone()),
            from: Some(period.first_day()),
            to: Some(period.last_day()),
        })?;

        let figures = calculate_payroll(assignment, period, &attendance);
        let key = RecordKey::new(&assignment.employee_id, &assignment.project_id, period);
        let now = Utc::now();

        let snapshot = match self.store().find_payroll(&key)? {
            Some(mut existing) => {
                existing.apply(&figures, now);
                existing
            }
            None => PayrollSnapshot::new(&key, &figures, now),
        };
        self.store().save_payroll(snapshot.clone())?;

        self.update_ledger(&snapshot)?;

        let recalculation = self
            .recalculate_balances(&key.employee_id, &key.project_id)
            .map(|_| ())
            .inspect_err(|err| {
                warn!(
                    record = %key,
                    error = %err,
                    "Balance recalculation failed after payroll upsert"
                );
            });

        Ok((snapshot, recalculation))
    }

    /// Lists payroll snapshots, newest period first.
    pub fn list_payroll(&self, filter: &RecordFilter) -> EngineResult<Vec<PayrollSnapshot>> {
        let mut snapshots = self.store().list_payroll(filter)?;
        snapshots.sort_by(|a, b| {
            (b.year, b.month)
                .cmp(&(a.year, a.month))
                .then_with(|| (&a.employee_id, &a.project_id).cmp(&(&b.employee_id, &b.project_id)))
        });
        Ok(snapshots)
    }

    /// Returns one payroll snapshot.
    pub fn get_payroll(&self, id: Uuid) -> EngineResult<PayrollSnapshot> {
        self.store()
            .get_payroll(id)?
            .ok_or_else(|| EngineError::not_found("Payroll", id))
    }

    /// Deletes one payroll snapshot. The ledger entry for the same key is
    /// left in place.
    pub fn delete_payroll(&self, id: Uuid) -> EngineResult<()> {
        if !self.store().delete_payroll(id)? {
            return Err(EngineError::not_found("Payroll", id));
        }
        info!(payroll_id = %id, "Payroll snapshot deleted");
        Ok(())
    }
}
