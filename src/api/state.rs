//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tracing::info;

use crate::config::SeedData;
use crate::error::EngineResult;
use crate::service::PayrollService;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Holds the payroll service every handler delegates to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around a service.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a state backed by an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(PayrollService::new(Arc::new(InMemoryStore::new())))
    }

    /// Creates a state backed by an in-memory store populated from seed data.
    pub fn seeded(seed: &SeedData) -> EngineResult<Self> {
        let state = Self::in_memory();
        let service = state.service();

        for assignment in seed.assignments.iter().cloned() {
            service.register_assignment(assignment.into())?;
        }

        let mut attendance_days = 0;
        for run in &seed.attendance {
            for record in run.to_records() {
                service.record_attendance(record)?;
                attendance_days += 1;
            }
        }

        info!(
            assignments = seed.assignments.len(),
            attendance_days = attendance_days,
            "Store seeded"
        );

        Ok(state)
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
