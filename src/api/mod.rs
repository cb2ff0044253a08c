//! HTTP API for the payroll engine.
//!
//! This module exposes assignments, attendance, payroll generation, the
//! social charges ledger and manual payments as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AssignmentRequest, AttendanceRequest, GeneratePayrollRequest, PaymentRequest,
    TogglePaidRequest,
};
pub use response::{ApiError, ApiErrorResponse, DeletedResponse, HealthResponse};
pub use state::AppState;
