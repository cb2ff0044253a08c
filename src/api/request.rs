//! Request types for the payroll API.
//!
//! This module defines the JSON bodies accepted by the write endpoints and
//! their conversion into domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Assignment, AttendanceRecord};
use crate::service::NewPayment;
use crate::store::RecordFilter;

/// Request body for `POST /assignments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// The assigned employee.
    pub employee_id: String,
    /// The project.
    pub project_id: String,
    /// The employee's role on the project.
    #[serde(default)]
    pub role: String,
    /// Monthly salary.
    pub monthly_salary: Decimal,
    /// First day of the assignment.
    pub start_date: NaiveDate,
    /// Last day of the assignment; omit for open-ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl From<AssignmentRequest> for Assignment {
    fn from(req: AssignmentRequest) -> Self {
        Assignment {
            id: Uuid::new_v4(),
            employee_id: req.employee_id,
            project_id: req.project_id,
            role: req.role,
            monthly_salary: req.monthly_salary,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Request body for `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The employee.
    pub employee_id: String,
    /// The project worked on.
    pub project_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Status code (e.g. "P", "SL").
    pub status: String,
}

impl From<AttendanceRequest> for AttendanceRecord {
    fn from(req: AttendanceRequest) -> Self {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: req.employee_id,
            project_id: req.project_id,
            date: req.date,
            status: req.status,
        }
    }
}

/// Request body for `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayrollRequest {
    /// Month to generate (1-12).
    pub month: u32,
    /// Year to generate.
    pub year: i32,
    /// Restrict generation to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Restrict generation to one project.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl GeneratePayrollRequest {
    /// Returns the employee and project scope of the request.
    pub fn scope(&self) -> RecordFilter {
        RecordFilter {
            employee_id: self.employee_id.clone(),
            project_id: self.project_id.clone(),
            month: None,
            year: None,
        }
    }
}

/// Request body for `PATCH /social-charges/ledger/:id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TogglePaidRequest {
    /// New paid status.
    pub is_paid: bool,
}

/// Request body for `POST /social-charges/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The employee paid.
    pub employee_id: String,
    /// The targeted project; omit to spread over all projects.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Amount paid.
    pub amount: Decimal,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl From<PaymentRequest> for NewPayment {
    fn from(req: PaymentRequest) -> Self {
        NewPayment {
            employee_id: req.employee_id,
            project_id: req.project_id,
            amount: req.amount,
            payment_date: req.payment_date,
            notes: req.notes,
        }
    }
}
