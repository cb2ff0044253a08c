//! Manual social charges payment model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A manual cash movement against an employee's social charges ledger.
///
/// Payments are append-only. A payment with a `project_id` targets that
/// project's current ledger entry; one without is spread over the employee's
/// projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The targeted project, if any.
    pub project_id: Option<String>,
    /// Amount paid, in whole currency units.
    pub amount: Decimal,
    /// The date the payment was made.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns true if the payment targets a single project.
    pub fn is_targeted(&self) -> bool {
        self.project_id.is_some()
    }
}
