//! Social charges ledger models.
//!
//! A [`LedgerEntry`] tracks, per employee-project-month, how much social
//! charges were earned, how much was withheld by leave, what was paid out
//! manually, and the running balance of the pair.
//!
//! # Field ownership
//!
//! The entry has two independent writers:
//!
//! - the ledger updater owns `earned`, `total_earned`, `withheld`,
//!   `total_withheld` and the balance written on upsert;
//! - the payment allocator and the paid/unpaid toggle own `paid_amount`,
//!   `is_paid` and direct edits of `balance`.
//!
//! Neither writer may touch the other's fields. The balance recalculator reads
//! the whole row and rewrites `balance` only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordKey;

/// Social charges split across the four leave buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveComponents {
    /// Sick leave component.
    pub sick_leave: Decimal,
    /// Casual leave component.
    pub casual_leave: Decimal,
    /// Earned leave component.
    pub earned_leave: Decimal,
    /// Other payable component.
    pub other_payable: Decimal,
}

impl LeaveComponents {
    /// Returns the sum of all four components.
    pub fn total(&self) -> Decimal {
        self.sick_leave + self.casual_leave + self.earned_leave + self.other_payable
    }
}

/// The ledger fields written by the ledger updater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerComponents {
    /// Earned social charges per bucket.
    pub earned: LeaveComponents,
    /// Total earned social charges.
    pub total_earned: Decimal,
    /// Withheld social charges per bucket.
    pub withheld: LeaveComponents,
    /// Total withheld social charges.
    pub total_withheld: Decimal,
}

/// One month of the social charges ledger for an employee-project pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The employee.
    pub employee_id: String,
    /// The project.
    pub project_id: String,
    /// The month number (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
    /// Earned social charges per bucket.
    pub earned: LeaveComponents,
    /// Total earned social charges.
    pub total_earned: Decimal,
    /// Withheld social charges per bucket.
    pub withheld: LeaveComponents,
    /// Total withheld social charges.
    pub total_withheld: Decimal,
    /// Manual payments applied to this entry.
    pub paid_amount: Decimal,
    /// Whether the entry has been settled.
    pub is_paid: bool,
    /// Running balance of the pair as of this month.
    pub balance: Decimal,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last modified.
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates an unpaid entry with nothing paid against it.
    pub fn new(
        key: &RecordKey,
        components: &LedgerComponents,
        balance: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: key.employee_id.clone(),
            project_id: key.project_id.clone(),
            month: key.month,
            year: key.year,
            earned: components.earned,
            total_earned: components.total_earned,
            withheld: components.withheld,
            total_withheld: components.total_withheld,
            paid_amount: Decimal::ZERO,
            is_paid: false,
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the updater-owned fields. `paid_amount` and `is_paid` are
    /// left untouched.
    pub fn apply_components(&mut self, components: &LedgerComponents, now: DateTime<Utc>) {
        self.earned = components.earned;
        self.total_earned = components.total_earned;
        self.withheld = components.withheld;
        self.total_withheld = components.total_withheld;
        self.updated_at = now;
    }

    /// Returns the unique key of the entry.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            employee_id: self.employee_id.clone(),
            project_id: self.project_id.clone(),
            month: self.month,
            year: self.year,
        }
    }

    /// Returns the `(year, month)` ordering key of the entry.
    pub fn sort_key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Returns true if the entry belongs to the given employee-project pair.
    pub fn belongs_to(&self, employee_id: &str, project_id: &str) -> bool {
        self.employee_id == employee_id && self.project_id == project_id
    }
}
