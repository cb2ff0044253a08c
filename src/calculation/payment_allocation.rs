//! Manual payment allocation over ledger entries.
//!
//! A targeted payment lands entirely on the most recent entry of its
//! employee-project pair. An untargeted payment is spread greedily over the
//! most recent entry of each of the employee's projects, largest balance
//! first, never paying more than an entry's positive balance.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::LedgerEntry;

use super::rounding::round_currency;

/// One slice of an untargeted payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The ledger entry receiving the slice.
    pub entry_id: Uuid,
    /// The project of the entry.
    pub project_id: String,
    /// The amount applied.
    pub amount: Decimal,
}

/// The result of planning an untargeted payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllocationPlan {
    /// Slices to apply, in allocation order.
    pub allocations: Vec<Allocation>,
    /// The part of the payment no entry could absorb. It is not applied.
    pub unallocated: Decimal,
}

impl AllocationPlan {
    /// Returns the total amount allocated.
    pub fn allocated(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}

/// Returns the most recent entry (by year, month) for an employee-project pair.
pub fn most_recent_entry<'a>(
    entries: &'a [LedgerEntry],
    employee_id: &str,
    project_id: &str,
) -> Option<&'a LedgerEntry> {
    entries
        .iter()
        .filter(|e| e.belongs_to(employee_id, project_id))
        .max_by_key(|e| e.sort_key())
}

/// Returns the most recent entry of each project the employee has history on,
/// ordered by project id.
pub fn latest_per_project<'a>(entries: &'a [LedgerEntry], employee_id: &str) -> Vec<&'a LedgerEntry> {
    let mut latest: BTreeMap<&str, &LedgerEntry> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.employee_id == employee_id) {
        latest
            .entry(entry.project_id.as_str())
            .and_modify(|current| {
                if entry.sort_key() > current.sort_key() {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }

    latest.into_values().collect()
}

/// Plans an untargeted payment over the employee's projects.
///
/// Only each project's most recent entry is considered. Entries are visited
/// by balance descending (ties by project id) and each receives
/// `min(max(balance, 0), remaining)`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::allocate_untargeted;
/// use payroll_engine::models::{LedgerComponents, LedgerEntry, RecordKey};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let entry = |project: &str, balance: i64| {
///     let key = RecordKey {
///         employee_id: "emp_001".to_string(),
///         project_id: project.to_string(),
///         month: 1,
///         year: 2026,
///     };
///     LedgerEntry::new(&key, &LedgerComponents::default(), Decimal::from(balance), Utc::now())
/// };
///
/// let entries = vec![entry("prj_a", 6000), entry("prj_b", 3000)];
/// let plan = allocate_untargeted(&entries, "emp_001", Decimal::from(8000));
///
/// assert_eq!(plan.allocations[0].amount, Decimal::from(6000));
/// assert_eq!(plan.allocations[1].amount, Decimal::from(2000));
/// assert_eq!(plan.unallocated, Decimal::ZERO);
/// ```
pub fn allocate_untargeted(entries: &[LedgerEntry], employee_id: &str, amount: Decimal) -> AllocationPlan {
    let mut candidates = latest_per_project(entries, employee_id);
    candidates.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });

    let mut remaining = amount;
    let mut allocations = Vec::new();

    for entry in candidates {
        if remaining <= Decimal::ZERO {
            break;
        }

        let slice = round_currency(entry.balance.max(Decimal::ZERO).min(remaining));
        if slice > Decimal::ZERO {
            allocations.push(Allocation {
                entry_id: entry.id,
                project_id: entry.project_id.clone(),
                amount: slice,
            });
            remaining -= slice;
        }
    }

    AllocationPlan {
        allocations,
        unallocated: remaining.max(Decimal::ZERO),
    }
}

/// Applies a payment to an entry: the paid amount grows and the balance
/// shrinks by `amount`. The balance may go negative. An entry marked paid
/// keeps a zero balance and only its paid amount moves.
///
/// The entry is left untouched on error.
///
/// # Errors
///
/// Returns a validation error on `amount` when either figure would leave
/// the decimal range.
pub fn apply_payment(entry: &mut LedgerEntry, amount: Decimal, now: DateTime<Utc>) -> EngineResult<()> {
    let out_of_range = || {
        EngineError::validation(
            "amount",
            format!("{} takes the ledger entry out of range", amount),
        )
    };

    let paid_amount = entry.paid_amount.checked_add(amount).ok_or_else(out_of_range)?;
    let balance = if entry.is_paid {
        Decimal::ZERO
    } else {
        entry.balance.checked_sub(amount).ok_or_else(out_of_range)?
    };

    entry.paid_amount = round_currency(paid_amount);
    entry.balance = round_currency(balance);
    entry.updated_at = now;
    Ok(())
}

/// Reverses a payment previously applied with [`apply_payment`].
pub fn reverse_payment(entry: &mut LedgerEntry, amount: Decimal, now: DateTime<Utc>) -> EngineResult<()> {
    apply_payment(entry, -amount, now)
}
