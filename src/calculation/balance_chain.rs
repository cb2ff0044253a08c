//! Running balance propagation across an employee-project pair's ledger.
//!
//! A paid entry always has a zero balance. An unpaid entry's balance is the
//! balance of the most recent earlier unpaid entry plus what it earned minus
//! what was withheld, rounded. Paid entries are skipped when looking for the
//! earlier balance, so marking a month paid does not reset the chain.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::LedgerEntry;

use super::rounding::{balance_tolerance, round_currency};

/// A balance rewrite produced by [`recompute_balances`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// The entry to rewrite.
    pub entry_id: Uuid,
    /// The `(year, month)` of the entry.
    pub period: (i32, u32),
    /// The balance currently stored.
    pub old_balance: Decimal,
    /// The balance the entry should hold.
    pub new_balance: Decimal,
}

/// Returns the balance an entry should hold given the previous unpaid balance.
pub fn chain_balance(previous_unpaid: Decimal, entry: &LedgerEntry) -> Decimal {
    if entry.is_paid {
        Decimal::ZERO
    } else {
        round_currency(previous_unpaid + entry.total_earned - entry.total_withheld)
    }
}

/// Returns the balance of the most recent unpaid entry strictly before
/// `period`, or zero if there is none.
///
/// `entries` may be in any order; it is scanned in full.
pub fn previous_unpaid_balance(entries: &[LedgerEntry], period: (i32, u32)) -> Decimal {
    entries
        .iter()
        .filter(|e| !e.is_paid && e.sort_key() < period)
        .max_by_key(|e| e.sort_key())
        .map(|e| e.balance)
        .unwrap_or(Decimal::ZERO)
}

/// Recomputes every balance of one pair's ledger in a single forward pass.
///
/// The entries are sorted by `(year, month)` ascending in place and each
/// entry's balance is set to its chained value. The returned changes list
/// the entries whose stored balance differed by more than the tolerance, in
/// chronological order; entries within tolerance keep their stored value.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::recompute_balances;
/// use payroll_engine::models::{LedgerComponents, LedgerEntry, RecordKey};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let entry = |month: u32, earned: i64, withheld: i64| {
///     let key = RecordKey {
///         employee_id: "emp_001".to_string(),
///         project_id: "prj_001".to_string(),
///         month,
///         year: 2026,
///     };
///     let components = LedgerComponents {
///         total_earned: Decimal::from(earned),
///         total_withheld: Decimal::from(withheld),
///         ..LedgerComponents::default()
///     };
///     LedgerEntry::new(&key, &components, Decimal::ZERO, Utc::now())
/// };
///
/// let mut entries = vec![entry(2, 6000, 1000), entry(1, 5000, 0)];
/// let changes = recompute_balances(&mut entries);
///
/// assert_eq!(changes.len(), 2);
/// assert_eq!(entries[0].balance, Decimal::from(5000));
/// assert_eq!(entries[1].balance, Decimal::from(10000));
/// ```
pub fn recompute_balances(entries: &mut [LedgerEntry]) -> Vec<BalanceChange> {
    entries.sort_by_key(|e| e.sort_key());

    let tolerance = balance_tolerance();
    let mut previous_unpaid = Decimal::ZERO;
    let mut changes = Vec::new();

    for entry in entries.iter_mut() {
        let new_balance = chain_balance(previous_unpaid, entry);

        if (entry.balance - new_balance).abs() > tolerance {
            changes.push(BalanceChange {
                entry_id: entry.id,
                period: entry.sort_key(),
                old_balance: entry.balance,
                new_balance,
            });
            entry.balance = new_balance;
        }

        if !entry.is_paid {
            previous_unpaid = new_balance;
        }
    }

    changes
}
