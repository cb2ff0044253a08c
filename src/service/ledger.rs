//! Ledger updates, balance recalculation and the paid toggle.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    chain_balance, previous_unpaid_balance, recompute_balances, split_social_charges,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{LedgerEntry, PayrollSnapshot};
use crate::store::RecordFilter;

use super::PayrollService;

/// Counts from one balance recalculation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationSummary {
    /// Entries walked.
    pub examined: usize,
    /// Entries whose balance was rewritten.
    pub updated: usize,
    /// Entries whose rewrite failed.
    pub failed: usize,
}

/// The result of toggling an entry's paid flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// The entry after the toggle and any recalculation.
    pub entry: LedgerEntry,
    /// Whether the pair's balances were recalculated.
    pub recalculated: bool,
    /// Why recalculation failed, if it did. The toggle itself still stands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recalculation_error: Option<String>,
}

impl PayrollService {
    /// Upserts the ledger entry for a payroll snapshot.
    ///
    /// Earned and withheld components are overwritten; `paid_amount` and
    /// `is_paid` of an existing entry are kept. The balance written here is
    /// provisional and is settled by [`PayrollService::recalculate_balances`].
    pub fn update_ledger(&self, snapshot: &PayrollSnapshot) -> EngineResult<LedgerEntry> {
        let key = snapshot.key();
        let components = split_social_charges(snapshot);
        let now = Utc::now();

        let pair = self
            .store()
            .list_ledger(&RecordFilter::for_pair(&key.employee_id, &key.project_id))?;
        let previous = previous_unpaid_balance(&pair, (key.year, key.month));

        let mut entry = match pair.into_iter().find(|e| e.key() == key) {
            Some(mut existing) => {
                existing.apply_components(&components, now);
                existing
            }
            None => LedgerEntry::new(&key, &components, previous, now),
        };
        entry.balance = chain_balance(previous, &entry);

        self.store().save_ledger_entry(entry.clone())?;
        debug!(
            record = %key,
            total_earned = %entry.total_earned,
            total_withheld = %entry.total_withheld,
            balance = %entry.balance,
            "Ledger entry upserted"
        );

        Ok(entry)
    }

    /// Recomputes the running balance of every ledger entry of a pair.
    ///
    /// Rows whose write fails are logged and counted; the pass continues and
    /// later rows chain from the recomputed value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Recalculation`] if the pair's entries cannot be
    /// loaded.
    pub fn recalculate_balances(
        &self,
        employee_id: &str,
        project_id: &str,
    ) -> EngineResult<RecalculationSummary> {
        let mut entries = self
            .store()
            .list_ledger(&RecordFilter::for_pair(employee_id, project_id))
            .map_err(|err| EngineError::Recalculation {
                employee_id: employee_id.to_string(),
                project_id: project_id.to_string(),
                message: err.to_string(),
            })?;

        let changes = recompute_balances(&mut entries);
        let mut summary = RecalculationSummary {
            examined: entries.len(),
            ..RecalculationSummary::default()
        };

        for change in &changes {
            match self
                .store()
                .update_ledger_balance(change.entry_id, change.new_balance)
            {
                Ok(()) => summary.updated += 1,
                Err(err) => {
                    warn!(
                        entry_id = %change.entry_id,
                        year = change.period.0,
                        month = change.period.1,
                        old_balance = %change.old_balance,
                        new_balance = %change.new_balance,
                        error = %err,
                        "Failed to write recalculated balance"
                    );
                    summary.failed += 1;
                }
            }
        }

        debug!(
            employee_id = %employee_id,
            project_id = %project_id,
            examined = summary.examined,
            updated = summary.updated,
            failed = summary.failed,
            "Balance recalculation completed"
        );

        Ok(summary)
    }

    /// Marks a ledger entry paid or unpaid and recalculates its pair.
    ///
    /// Marking an entry paid zeroes its balance in the same write. A
    /// recalculation failure is reported in the outcome without undoing the
    /// toggle.
    pub fn set_paid(&self, id: Uuid, is_paid: bool) -> EngineResult<ToggleOutcome> {
        let mut entry = self.get_ledger_entry(id)?;

        entry.is_paid = is_paid;
        if is_paid {
            entry.balance = Decimal::ZERO;
        }
        entry.updated_at = Utc::now();
        self.store().save_ledger_entry(entry.clone())?;

        info!(
            entry_id = %id,
            record = %entry.key(),
            is_paid = is_paid,
            "Ledger entry paid status changed"
        );

        let (recalculated, recalculation_error) =
            match self.recalculate_balances(&entry.employee_id, &entry.project_id) {
                Ok(_) => (true, None),
                Err(err) => {
                    warn!(entry_id = %id, error = %err, "Recalculation after toggle failed");
                    (false, Some(err.to_string()))
                }
            };

        let entry = match self.store().get_ledger_entry(id) {
            Ok(Some(current)) => current,
            Ok(None) => entry,
            Err(err) => {
                warn!(entry_id = %id, error = %err, "Reloading toggled ledger entry failed");
                entry
            }
        };

        Ok(ToggleOutcome {
            entry,
            recalculated,
            recalculation_error,
        })
    }

    /// Lists ledger entries, newest period first.
    pub fn list_ledger(&self, filter: &RecordFilter) -> EngineResult<Vec<LedgerEntry>> {
        let mut entries = self.store().list_ledger(filter)?;
        entries.sort_by(|a, b| {
            b.sort_key()
                .cmp(&a.sort_key())
                .then_with(|| (&a.employee_id, &a.project_id).cmp(&(&b.employee_id, &b.project_id)))
        });
        Ok(entries)
    }

    /// Returns one ledger entry.
    pub fn get_ledger_entry(&self, id: Uuid) -> EngineResult<LedgerEntry> {
        self.store()
            .get_ledger_entry(id)?
            .ok_or_else(|| EngineError::not_found("Ledger entry", id))
    }
}
