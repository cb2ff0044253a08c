//! Manual social charges payments.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    allocate_untargeted, apply_payment, most_recent_entry, reverse_payment, round_currency,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{LedgerEntry, Payment};
use crate::store::RecordFilter;

use super::{PayrollService, require_id};

/// A payment to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// The employee paid.
    pub employee_id: String,
    /// The targeted project; `None` spreads the payment over all projects.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Amount paid. Rounded to whole currency units on intake.
    pub amount: Decimal,
    /// The date the payment was made.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// The result of recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// The stored payment.
    pub payment: Payment,
    /// Ledger entries the payment was applied to, as stored afterwards.
    pub updated_entries: Vec<LedgerEntry>,
    /// The part of an untargeted payment no entry could absorb. It is dropped.
    pub unallocated: Decimal,
}

/// The result of deleting a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDeletion {
    /// The deleted payment.
    pub payment: Payment,
    /// The entry the payment was reversed against, if any.
    pub reversed_entry: Option<LedgerEntry>,
}

impl PayrollService {
    /// Records a manual payment and applies it to the ledger.
    ///
    /// A targeted payment is applied in full to the most recent entry of its
    /// pair, even past zero; on an entry already marked paid only the paid
    /// amount grows and the balance stays zero. An untargeted payment is spread over the most
    /// recent entry of each of the employee's projects, largest balance
    /// first, and any remainder is dropped. Balances are not recalculated.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the rounded amount is not positive or
    /// would take an entry out of the decimal range, and
    /// [`EngineError::NotFound`] when there is no ledger entry to apply the
    /// payment to. No payment is stored in any of these cases.
    pub fn record_payment(&self, request: NewPayment) -> EngineResult<PaymentOutcome> {
        require_id("employee_id", &request.employee_id)?;
        let amount = round_currency(request.amount);
        if amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                format!("must be greater than zero after rounding, got {}", amount),
            ));
        }
        let project_id = request.project_id.filter(|p| !p.trim().is_empty());
        let now = Utc::now();

        let payment = Payment {
            id: Uuid::new_v4(),
            employee_id: request.employee_id,
            project_id,
            amount,
            payment_date: request.payment_date,
            notes: request.notes,
            created_at: now,
        };

        let (updated_entries, unallocated) = match payment.project_id.as_deref() {
            Some(project_id) => {
                let entries = self
                    .store()
                    .list_ledger(&RecordFilter::for_pair(&payment.employee_id, project_id))?;
                let mut target = most_recent_entry(&entries, &payment.employee_id, project_id)
                    .cloned()
                    .ok_or_else(|| {
                        EngineError::not_found(
                            "Ledger entry",
                            format!("{}/{}", payment.employee_id, project_id),
                        )
                    })?;

                apply_payment(&mut target, amount, now)?;
                self.store().insert_payment(payment.clone())?;
                self.store().save_ledger_entry(target.clone())?;
                (vec![target], Decimal::ZERO)
            }
            None => {
                let entries = self
                    .store()
                    .list_ledger(&RecordFilter::for_employee(&payment.employee_id))?;
                if entries.is_empty() {
                    return Err(EngineError::not_found(
                        "Ledger history",
                        &payment.employee_id,
                    ));
                }

                let plan = allocate_untargeted(&entries, &payment.employee_id, amount);

                let mut updated = Vec::with_capacity(plan.allocations.len());
                for allocation in &plan.allocations {
                    let Some(entry) = entries.iter().find(|e| e.id == allocation.entry_id) else {
                        continue;
                    };
                    let mut entry = entry.clone();
                    apply_payment(&mut entry, allocation.amount, now)?;
                    updated.push(entry);
                }

                self.store().insert_payment(payment.clone())?;
                for entry in &updated {
                    self.store().save_ledger_entry(entry.clone())?;
                }

                if plan.unallocated > Decimal::ZERO {
                    warn!(
                        payment_id = %payment.id,
                        employee_id = %payment.employee_id,
                        unallocated = %plan.unallocated,
                        "Payment exceeds outstanding balances, remainder not applied"
                    );
                }
                (updated, plan.unallocated)
            }
        };

        info!(
            payment_id = %payment.id,
            employee_id = %payment.employee_id,
            project_id = payment.project_id.as_deref().unwrap_or("-"),
            amount = %amount,
            entries_updated = updated_entries.len(),
            "Payment recorded"
        );

        Ok(PaymentOutcome {
            payment,
            updated_entries,
            unallocated,
        })
    }

    /// Deletes a payment.
    ///
    /// A targeted payment is reversed against whichever entry of its pair is
    /// the most recent now, which may differ from the entry it was applied
    /// to. An untargeted payment is removed without touching the ledger.
    pub fn delete_payment(&self, id: Uuid) -> EngineResult<PaymentDeletion> {
        let payment = self
            .store()
            .get_payment(id)?
            .ok_or_else(|| EngineError::not_found("Payment", id))?;

        let reversed_entry = match payment.project_id.as_deref() {
            Some(project_id) => {
                let entries = self
                    .store()
                    .list_ledger(&RecordFilter::for_pair(&payment.employee_id, project_id))?;
                match most_recent_entry(&entries, &payment.employee_id, project_id).cloned() {
                    Some(mut current) => {
                        reverse_payment(&mut current, payment.amount, Utc::now())?;
                        self.store().save_ledger_entry(current.clone())?;
                        Some(current)
                    }
                    None => None,
                }
            }
            None => None,
        };

        self.store().delete_payment(id)?;
        info!(
            payment_id = %id,
            employee_id = %payment.employee_id,
            reversed = reversed_entry.is_some(),
            "Payment deleted"
        );

        Ok(PaymentDeletion {
            payment,
            reversed_entry,
        })
    }

    /// Lists payments, most recent payment date first.
    pub fn list_payments(&self, filter: &RecordFilter) -> EngineResult<Vec<Payment>> {
        let mut payments = self.store().list_payments(filter)?;
        payments.sort_by(|a, b| {
            (b.payment_date, b.created_at).cmp(&(a.payment_date, a.created_at))
        });
        Ok(payments)
    }
}
