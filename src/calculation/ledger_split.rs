//! Splitting a payroll snapshot's social charges across the leave buckets.
//!
//! Earned social charges are divided with fixed shares of the 20% base rate
//! (1.67 points each for sick and casual, 8.33 points each for earned and
//! other). Withheld social charges are divided in proportion to the leave
//! days taken in each bucket.

use rust_decimal::Decimal;

use crate::models::{LeaveComponents, LeaveDayCounts, LedgerComponents, PayrollSnapshot};

use super::payroll_calculator::sc_base_rate;
use super::rounding::round_currency;

/// Share of earned social charges for the sick and casual buckets (1.67 / 20).
pub fn minor_leave_share() -> Decimal {
    Decimal::new(167, 4) / sc_base_rate()
}

/// Share of earned social charges for the earned and other buckets (8.33 / 20).
pub fn major_leave_share() -> Decimal {
    Decimal::new(833, 4) / sc_base_rate()
}

/// Splits earned social charges across the four buckets.
///
/// Sick, casual and earned components are zero when no days were taken in
/// that bucket. The other component is always populated, so the buckets only
/// add up to `social_charges_amount` when every bucket has leave days.
pub fn split_earned(social_charges_amount: Decimal, leave_days: &LeaveDayCounts) -> LeaveComponents {
    let minor = round_currency(social_charges_amount * minor_leave_share());
    let major = round_currency(social_charges_amount * major_leave_share());

    LeaveComponents {
        sick_leave: if leave_days.sick > 0 { minor } else { Decimal::ZERO },
        casual_leave: if leave_days.casual > 0 { minor } else { Decimal::ZERO },
        earned_leave: if leave_days.earned > 0 { major } else { Decimal::ZERO },
        other_payable: major,
    }
}

/// Splits withheld social charges in proportion to each bucket's leave days.
pub fn split_withheld(total_withheld: Decimal, leave_days: &LeaveDayCounts) -> LeaveComponents {
    let total_days = leave_days.total();
    if total_days == 0 {
        return LeaveComponents::default();
    }

    let share = |days: u32| {
        if days == 0 {
            Decimal::ZERO
        } else {
            round_currency(total_withheld * Decimal::from(days) / Decimal::from(total_days))
        }
    };

    LeaveComponents {
        sick_leave: share(leave_days.sick),
        casual_leave: share(leave_days.casual),
        earned_leave: share(leave_days.earned),
        other_payable: share(leave_days.other),
    }
}

/// Derives the ledger components for a payroll snapshot.
///
/// `total_earned` is the snapshot's social charges amount and
/// `total_withheld` its deferred social charges, both already rounded.
pub fn split_social_charges(snapshot: &PayrollSnapshot) -> LedgerComponents {
    let leave_days = snapshot.leave_days();
    let total_earned = snapshot.social_charges_amount;
    let total_withheld = snapshot.deferred_social_charges;

    LedgerComponents {
        earned: split_earned(total_earned, &leave_days),
        total_earned,
        withheld: split_withheld(total_withheld, &leave_days),
        total_withheld,
    }
}
