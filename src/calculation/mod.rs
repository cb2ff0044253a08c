//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions behind payroll generation and the
//! social charges ledger: attendance classification, the monthly payroll
//! calculation, splitting social charges into leave components, running
//! balance propagation, manual payment allocation and currency rounding.
//! Nothing here touches storage.

mod attendance_classifier;
mod balance_chain;
mod ledger_split;
mod payment_allocation;
mod payroll_calculator;
mod rounding;

pub use attendance_classifier::{LeaveBucket, StatusClass, classify_code, classify_status};
pub use balance_chain::{BalanceChange, chain_balance, previous_unpaid_balance, recompute_balances};
pub use ledger_split::{
    major_leave_share, minor_leave_share, split_earned, split_social_charges, split_withheld,
};
pub use payment_allocation::{
    Allocation, AllocationPlan, allocate_untargeted, apply_payment, latest_per_project,
    most_recent_entry, reverse_payment,
};
pub use payroll_calculator::{
    AttendanceTally, calculate_payroll, figures_from_tally, sc_base_rate, tally_attendance,
};
pub use rounding::{balance_tolerance, round_currency};
