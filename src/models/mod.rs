//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod attendance;
mod ledger;
mod payment;
mod payroll;
mod period;

pub use assignment::Assignment;
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use ledger::{LedgerComponents, LedgerEntry, LeaveComponents};
pub use payment::Payment;
pub use payroll::{LeaveDayCounts, PayrollFigures, PayrollSnapshot};
pub use period::{MAX_YEAR, MIN_YEAR, PayrollPeriod, RecordKey};
