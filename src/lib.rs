//! Payroll and social charges ledger engine.
//!
//! This crate turns daily attendance into monthly payroll snapshots, accrues
//! social charges into a per-employee, per-project ledger with a running
//! unpaid balance, and settles that balance through manual payments.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
