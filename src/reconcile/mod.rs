//! Reconciliation of line-item prices against an assurance total.
//!
//! ## Flow
//!
//! 1. [`ReconciliationSession`] hands out the baseline prices
//! 2. Each configured [`Strategy`] proposes new prices before the [`Deadline`]
//! 3. [`PriceReconciler`] verifies proposals and keeps the best [`score`]
//!
//! ## Failure Model
//!
//! Invalid requests are errors. "No exact solution" is a normal
//! [`ReconcileOutcome::Failed`] value and leaves the caller's prices as
//! they were.

pub mod session;
pub mod strategy;
pub mod solver;

pub use session::ReconciliationSession;
pub use strategy::{Candidate, Deadline, Strategy};
pub use solver::{score, PriceReconciler, ReconcileOutcome, ReconcileRequest, Solution};
