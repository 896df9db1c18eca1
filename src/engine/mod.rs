//! The payroll execution lifecycle engine.
//!
//! This module tree holds the engine's business logic: the run state
//! machine and its authorization table, the phase gate validator, draft
//! aggregation, the approval chain, and payslip derivation. Everything here
//! is pure or operates on values passed in; persistence and concurrency
//! control live in [`crate::store`].

pub mod aggregation;
pub mod approval;
pub mod gate;
pub mod payslips;
pub mod state_machine;

pub use aggregation::{compute_draft, DraftComputation};
pub use gate::{phase0_gate, phase1_satisfied, require_phase0, GateResult};
pub use payslips::{derive_payslips, SkippedEmployee};
pub use state_machine::{
    authorize, check_transition, rule_for, TransitionRule, TRANSITION_TABLE,
};
