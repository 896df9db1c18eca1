//! Payroll Execution Lifecycle Engine
//!
//! This crate implements the workflow taking a payroll period from pre-run
//! adjustment approval through draft simulation, manager and finance
//! sign-off, locking, and payslip generation. A single role-gated
//! transition table governs the run lifecycle; phase gates are recomputed
//! on every check; draft aggregation is deterministic decimal arithmetic
//! over a roster snapshot and the approved pre-run events in scope.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod roster;
pub mod store;
