//! Core data models for the payroll execution lifecycle engine.
//!
//! This module contains all the domain models used throughout the engine.

mod event;
mod line;
mod payslip;
mod role;
mod roster;
mod run;

pub use event::{PreRunEvent, PreRunEventKind, PreRunEventStatus};
pub use line::{PayrollEmployeeLine, TransferStatus};
pub use payslip::Payslip;
pub use role::{Role, RoleDirectory};
pub use roster::{BankDetails, PayPeriod, RosterEmployee};
pub use run::{
    ApprovalRecord, ApprovalStage, PayrollRun, RunAction, RunStatus, RunTotals, UnfreezeRecord,
};
