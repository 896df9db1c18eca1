//! In-process storage for runs, pre-run events, and payslips.
//!
//! The engine is invoked as request/response operations from stateless
//! callers; these stores provide the atomic read-check-write each
//! transition and adjudication needs to defend against concurrent callers.

mod events;
mod payslips;
mod runs;

pub use events::EventStore;
pub use payslips::PayslipStore;
pub use runs::{RunStore, TransitionEffect};
