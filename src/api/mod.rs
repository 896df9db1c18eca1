//! HTTP API module for the payroll run engine.
//!
//! This module provides the REST endpoints driving the run lifecycle and
//! the pre-run event register.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, GateCheckResponse, PayslipGenerationResponse};
pub use request::{
    CreateEventRequest, CreateRunRequest, EditEventRequest, RejectPeriodRequest,
    TransitionRequest, UnfreezeRequest,
};
pub use response::ApiError;
pub use state::AppState;
