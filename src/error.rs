//! Error types for the payroll execution lifecycle engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every rejection path in the engine. The business-rule kinds
//! (`InvalidTransition`, `AlreadyAdjudicated`, `GateNotSatisfied`,
//! `ConcurrentModification`, `ValidationError`) are surfaced verbatim to API
//! callers; infrastructure failures (`RosterUnavailable`, policy errors) map
//! to retryable 5xx responses instead.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{PreRunEventStatus, Role, RunAction, RunStatus};

/// The main error type for the payroll run engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_run_engine::error::EngineError;
/// use payroll_run_engine::models::{RunAction, RunStatus};
///
/// let error = EngineError::InvalidTransition {
///     action: RunAction::Lock,
///     status: RunStatus::DraftGenerated,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Action 'lock' is not allowed while the run is 'draft_generated'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested action is not legal from the run's current status.
    #[error("Action '{action}' is not allowed while the run is '{status}'")]
    InvalidTransition {
        /// The action that was requested.
        action: RunAction,
        /// The run status at the time of the request.
        status: RunStatus,
    },

    /// The caller's role set does not authorize the requested action.
    ///
    /// Surfaced to API callers under the `InvalidTransition` error kind,
    /// but kept as a distinct variant so the HTTP layer can answer 403
    /// rather than 409.
    #[error("Action '{action}' requires role '{required}'")]
    RoleNotAuthorized {
        /// The action that was requested.
        action: RunAction,
        /// The role the transition table requires.
        required: Role,
    },

    /// The caller's role set does not authorize pre-run event adjudication.
    ///
    /// Like [`EngineError::RoleNotAuthorized`], surfaced under the
    /// `InvalidTransition` kind with a 403 status.
    #[error("Adjudicating pre-run events requires one of the configured adjudicator roles")]
    EventRoleNotAuthorized,

    /// A pre-run event was already terminally adjudicated.
    #[error("Pre-run event {event_id} is already '{status}' and cannot be changed")]
    AlreadyAdjudicated {
        /// The event that was targeted.
        event_id: Uuid,
        /// Its terminal status.
        status: PreRunEventStatus,
    },

    /// A phase gate precondition is unmet.
    #[error("Gate not satisfied: {condition}")]
    GateNotSatisfied {
        /// The specific unmet condition, named for the caller.
        condition: String,
    },

    /// An optimistic-lock conflict on the run's version.
    #[error("Run {run_id} was modified concurrently (expected version {expected}, found {found})")]
    ConcurrentModification {
        /// The run that was targeted.
        run_id: Uuid,
        /// The version the caller expected.
        expected: u64,
        /// The version actually stored.
        found: u64,
    },

    /// Malformed or otherwise invalid input.
    #[error("Validation error: {message}")]
    ValidationError {
        /// A description of what was invalid.
        message: String,
    },

    /// A payroll run was not found.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The id that was requested.
        run_id: Uuid,
    },

    /// A pre-run event was not found.
    #[error("Pre-run event not found: {event_id}")]
    EventNotFound {
        /// The id that was requested.
        event_id: Uuid,
    },

    /// The roster for an entity could not be fetched.
    ///
    /// Infrastructure-class failure: the caller should retry with backoff.
    /// The run's state is never changed by a failed aggregation.
    #[error("Roster unavailable for entity '{entity}': {message}")]
    RosterUnavailable {
        /// The entity whose roster was requested.
        entity: String,
        /// A description of the fetch failure.
        message: String,
    },

    /// Policy configuration file was not found at the specified path.
    #[error("Policy file not found: {path}")]
    PolicyNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Policy configuration file could not be parsed.
    #[error("Failed to parse policy file '{path}': {message}")]
    PolicyParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
