//! The payroll run state machine.
//!
//! One static transition table declares, for every [`RunAction`], the legal
//! source statuses, the resulting status, and the role authorized to request
//! it. Every transition handler consults this table; no other code decides
//! legality or authorization, so there is a single source of truth instead
//! of per-endpoint checks.

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::{Role, RunAction, RunStatus};

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    /// The action this rule governs.
    pub action: RunAction,
    /// Statuses the action is legal from.
    pub from: &'static [RunStatus],
    /// The status the run moves to on success.
    pub to: RunStatus,
    /// The role required to request the action.
    pub required_role: Role,
}

/// The full transition table.
///
/// `GenerateDraft` is repeatable from both `Initiated` and `DraftGenerated`;
/// `GeneratePayslips` leaves the run `Locked`; `RejectPeriod` resets an
/// approved period back to `Created`; `Unfreeze` reopens a locked run to
/// `DraftGenerated`.
pub const TRANSITION_TABLE: &[TransitionRule] = &[
    TransitionRule {
        // Creation has no source status; the row carries its role
        // requirement and the one-open-run check lives in the store.
        action: RunAction::CreateRun,
        from: &[],
        to: RunStatus::Created,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::ValidatePhase0,
        from: &[RunStatus::Created],
        to: RunStatus::Phase0Validated,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::ApprovePeriod,
        from: &[RunStatus::Phase0Validated],
        to: RunStatus::PeriodApproved,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::RejectPeriod,
        from: &[RunStatus::PeriodApproved],
        to: RunStatus::Created,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::StartInitiation,
        from: &[RunStatus::PeriodApproved],
        to: RunStatus::Initiated,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::GenerateDraft,
        from: &[RunStatus::Initiated, RunStatus::DraftGenerated],
        to: RunStatus::DraftGenerated,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::SendForApproval,
        from: &[RunStatus::DraftGenerated],
        to: RunStatus::PendingManagerReview,
        required_role: Role::PayrollSpecialist,
    },
    TransitionRule {
        action: RunAction::ManagerApprove,
        from: &[RunStatus::PendingManagerReview],
        to: RunStatus::ManagerApproved,
        required_role: Role::PayrollManager,
    },
    TransitionRule {
        action: RunAction::FinanceApprove,
        from: &[RunStatus::ManagerApproved],
        to: RunStatus::FinanceApproved,
        required_role: Role::FinanceStaff,
    },
    TransitionRule {
        action: RunAction::Lock,
        from: &[RunStatus::FinanceApproved],
        to: RunStatus::Locked,
        required_role: Role::PayrollManager,
    },
    TransitionRule {
        action: RunAction::Unfreeze,
        from: &[RunStatus::Locked],
        to: RunStatus::DraftGenerated,
        required_role: Role::PayrollManager,
    },
    TransitionRule {
        action: RunAction::GeneratePayslips,
        from: &[RunStatus::Locked],
        to: RunStatus::Locked,
        required_role: Role::PayrollSpecialist,
    },
];

/// Looks up the table row for an action.
pub fn rule_for(action: RunAction) -> &'static TransitionRule {
    // Every RunAction has exactly one row.
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.action == action)
        .unwrap_or_else(|| unreachable!("transition table covers every action"))
}

/// Checks that the caller's role set authorizes the action.
///
/// Fails closed: an empty role set is denied everything.
pub fn authorize(action: RunAction, roles: &HashSet<Role>) -> EngineResult<()> {
    let rule = rule_for(action);
    if roles.contains(&rule.required_role) {
        Ok(())
    } else {
        Err(EngineError::RoleNotAuthorized {
            action,
            required: rule.required_role,
        })
    }
}

/// Checks that the action is legal from the given status and returns the
/// target status.
pub fn check_transition(action: RunAction, status: RunStatus) -> EngineResult<RunStatus> {
    let rule = rule_for(action);
    if rule.from.contains(&status) {
        Ok(rule.to)
    } else {
        Err(EngineError::InvalidTransition { action, status })
    }
}
