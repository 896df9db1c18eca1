//! Payroll run aggregate root: status, actions, approvals, and totals.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Lifecycle status of a payroll run.
///
/// The full set of legal transitions between these states lives in the
/// transition table in [`crate::engine::state_machine`]; nothing else may
/// move a run between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Freshly created; pre-run events may still be pending.
    Created,
    /// Every pre-run event in scope is terminally adjudicated.
    Phase0Validated,
    /// The declared period is approved.
    PeriodApproved,
    /// Processing has been started for the approved period.
    Initiated,
    /// A draft of lines and totals exists; regenerable.
    DraftGenerated,
    /// Sent to the payroll manager for review.
    PendingManagerReview,
    /// Manager sign-off granted.
    ManagerApproved,
    /// Finance sign-off granted.
    FinanceApproved,
    /// Financially final; immutable except via unfreeze.
    Locked,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Created => "created",
            RunStatus::Phase0Validated => "phase0_validated",
            RunStatus::PeriodApproved => "period_approved",
            RunStatus::Initiated => "initiated",
            RunStatus::DraftGenerated => "draft_generated",
            RunStatus::PendingManagerReview => "pending_manager_review",
            RunStatus::ManagerApproved => "manager_approved",
            RunStatus::FinanceApproved => "finance_approved",
            RunStatus::Locked => "locked",
        };
        f.write_str(label)
    }
}

/// The actions a caller can request against a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAction {
    /// Create a run for an entity and period.
    CreateRun,
    /// Close Phase 0 once every pre-run event is adjudicated.
    ValidatePhase0,
    /// Approve the declared period.
    ApprovePeriod,
    /// Change the period and reset its approval.
    RejectPeriod,
    /// Start processing for the approved period.
    StartInitiation,
    /// (Re)compute employee lines and totals.
    GenerateDraft,
    /// Hand the draft to the manager review queue.
    SendForApproval,
    /// Manager sign-off.
    ManagerApprove,
    /// Finance sign-off.
    FinanceApprove,
    /// Make the run financially final.
    Lock,
    /// Reopen a locked run for correction, with a mandatory reason.
    Unfreeze,
    /// Derive payslips from a locked run.
    GeneratePayslips,
}

impl fmt::Display for RunAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunAction::CreateRun => "create_run",
            RunAction::ValidatePhase0 => "validate_phase0",
            RunAction::ApprovePeriod => "approve_period",
            RunAction::RejectPeriod => "reject_period",
            RunAction::StartInitiation => "start_initiation",
            RunAction::GenerateDraft => "generate_draft",
            RunAction::SendForApproval => "send_for_approval",
            RunAction::ManagerApprove => "manager_approve",
            RunAction::FinanceApprove => "finance_approve",
            RunAction::Lock => "lock",
            RunAction::Unfreeze => "unfreeze",
            RunAction::GeneratePayslips => "generate_payslips",
        };
        f.write_str(label)
    }
}

/// The stage an approval record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStage {
    /// Manager review sign-off.
    Manager,
    /// Finance sign-off.
    Finance,
}

/// An audit record of one approval grant.
///
/// Approvals are never retracted; unfreezing clears the manager and finance
/// records so the chain must be walked again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Which stage granted.
    pub stage: ApprovalStage,
    /// The employee id of the approver.
    pub actor: String,
    /// When the approval was granted.
    pub approved_at: DateTime<Utc>,
}

/// An audit record of one unfreeze of a locked run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnfreezeRecord {
    /// The employee id of the manager who unfroze the run.
    pub actor: String,
    /// The mandatory reason supplied.
    pub reason: String,
    /// When the run was unfrozen.
    pub unfrozen_at: DateTime<Utc>,
}

/// Run-level totals, recomputed in full on every draft regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of employee lines in the draft.
    pub employee_count: u32,
    /// Number of lines flagged as exceptions (advisory, still totalled).
    pub exception_count: u32,
    /// Sum of all lines' net pay.
    pub total_net_pay: Decimal,
}

/// The payroll run aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The entity and period this run pays.
    pub period: PayPeriod,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// Optimistic-concurrency version; bumped on every successful write.
    pub version: u64,
    /// The employee id of the specialist who created the run.
    pub created_by: String,
    /// Totals from the latest draft, zeroed until a draft exists.
    pub totals: RunTotals,
    /// Approval grants currently in force.
    pub approvals: Vec<ApprovalRecord>,
    /// Audit trail of unfreezes.
    pub unfreezes: Vec<UnfreezeRecord>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// When the run last changed.
    pub updated_at: DateTime<Utc>,
}

impl PayrollRun {
    /// Creates a new run in `Created` at version 1.
    pub fn new(period: PayPeriod, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            period,
            status: RunStatus::Created,
            version: 1,
            created_by: created_by.into(),
            totals: RunTotals::default(),
            approvals: Vec::new(),
            unfreezes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true once the run is financially final.
    pub fn is_locked(&self) -> bool {
        self.status == RunStatus::Locked
    }

    /// Returns the approval record for a stage, if currently in force.
    pub fn approval(&self, stage: ApprovalStage) -> Option<&ApprovalRecord> {
        self.approvals.iter().find(|a| a.stage == stage)
    }
}
