//! Approval chain coordination.
//!
//! The sequencing itself (specialist send → manager → finance → lock) is
//! enforced by the transition table; this module owns the audit side: each
//! grant records who approved and when, and unfreezing clears the manager
//! and finance records so a stale sign-off can never cover post-unfreeze
//! edits. Approvals are never retracted through any other path.

use chrono::Utc;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalRecord, ApprovalStage, PayrollRun, UnfreezeRecord};

/// Records an approval grant on the run.
///
/// A duplicate grant for a stage already in force is rejected; the
/// transition table makes this unreachable through the API, but the record
/// set defends itself anyway.
pub fn grant(run: &mut PayrollRun, stage: ApprovalStage, actor: impl Into<String>) -> EngineResult<()> {
    if run.approval(stage).is_some() {
        return Err(EngineError::ValidationError {
            message: format!("{stage:?} approval already granted for run {}", run.id),
        });
    }
    run.approvals.push(ApprovalRecord {
        stage,
        actor: actor.into(),
        approved_at: Utc::now(),
    });
    Ok(())
}

/// Applies the unfreeze exception path: validates the mandatory reason,
/// appends the audit record, and clears the manager and finance approvals
/// so the chain must be walked again before re-locking.
pub fn unfreeze(run: &mut PayrollRun, actor: impl Into<String>, reason: &str) -> EngineResult<()> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::ValidationError {
            message: "unfreeze requires a non-empty reason".to_string(),
        });
    }
    run.approvals.clear();
    run.unfreezes.push(UnfreezeRecord {
        actor: actor.into(),
        reason: reason.to_string(),
        unfrozen_at: Utc::now(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayPeriod;
    use chrono::NaiveDate;

    fn test_run() -> PayrollRun {
        PayrollRun::new(
            PayPeriod::new("entity_a", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
            "spec_001",
        )
    }

    #[test]
    fn test_grant_records_actor_and_stage() {
        let mut run = test_run();
        grant(&mut run, ApprovalStage::Manager, "mgr_001").unwrap();

        let record = run.approval(ApprovalStage::Manager).unwrap();
        assert_eq!(record.actor, "mgr_001");
        assert!(run.approval(ApprovalStage::Finance).is_none());
    }

    #[test]
    fn test_duplicate_grant_is_rejected() {
        let mut run = test_run();
        grant(&mut run, ApprovalStage::Finance, "fin_001").unwrap();
        let err = grant(&mut run, ApprovalStage::Finance, "fin_002").unwrap_err();
        assert!(matches!(err, EngineError::ValidationError { .. }));
        assert_eq!(run.approvals.len(), 1);
    }

    #[test]
    fn test_unfreeze_clears_approvals_and_records_reason() {
        let mut run = test_run();
        grant(&mut run, ApprovalStage::Manager, "mgr_001").unwrap();
        grant(&mut run, ApprovalStage::Finance, "fin_001").unwrap();

        unfreeze(&mut run, "mgr_001", "correction").unwrap();

        assert!(run.approvals.is_empty());
        assert_eq!(run.unfreezes.len(), 1);
        assert_eq!(run.unfreezes[0].reason, "correction");
        assert_eq!(run.unfreezes[0].actor, "mgr_001");
    }

    #[test]
    fn test_unfreeze_without_reason_is_rejected() {
        let mut run = test_run();
        grant(&mut run, ApprovalStage::Manager, "mgr_001").unwrap();

        let err = unfreeze(&mut run, "mgr_001", "   ").unwrap_err();
        assert!(matches!(err, EngineError::ValidationError { .. }));
        // A rejected unfreeze leaves approvals untouched.
        assert_eq!(run.approvals.len(), 1);
        assert!(run.unfreezes.is_empty());
    }

    #[test]
    fn test_repeated_unfreezes_accumulate_audit_trail() {
        let mut run = test_run();
        unfreeze(&mut run, "mgr_001", "first correction").unwrap();
        unfreeze(&mut run, "mgr_002", "second correction").unwrap();
        assert_eq!(run.unfreezes.len(), 2);
    }
}
