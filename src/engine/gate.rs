//! Phase gate validation.
//!
//! Gates are recomputed from current data on every check, never cached, so
//! a late-arriving pending event reopens Phase 0 even after an earlier check
//! passed. The result names the unmet condition for the caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PreRunEvent, PreRunEventStatus, RunStatus};

/// The outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    /// True when the gate allows the downstream phase to proceed.
    pub satisfied: bool,
    /// Events still pending adjudication.
    pub pending_count: u32,
    /// Events terminally approved.
    pub approved_count: u32,
    /// Events terminally rejected.
    pub rejected_count: u32,
    /// Ids of the pending events blocking the gate, empty when satisfied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_event_ids: Vec<Uuid>,
}

/// Checks the Phase 0 gate over the events in a run's (entity, period)
/// scope: satisfied iff none of them is pending.
pub fn phase0_gate(events: &[PreRunEvent]) -> GateResult {
    let mut result = GateResult {
        satisfied: true,
        pending_count: 0,
        approved_count: 0,
        rejected_count: 0,
        pending_event_ids: Vec::new(),
    };
    for event in events {
        match event.status {
            PreRunEventStatus::Pending => {
                result.pending_count += 1;
                result.pending_event_ids.push(event.id);
            }
            PreRunEventStatus::Approved => result.approved_count += 1,
            PreRunEventStatus::Rejected => result.rejected_count += 1,
        }
    }
    result.satisfied = result.pending_count == 0;
    result
}

/// Converts an unsatisfied Phase 0 result into the engine error naming the
/// blocking condition.
pub fn require_phase0(result: &GateResult) -> EngineResult<()> {
    if result.satisfied {
        Ok(())
    } else {
        Err(EngineError::GateNotSatisfied {
            condition: format!(
                "{} pre-run event(s) still pending adjudication",
                result.pending_count
            ),
        })
    }
}

/// The Phase 1 gate: the declared period must be approved (the run has
/// reached `PeriodApproved` or any later status).
pub fn phase1_satisfied(status: RunStatus) -> bool {
    !matches!(status, RunStatus::Created | RunStatus::Phase0Validated)
}
