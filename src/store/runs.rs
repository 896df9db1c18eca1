//! Payroll run storage with serializable transitions.
//!
//! Every transition is a read-check-write executed under one write guard:
//! role authorization, optional version CAS, state-machine legality, the
//! action's own mutation, then commit. A failed step leaves the stored run
//! byte-identical to before the call. Line sets are replaced whole, never
//! patched, so readers can never observe a partially regenerated draft.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::engine::state_machine;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PayrollEmployeeLine, PayrollRun, Role, RunAction};

#[derive(Debug, Default)]
struct RunStoreInner {
    runs: HashMap<Uuid, PayrollRun>,
    lines: HashMap<Uuid, Vec<PayrollEmployeeLine>>,
    by_period: HashMap<PayPeriod, Uuid>,
}

/// In-process run storage.
#[derive(Debug, Default)]
pub struct RunStore {
    inner: RwLock<RunStoreInner>,
}

/// What a transition's mutation asks the store to commit alongside the
/// status change.
pub enum TransitionEffect {
    /// No data beyond the status change.
    None,
    /// Replace the run's full line set (draft regeneration).
    ReplaceLines(Vec<PayrollEmployeeLine>),
}

impl RunStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a run, enforcing the one-run-per-(entity, period) invariant.
    ///
    /// Any existing run for the pair conflicts, locked or not: a locked run
    /// is the payroll of record for its period.
    pub fn create(&self, period: PayPeriod, created_by: &str) -> EngineResult<PayrollRun> {
        let mut inner = self.write();
        if let Some(existing) = inner.by_period.get(&period) {
            return Err(EngineError::ValidationError {
                message: format!(
                    "a run ({existing}) already exists for entity '{}' period {}",
                    period.entity, period.period_end
                ),
            });
        }
        let run = PayrollRun::new(period.clone(), created_by);
        inner.by_period.insert(period, run.id);
        inner.lines.insert(run.id, Vec::new());
        inner.runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Fetches a run by id.
    pub fn get(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let inner = self.read();
        inner
            .runs
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// Fetches a run's current line set.
    pub fn lines(&self, run_id: Uuid) -> EngineResult<Vec<PayrollEmployeeLine>> {
        let inner = self.read();
        if !inner.runs.contains_key(&run_id) {
            return Err(EngineError::RunNotFound { run_id });
        }
        Ok(inner.lines.get(&run_id).cloned().unwrap_or_default())
    }

    /// Executes one transition atomically.
    ///
    /// Order of checks: role authorization, version CAS (when the caller
    /// supplied `expected_version`), state-machine legality, then the
    /// action's `mutate` closure on a working copy. Only a fully successful
    /// sequence commits; any error leaves the stored run and lines
    /// untouched.
    pub fn transition<F>(
        &self,
        run_id: Uuid,
        action: RunAction,
        roles: &HashSet<Role>,
        expected_version: Option<u64>,
        mutate: F,
    ) -> EngineResult<PayrollRun>
    where
        F: FnOnce(&mut PayrollRun) -> EngineResult<TransitionEffect>,
    {
        let mut inner = self.write();
        let current = inner
            .runs
            .get(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;

        state_machine::authorize(action, roles)?;
        if let Some(expected) = expected_version {
            if current.version != expected {
                return Err(EngineError::ConcurrentModification {
                    run_id,
                    expected,
                    found: current.version,
                });
            }
        }
        let target = state_machine::check_transition(action, current.status)?;

        // Work on a copy so a failing mutation cannot half-apply.
        let mut working = current.clone();
        let effect = mutate(&mut working)?;

        if working.period != current.period {
            if inner.by_period.contains_key(&working.period) {
                return Err(EngineError::ValidationError {
                    message: format!(
                        "a run already exists for entity '{}' period {}",
                        working.period.entity, working.period.period_end
                    ),
                });
            }
            let old_period = current.period.clone();
            inner.by_period.remove(&old_period);
            inner.by_period.insert(working.period.clone(), run_id);
        }

        working.status = target;
        working.version += 1;
        working.updated_at = Utc::now();

        if let TransitionEffect::ReplaceLines(lines) = effect {
            inner.lines.insert(run_id, lines);
        }
        inner.runs.insert(run_id, working.clone());
        Ok(working)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RunStoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RunStoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
