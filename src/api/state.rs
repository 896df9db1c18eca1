//! Application state for the payroll run engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EnginePolicy;
use crate::models::RoleDirectory;
use crate::roster::RosterProvider;
use crate::store::{EventStore, PayslipStore, RunStore};

/// Shared application state.
///
/// Bundles the stores, the external-collaborator seams (roster and role
/// directory), and the engine policy.
#[derive(Clone)]
pub struct AppState {
    runs: Arc<RunStore>,
    events: Arc<EventStore>,
    payslips: Arc<PayslipStore>,
    roster: Arc<dyn RosterProvider>,
    roles: Arc<RoleDirectory>,
    policy: Arc<EnginePolicy>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        roster: Arc<dyn RosterProvider>,
        roles: RoleDirectory,
        policy: EnginePolicy,
    ) -> Self {
        Self {
            runs: Arc::new(RunStore::new()),
            events: Arc::new(EventStore::new()),
            payslips: Arc::new(PayslipStore::new()),
            roster,
            roles: Arc::new(roles),
            policy: Arc::new(policy),
        }
    }

    /// The run store.
    pub fn runs(&self) -> &RunStore {
        &self.runs
    }

    /// The pre-run event store.
    pub fn events(&self) -> &EventStore {
        &self.events
    }

    /// The payslip store.
    pub fn payslips(&self) -> &PayslipStore {
        &self.payslips
    }

    /// The roster provider.
    pub fn roster(&self) -> &dyn RosterProvider {
        self.roster.as_ref()
    }

    /// The role directory.
    pub fn roles(&self) -> &RoleDirectory {
        &self.roles
    }

    /// The engine policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }
}
