//! Roster access seam.
//!
//! Organizational data lives in an external system; the engine reads it
//! through [`RosterProvider`]. A fetch failure is an infrastructure error
//! (`RosterUnavailable`) the caller retries with backoff — it never changes
//! run state. [`InMemoryRoster`] is the embedded implementation used by the
//! tests and by hosts that push roster snapshots in.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::RosterEmployee;

/// Read access to an entity's current employee roster.
pub trait RosterProvider: Send + Sync {
    /// Returns the roster snapshot for an entity.
    ///
    /// An unknown entity yields an empty roster (an empty run is valid);
    /// only a transport/storage failure is an error.
    fn roster(&self, entity: &str) -> EngineResult<Vec<RosterEmployee>>;
}

/// An in-process roster keyed by entity.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    rosters: RwLock<HashMap<String, Vec<RosterEmployee>>>,
}

impl InMemoryRoster {
    /// Creates an empty roster store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee to an entity's roster.
    pub fn add_employee(&self, entity: impl Into<String>, employee: RosterEmployee) {
        let mut rosters = self.rosters.write().unwrap_or_else(|e| e.into_inner());
        rosters.entry(entity.into()).or_default().push(employee);
    }

    /// Removes an employee from an entity's roster; a later draft
    /// regeneration drops their line.
    pub fn remove_employee(&self, entity: &str, employee_id: &str) {
        let mut rosters = self.rosters.write().unwrap_or_else(|e| e.into_inner());
        if let Some(roster) = rosters.get_mut(entity) {
            roster.retain(|employee| employee.id != employee_id);
        }
    }
}

impl RosterProvider for InMemoryRoster {
    fn roster(&self, entity: &str) -> EngineResult<Vec<RosterEmployee>> {
        let rosters = self.rosters.read().unwrap_or_else(|e| e.into_inner());
        Ok(rosters.get(entity).cloned().unwrap_or_default())
    }
}

/// A provider that always fails, for exercising the infrastructure error
/// path in tests.
#[derive(Debug, Default)]
pub struct UnavailableRoster;

impl RosterProvider for UnavailableRoster {
    fn roster(&self, entity: &str) -> EngineResult<Vec<RosterEmployee>> {
        Err(EngineError::RosterUnavailable {
            entity: entity.to_string(),
            message: "roster backend unreachable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn employee(id: &str) -> RosterEmployee {
        RosterEmployee {
            id: id.to_string(),
            name: format!("Employee {id}"),
            base_salary: Decimal::new(500000, 2),
            allowances: Decimal::ZERO,
            deductions: Decimal::ZERO,
            bank_details: None,
        }
    }

    #[test]
    fn test_unknown_entity_yields_empty_roster() {
        let roster = InMemoryRoster::new();
        assert!(roster.roster("nowhere").unwrap().is_empty());
    }

    #[test]
    fn test_add_and_remove_employee() {
        let roster = InMemoryRoster::new();
        roster.add_employee("entity_a", employee("emp_001"));
        roster.add_employee("entity_a", employee("emp_002"));
        assert_eq!(roster.roster("entity_a").unwrap().len(), 2);

        roster.remove_employee("entity_a", "emp_001");
        let remaining = roster.roster("entity_a").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "emp_002");
    }

    #[test]
    fn test_entities_are_isolated() {
        let roster = InMemoryRoster::new();
        roster.add_employee("entity_a", employee("emp_001"));
        assert!(roster.roster("entity_b").unwrap().is_empty());
    }

    #[test]
    fn test_unavailable_roster_reports_infrastructure_error() {
        let err = UnavailableRoster.roster("entity_a").unwrap_err();
        assert!(matches!(err, EngineError::RosterUnavailable { .. }));
    }
}
