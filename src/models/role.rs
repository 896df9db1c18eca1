//! Role model and role assignment lookups.
//!
//! Roles are owned by an external identity system; the engine only consumes
//! a mapping from employee id to a set of role labels. Every authorization
//! check fails closed: an employee with no known roles is denied everything.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The actor roles recognized by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Prepares runs, generates drafts, and triggers payslip generation.
    PayrollSpecialist,
    /// Reviews drafts, locks runs, and authorizes unfreeze.
    PayrollManager,
    /// Grants the final financial sign-off before lock.
    FinanceStaff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::PayrollSpecialist => "payroll_specialist",
            Role::PayrollManager => "payroll_manager",
            Role::FinanceStaff => "finance_staff",
        };
        f.write_str(label)
    }
}

/// A directory of role assignments, keyed by employee id.
///
/// Consumed, not owned: the hosting application populates this from its
/// identity system. Lookups for unknown employees return an empty set,
/// which every authorization check treats as a denial.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    assignments: HashMap<String, HashSet<Role>>,
}

impl RoleDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a role to an employee.
    pub fn assign(&mut self, employee_id: impl Into<String>, role: Role) {
        self.assignments
            .entry(employee_id.into())
            .or_default()
            .insert(role);
    }

    /// Returns the role set for an employee, empty if unknown.
    pub fn roles_of(&self, employee_id: &str) -> HashSet<Role> {
        self.assignments
            .get(employee_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if the employee holds the given role.
    pub fn has_role(&self, employee_id: &str, role: Role) -> bool {
        self.assignments
            .get(employee_id)
            .is_some_and(|set| set.contains(&role))
    }
}
