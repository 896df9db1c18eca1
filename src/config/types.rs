//! Policy configuration types.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Tunable policy for the engine, loaded from YAML or built with
/// [`EnginePolicy::default`].
///
/// The transition table itself is not configurable; policy covers only the
/// knobs left to the deploying organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Roles allowed to approve or reject pre-run events.
    #[serde(default = "default_event_adjudicator_roles")]
    pub event_adjudicator_roles: Vec<Role>,
    /// Minimum length of an unfreeze reason after trimming.
    #[serde(default = "default_min_unfreeze_reason_len")]
    pub min_unfreeze_reason_len: usize,
}

fn default_event_adjudicator_roles() -> Vec<Role> {
    vec![Role::PayrollSpecialist, Role::PayrollManager]
}

fn default_min_unfreeze_reason_len() -> usize {
    1
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            event_adjudicator_roles: default_event_adjudicator_roles(),
            min_unfreeze_reason_len: default_min_unfreeze_reason_len(),
        }
    }
}

impl EnginePolicy {
    /// Returns true if any of the caller's roles may adjudicate pre-run
    /// events. Fails closed on an empty caller role set.
    pub fn may_adjudicate_events(&self, roles: &std::collections::HashSet<Role>) -> bool {
        self.event_adjudicator_roles
            .iter()
            .any(|role| roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_adjudicators_are_specialist_and_manager() {
        let policy = EnginePolicy::default();
        assert_eq!(
            policy.event_adjudicator_roles,
            vec![Role::PayrollSpecialist, Role::PayrollManager]
        );
        assert_eq!(policy.min_unfreeze_reason_len, 1);
    }

    #[test]
    fn test_may_adjudicate_fails_closed_on_empty_role_set() {
        let policy = EnginePolicy::default();
        assert!(!policy.may_adjudicate_events(&HashSet::new()));
    }

    #[test]
    fn test_may_adjudicate_matches_any_held_role() {
        let policy = EnginePolicy::default();
        let roles: HashSet<Role> = [Role::PayrollManager].into_iter().collect();
        assert!(policy.may_adjudicate_events(&roles));

        let finance: HashSet<Role> = [Role::FinanceStaff].into_iter().collect();
        assert!(!policy.may_adjudicate_events(&finance));
    }

    #[test]
    fn test_yaml_defaults_apply_to_missing_fields() {
        let policy: EnginePolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, EnginePolicy::default());
    }

    #[test]
    fn test_yaml_overrides_adjudicator_roles() {
        let yaml = "event_adjudicator_roles:\n  - payroll_manager\n";
        let policy: EnginePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.event_adjudicator_roles, vec![Role::PayrollManager]);
    }
}
