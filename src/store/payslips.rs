//! Payslip storage.
//!
//! Payslips are keyed by `(run_id, employee_id)`: upserting a batch after
//! an unfreeze/re-lock cycle replaces the affected records and can never
//! create duplicates.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::Payslip;

/// In-process payslip storage.
#[derive(Debug, Default)]
pub struct PayslipStore {
    inner: RwLock<HashMap<(Uuid, String), Payslip>>,
}

impl PayslipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a batch of payslips; returns the number written.
    pub fn upsert_batch(&self, payslips: Vec<Payslip>) -> u32 {
        let mut inner = self.write();
        let written = payslips.len() as u32;
        for payslip in payslips {
            inner.insert((payslip.run_id, payslip.employee_id.clone()), payslip);
        }
        written
    }

    /// Returns all payslips for a run, ordered by employee id.
    pub fn for_run(&self, run_id: Uuid) -> Vec<Payslip> {
        let inner = self.read();
        let mut payslips: Vec<Payslip> = inner
            .values()
            .filter(|payslip| payslip.run_id == run_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        payslips
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<(Uuid, String), Payslip>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<(Uuid, String), Payslip>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn payslip(run_id: Uuid, employee_id: &str, net: i64) -> Payslip {
        Payslip {
            id: Uuid::new_v4(),
            run_id,
            employee_id: employee_id.to_string(),
            employee_name: format!("Employee {employee_id}"),
            entity: "entity_a".to_string(),
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            gross_pay: Decimal::new(net + 10000, 2),
            deductions: Decimal::new(10000, 2),
            net_pay: Decimal::new(net, 2),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_then_fetch_ordered() {
        let store = PayslipStore::new();
        let run_id = Uuid::new_v4();
        store.upsert_batch(vec![
            payslip(run_id, "emp_002", 400000),
            payslip(run_id, "emp_001", 500000),
        ]);

        let fetched = store.for_run(run_id);
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].employee_id, "emp_001");
        assert_eq!(fetched[1].employee_id, "emp_002");
    }

    #[test]
    fn test_reupsert_replaces_never_duplicates() {
        let store = PayslipStore::new();
        let run_id = Uuid::new_v4();
        store.upsert_batch(vec![payslip(run_id, "emp_001", 500000)]);
        store.upsert_batch(vec![payslip(run_id, "emp_001", 475000)]);

        let fetched = store.for_run(run_id);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].net_pay, Decimal::new(475000, 2));
    }

    #[test]
    fn test_runs_are_isolated() {
        let store = PayslipStore::new();
        let run_a = Uuid::new_v4();
        let run_b = Uuid::new_v4();
        store.upsert_batch(vec![payslip(run_a, "emp_001", 500000)]);

        assert_eq!(store.for_run(run_a).len(), 1);
        assert!(store.for_run(run_b).is_empty());
    }
}
