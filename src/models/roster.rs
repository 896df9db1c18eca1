//! Roster models: the employees a draft aggregates over.
//!
//! Organizational data is owned by an external system; the engine consumes a
//! point-in-time roster snapshot per entity when it regenerates a draft.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payroll period: one legal/organizational entity plus the period's
/// end-of-period date.
///
/// Exactly one open run may exist per period at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The legal or organizational entity the run pays.
    pub entity: String,
    /// The end-of-period date identifying the period.
    pub period_end: NaiveDate,
}

impl PayPeriod {
    /// Creates a new pay period.
    pub fn new(entity: impl Into<String>, period_end: NaiveDate) -> Self {
        Self {
            entity: entity.into(),
            period_end,
        }
    }
}

/// Bank routing details required to transfer a net pay amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    /// The routing/branch code of the receiving bank.
    pub routing_number: String,
    /// The account number to transfer into.
    pub account_number: String,
}

/// One employee in an entity's roster snapshot.
///
/// Salary components are recurring per-period amounts; ad-hoc compensation
/// arrives through approved pre-run events instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEmployee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name, carried onto lines and payslips.
    pub name: String,
    /// Base salary for the period.
    pub base_salary: Decimal,
    /// Recurring allowances for the period.
    pub allowances: Decimal,
    /// Recurring deductions for the period.
    pub deductions: Decimal,
    /// Bank details; missing details flag the employee's line as an
    /// exception and skip payslip generation for them.
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_pay_period_equality_and_hash_key() {
        let a = PayPeriod::new("entity_a", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        let b = PayPeriod::new("entity_a", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        let c = PayPeriod::new("entity_b", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deserialize_roster_employee_with_decimal_strings() {
        let json = r#"{
            "id": "emp_001",
            "name": "A. Nguyen",
            "base_salary": "5200.00",
            "allowances": "300.50",
            "deductions": "410.25",
            "bank_details": {
                "routing_number": "083-004",
                "account_number": "12345678"
            }
        }"#;

        let employee: RosterEmployee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.base_salary, Decimal::from_str("5200.00").unwrap());
        assert_eq!(employee.allowances, Decimal::from_str("300.50").unwrap());
        assert!(employee.bank_details.is_some());
    }

    #[test]
    fn test_bank_details_default_to_none() {
        let json = r#"{
            "id": "emp_002",
            "name": "B. Okafor",
            "base_salary": "4100",
            "allowances": "0",
            "deductions": "120"
        }"#;

        let employee: RosterEmployee = serde_json::from_str(json).unwrap();
        assert!(employee.bank_details.is_none());
    }

    #[test]
    fn test_roster_employee_round_trip() {
        let employee = RosterEmployee {
            id: "emp_003".to_string(),
            name: "C. Haddad".to_string(),
            base_salary: Decimal::new(480000, 2),
            allowances: Decimal::ZERO,
            deductions: Decimal::new(9950, 2),
            bank_details: None,
        };
        let json = serde_json::to_string(&employee).unwrap();
        let back: RosterEmployee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, back);
    }
}
