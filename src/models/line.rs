//! Per-employee payroll line model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bank transfer status of one line's net pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Not yet handed to a banking rail.
    #[default]
    NotTransferred,
    /// Handed to a banking rail by an external integration.
    Transferred,
}

/// One employee's computed pay within a run.
///
/// Lines are never hand-edited: every draft regeneration rebuilds the full
/// line set from the roster and approved pre-run events, so
/// `net_pay == gross_pay - deductions` holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollEmployeeLine {
    /// The run this line belongs to.
    pub run_id: Uuid,
    /// The employee this line pays.
    pub employee_id: String,
    /// Display name snapshot at computation time.
    pub employee_name: String,
    /// Base salary for the period.
    pub base_salary: Decimal,
    /// Recurring allowances plus approved pre-run event amounts.
    pub allowances: Decimal,
    /// Deductions for the period.
    pub deductions: Decimal,
    /// `base_salary + allowances`.
    pub gross_pay: Decimal,
    /// `gross_pay - deductions`.
    pub net_pay: Decimal,
    /// Bank transfer status.
    pub transfer_status: TransferStatus,
    /// True when the line cannot be transferred as-is (e.g. missing bank
    /// details). Exceptions are advisory: the line still counts in totals.
    pub exception: bool,
    /// Human-readable reasons for the exception flag.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exception_reasons: Vec<String>,
}
