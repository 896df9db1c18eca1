//! Payslip model: a derived per-employee record of a locked run.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payslip derived from one employee line of a locked run.
///
/// Keyed by `(run_id, employee_id)`: regenerating for the same pair replaces
/// the record rather than duplicating it. Never independently authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier of this payslip record.
    pub id: Uuid,
    /// The run the payslip derives from.
    pub run_id: Uuid,
    /// The employee the payslip is for.
    pub employee_id: String,
    /// Display name snapshot.
    pub employee_name: String,
    /// The entity that pays.
    pub entity: String,
    /// The end-of-period date of the period paid.
    pub period_end: NaiveDate,
    /// Gross pay carried from the line.
    pub gross_pay: Decimal,
    /// Deductions carried from the line.
    pub deductions: Decimal,
    /// Net pay carried from the line.
    pub net_pay: Decimal,
    /// When this payslip record was (re)generated.
    pub generated_at: DateTime<Utc>,
}
