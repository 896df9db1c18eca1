//! Payslip derivation.
//!
//! Payslips are derived, never authored: one per employee line of a locked
//! run. Derivation is pure; the store upserts the results keyed by
//! `(run_id, employee_id)` so re-running replaces rather than duplicates.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollEmployeeLine, PayrollRun, Payslip, RunAction};

/// One employee skipped during payslip generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEmployee {
    /// The employee that was skipped.
    pub employee_id: String,
    /// Why no payslip was written.
    pub reason: String,
}

/// Derives payslip records from a locked run's lines.
///
/// Lines flagged as exceptions (missing bank details) are skipped and
/// reported as warnings rather than failing the pass.
pub fn derive_payslips(
    run: &PayrollRun,
    lines: &[PayrollEmployeeLine],
) -> EngineResult<(Vec<Payslip>, Vec<SkippedEmployee>)> {
    if !run.is_locked() {
        return Err(EngineError::InvalidTransition {
            action: RunAction::GeneratePayslips,
            status: run.status,
        });
    }

    let generated_at = Utc::now();
    let mut payslips = Vec::with_capacity(lines.len());
    let mut skipped = Vec::new();

    for line in lines {
        if line.exception {
            skipped.push(SkippedEmployee {
                employee_id: line.employee_id.clone(),
                reason: line
                    .exception_reasons
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "flagged as exception".to_string()),
            });
            continue;
        }
        payslips.push(Payslip {
            id: Uuid::new_v4(),
            run_id: run.id,
            employee_id: line.employee_id.clone(),
            employee_name: line.employee_name.clone(),
            entity: run.period.entity.clone(),
            period_end: run.period.period_end,
            gross_pay: line.gross_pay,
            deductions: line.deductions,
            net_pay: line.net_pay,
            generated_at,
        });
    }

    Ok((payslips, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayPeriod, RunStatus, TransferStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn locked_run() -> PayrollRun {
        let mut run = PayrollRun::new(
            PayPeriod::new("entity_a", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
            "spec_001",
        );
        run.status = RunStatus::Locked;
        run
    }

    fn line(run_id: Uuid, employee_id: &str, exception: bool) -> PayrollEmployeeLine {
        PayrollEmployeeLine {
            run_id,
            employee_id: employee_id.to_string(),
            employee_name: format!("Employee {employee_id}"),
            base_salary: dec("5000.00"),
            allowances: dec("200.00"),
            deductions: dec("300.00"),
            gross_pay: dec("5200.00"),
            net_pay: dec("4900.00"),
            transfer_status: TransferStatus::NotTransferred,
            exception,
            exception_reasons: if exception {
                vec!["missing bank details".to_string()]
            } else {
                vec![]
            },
        }
    }

    #[test]
    fn test_derivation_requires_locked_run() {
        let mut run = locked_run();
        run.status = RunStatus::FinanceApproved;

        let err = derive_payslips(&run, &[]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                action: RunAction::GeneratePayslips,
                status: RunStatus::FinanceApproved,
            }
        ));
    }

    #[test]
    fn test_one_payslip_per_clean_line() {
        let run = locked_run();
        let lines = vec![line(run.id, "emp_001", false), line(run.id, "emp_002", false)];

        let (payslips, skipped) = derive_payslips(&run, &lines).unwrap();
        assert_eq!(payslips.len(), 2);
        assert!(skipped.is_empty());
        assert_eq!(payslips[0].run_id, run.id);
        assert_eq!(payslips[0].net_pay, dec("4900.00"));
        assert_eq!(payslips[0].entity, "entity_a");
    }

    #[test]
    fn test_exception_lines_are_skipped_with_reason() {
        let run = locked_run();
        let lines = vec![line(run.id, "emp_001", false), line(run.id, "emp_002", true)];

        let (payslips, skipped) = derive_payslips(&run, &lines).unwrap();
        assert_eq!(payslips.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].employee_id, "emp_002");
        assert_eq!(skipped[0].reason, "missing bank details");
    }

    #[test]
    fn test_empty_line_set_derives_nothing() {
        let run = locked_run();
        let (payslips, skipped) = derive_payslips(&run, &[]).unwrap();
        assert!(payslips.is_empty());
        assert!(skipped.is_empty());
    }
}
