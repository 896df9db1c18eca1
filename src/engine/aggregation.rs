//! Draft aggregation.
//!
//! `compute_draft` is a pure function of its inputs: the run's identity, the
//! roster snapshot, and the approved pre-run events in scope. No state is
//! carried between invocations, so regenerating a draft from the same
//! snapshot is deterministic. An empty roster computes to zero totals; that
//! is a valid, reportable draft, not an error.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    PayPeriod, PayrollEmployeeLine, PreRunEvent, PreRunEventStatus, RosterEmployee, RunTotals,
    TransferStatus,
};

/// A fully computed draft: the complete line set plus run totals.
///
/// Callers swap the whole line set in atomically; lines are never patched
/// individually.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftComputation {
    /// One line per roster employee.
    pub lines: Vec<PayrollEmployeeLine>,
    /// Totals over those lines.
    pub totals: RunTotals,
}

/// Computes the draft for a run from a roster snapshot and the pre-run
/// events in the run's (entity, period) scope.
///
/// Only `approved` events matching the period contribute; their given
/// amounts fold into the employee's allowances. Per line:
/// `gross_pay = base_salary + allowances`, `net_pay = gross_pay -
/// deductions`. Lines missing bank details are flagged as exceptions but
/// still included in totals.
pub fn compute_draft(
    run_id: Uuid,
    period: &PayPeriod,
    roster: &[RosterEmployee],
    events: &[PreRunEvent],
) -> DraftComputation {
    let mut lines = Vec::with_capacity(roster.len());
    let mut total_net_pay = Decimal::ZERO;
    let mut exception_count = 0u32;

    for employee in roster {
        let event_total: Decimal = events
            .iter()
            .filter(|event| {
                event.status == PreRunEventStatus::Approved
                    && event.employee_id == employee.id
                    && event.entity == period.entity
                    && event.period_end == period.period_end
            })
            .map(|event| event.given_amount)
            .sum();

        let allowances = employee.allowances + event_total;
        let gross_pay = employee.base_salary + allowances;
        let net_pay = gross_pay - employee.deductions;

        let mut exception_reasons = Vec::new();
        if employee.bank_details.is_none() {
            exception_reasons.push("missing bank details".to_string());
        }
        let exception = !exception_reasons.is_empty();
        if exception {
            exception_count += 1;
        }

        total_net_pay += net_pay;
        lines.push(PayrollEmployeeLine {
            run_id,
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            base_salary: employee.base_salary,
            allowances,
            deductions: employee.deductions,
            gross_pay,
            net_pay,
            transfer_status: TransferStatus::NotTransferred,
            exception,
            exception_reasons,
        });
    }

    DraftComputation {
        totals: RunTotals {
            employee_count: lines.len() as u32,
            exception_count,
            total_net_pay,
        },
        lines,
    }
}
