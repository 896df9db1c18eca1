//! Request types for the payroll run engine API.
//!
//! All monetary fields deserialize through `rust_decimal` so amounts arrive
//! decimal-safe, never as floats. Transition bodies carry an optional
//! `expected_version` for optimistic concurrency; a caller that omits it
//! still gets an atomic transition, just without the CAS guard.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PreRunEventKind;

/// Request body for `POST /payroll-runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// The legal or organizational entity the run pays.
    pub entity: String,
    /// The end-of-period date identifying the period.
    pub period_end: NaiveDate,
}

/// Request body for `POST /pre-run-events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    /// The kind of compensation recorded.
    pub kind: PreRunEventKind,
    /// The employee the amount is payable to.
    pub employee_id: String,
    /// The entity whose run will pay this event.
    pub entity: String,
    /// The end-of-period date of the period this event falls in.
    pub period_end: NaiveDate,
    /// The declared amount.
    pub amount: Decimal,
}

/// Request body for `POST /pre-run-events/{id}/edit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditEventRequest {
    /// The new given amount; only pending events are editable.
    pub given_amount: Decimal,
}

/// Optional body shared by the plain transition endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Version the caller last read; mismatch fails with
    /// `ConcurrentModification`.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Request body for `POST /payroll-runs/{id}/reject-period`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectPeriodRequest {
    /// The corrected end-of-period date, if the period itself changes.
    #[serde(default)]
    pub new_period_end: Option<NaiveDate>,
    /// Optimistic-concurrency guard.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Request body for `POST /payroll-runs/{id}/unfreeze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfreezeRequest {
    /// The mandatory audit reason.
    pub reason: String,
    /// Optimistic-concurrency guard.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Query string for `GET /payslips`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayslipQuery {
    /// The run whose payslips to list.
    pub run_id: uuid::Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_create_event_request_parses_decimal_string() {
        let json = r#"{
            "kind": "signing_bonus",
            "employee_id": "emp_001",
            "entity": "entity_a",
            "period_end": "2025-03-31",
            "amount": "1500.00"
        }"#;
        let request: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind, PreRunEventKind::SigningBonus);
        assert_eq!(request.amount, Decimal::from_str("1500.00").unwrap());
    }

    #[test]
    fn test_transition_request_defaults_to_no_version() {
        let request: TransitionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.expected_version.is_none());
    }

    #[test]
    fn test_unfreeze_request_requires_reason() {
        let missing: Result<UnfreezeRequest, _> = serde_json::from_str("{}");
        assert!(missing.is_err());

        let ok: UnfreezeRequest =
            serde_json::from_str(r#"{"reason": "correction", "expected_version": 7}"#).unwrap();
        assert_eq!(ok.reason, "correction");
        assert_eq!(ok.expected_version, Some(7));
    }

    #[test]
    fn test_reject_period_request_all_fields_optional() {
        let request: RejectPeriodRequest = serde_json::from_str("{}").unwrap();
        assert!(request.new_period_end.is_none());
        assert!(request.expected_version.is_none());
    }
}
