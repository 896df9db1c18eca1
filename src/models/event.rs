//! Pre-run compensation event model.
//!
//! Ad-hoc compensation (signing bonuses, exit benefits) is recorded as
//! pre-run events with their own approve/reject sub-lifecycle. Every event
//! must reach a terminal adjudication before a run's Phase 0 can close.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of ad-hoc compensation an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreRunEventKind {
    /// A one-off bonus payable on joining.
    SigningBonus,
    /// A benefit payable on exit.
    ExitBenefit,
}

/// Adjudication status of a pre-run event.
///
/// `Approved` and `Rejected` are terminal: corrections require a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreRunEventStatus {
    /// Awaiting adjudication; the only editable status.
    Pending,
    /// Terminally approved; the given amount is payable.
    Approved,
    /// Terminally rejected; nothing is payable.
    Rejected,
}

impl fmt::Display for PreRunEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreRunEventStatus::Pending => "pending",
            PreRunEventStatus::Approved => "approved",
            PreRunEventStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// An ad-hoc compensation event tied to one employee and one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreRunEvent {
    /// Unique identifier for the event.
    pub id: Uuid,
    /// The kind of compensation recorded.
    pub kind: PreRunEventKind,
    /// The employee the amount is payable to.
    pub employee_id: String,
    /// The entity whose run will pay this event.
    pub entity: String,
    /// The end-of-period date of the period this event falls in.
    pub period_end: NaiveDate,
    /// The amount as originally declared.
    pub declared_amount: Decimal,
    /// The amount actually payable; editable while pending.
    pub given_amount: Decimal,
    /// Adjudication status.
    pub status: PreRunEventStatus,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
    /// Who adjudicated the event, once terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjudicated_by: Option<String>,
    /// When the event was adjudicated, once terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjudicated_at: Option<DateTime<Utc>>,
}

impl PreRunEvent {
    /// Creates a new pending event with the given amount equal to the
    /// declared amount.
    pub fn new(
        kind: PreRunEventKind,
        employee_id: impl Into<String>,
        entity: impl Into<String>,
        period_end: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            employee_id: employee_id.into(),
            entity: entity.into(),
            period_end,
            declared_amount: amount,
            given_amount: amount,
            status: PreRunEventStatus::Pending,
            created_at: Utc::now(),
            adjudicated_by: None,
            adjudicated_at: None,
        }
    }

    /// Returns true while the event awaits adjudication.
    pub fn is_pending(&self) -> bool {
        self.status == PreRunEventStatus::Pending
    }
}
