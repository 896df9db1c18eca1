//! Pre-run event storage and adjudication.
//!
//! Each event's approve/reject is atomic under the store's write guard:
//! the first adjudicator wins and the second receives
//! `AlreadyAdjudicated`. Events are never deleted.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PreRunEvent, PreRunEventKind, PreRunEventStatus};

/// In-process pre-run event storage.
#[derive(Debug, Default)]
pub struct EventStore {
    inner: RwLock<HashMap<Uuid, PreRunEvent>>,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new pending event.
    pub fn create(
        &self,
        kind: PreRunEventKind,
        employee_id: &str,
        period: &PayPeriod,
        amount: Decimal,
    ) -> EngineResult<PreRunEvent> {
        if amount.is_sign_negative() {
            return Err(EngineError::ValidationError {
                message: format!("event amount must not be negative, got {amount}"),
            });
        }
        let event = PreRunEvent::new(
            kind,
            employee_id,
            period.entity.clone(),
            period.period_end,
            amount,
        );
        let mut inner = self.write();
        inner.insert(event.id, event.clone());
        Ok(event)
    }

    /// Fetches an event by id.
    pub fn get(&self, event_id: Uuid) -> EngineResult<PreRunEvent> {
        let inner = self.read();
        inner
            .get(&event_id)
            .cloned()
            .ok_or(EngineError::EventNotFound { event_id })
    }

    /// Updates a pending event's given amount.
    ///
    /// Terminal events cannot be edited; a correction requires a new event.
    pub fn edit_amount(&self, event_id: Uuid, new_amount: Decimal) -> EngineResult<PreRunEvent> {
        if new_amount.is_sign_negative() {
            return Err(EngineError::ValidationError {
                message: format!("event amount must not be negative, got {new_amount}"),
            });
        }
        let mut inner = self.write();
        let event = inner
            .get_mut(&event_id)
            .ok_or(EngineError::EventNotFound { event_id })?;
        if !event.is_pending() {
            return Err(EngineError::AlreadyAdjudicated {
                event_id,
                status: event.status,
            });
        }
        event.given_amount = new_amount;
        Ok(event.clone())
    }

    /// Terminally adjudicates a pending event. First writer wins.
    pub fn adjudicate(
        &self,
        event_id: Uuid,
        approve: bool,
        actor: &str,
    ) -> EngineResult<PreRunEvent> {
        let mut inner = self.write();
        let event = inner
            .get_mut(&event_id)
            .ok_or(EngineError::EventNotFound { event_id })?;
        if !event.is_pending() {
            return Err(EngineError::AlreadyAdjudicated {
                event_id,
                status: event.status,
            });
        }
        event.status = if approve {
            PreRunEventStatus::Approved
        } else {
            PreRunEventStatus::Rejected
        };
        event.adjudicated_by = Some(actor.to_string());
        event.adjudicated_at = Some(Utc::now());
        Ok(event.clone())
    }

    /// Returns all events in a run's (entity, period) scope, in creation
    /// order. Recomputed on every call; the Phase 0 gate is never cached.
    pub fn in_scope(&self, period: &PayPeriod) -> Vec<PreRunEvent> {
        let inner = self.read();
        let mut events: Vec<PreRunEvent> = inner
            .values()
            .filter(|event| {
                event.entity == period.entity && event.period_end == period.period_end
            })
            .cloned()
            .collect();
        events.sort_by_key(|event| event.created_at);
        events
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, PreRunEvent>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, PreRunEvent>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
