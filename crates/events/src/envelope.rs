use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use splitledger_core::GroupId;

use crate::Event;

/// Envelope for a committed event: the unit that is journaled and published.
///
/// `sequence_number` is monotonically increasing per group, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    group_id: GroupId,
    sequence_number: u64,
    event_type: String,
    recorded_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        group_id: GroupId,
        sequence_number: u64,
        event_type: impl Into<String>,
        recorded_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            group_id,
            sequence_number,
            event_type: event_type.into(),
            recorded_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap an event at the given stream position with a fresh UUIDv7 id.
    pub fn seal(sequence_number: u64, payload: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            payload.group_id(),
            sequence_number,
            payload.event_type(),
            Utc::now(),
            payload,
        )
    }
}
