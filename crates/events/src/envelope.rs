use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Event;

/// Envelope for a committed event, carrying delivery metadata.
///
/// `sequence_number` is assigned by the publisher and increases by one per
/// committed event, so consumers can detect gaps and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    event_type: String,
    event_version: u32,

    /// Monotonically increasing position in the registry's event stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        event_type: impl Into<String>,
        event_version: u32,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            event_version,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, copying its type/version metadata.
    pub fn wrap(sequence_number: u64, payload: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            payload.event_type(),
            payload.version(),
            sequence_number,
            payload,
        )
    }
}
