//! Domain events and their wire format
//!
//! Events are immutable facts about past state changes. Each one carries an
//! [`EventMeta`] generated at construction: the type system makes it
//! impossible to build an event without an `aggregate_id`, the one field
//! callers must always supply.
//!
//! On the wire an event is the flat JSON map produced by [`EventEnvelope`]:
//!
//! ```text
//! {event_id, event_type, timestamp, aggregate_id, payload}
//! ```
//!
//! `payload` holds the concrete event's own fields; everything else is
//! shared metadata.

pub mod application;
pub mod job;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use application::{ApplicationStatusChanged, ApplicationSubmitted, CandidateInvited};
pub use job::{JobClosed, JobCreated, JobUpdated};
pub use user::{UserCreated, UserDeleted, UserUpdated};

/// Shared event metadata, assigned once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    event_id: Uuid,
    occurred_at: DateTime<Utc>,
    aggregate_id: Uuid,
}

impl EventMeta {
    /// Stamp fresh metadata for the entity the event concerns.
    ///
    /// `aggregate_id` is required; there is no way to construct metadata
    /// without it.
    pub fn new(aggregate_id: Uuid) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            aggregate_id,
        }
    }

    /// Unique event id
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    /// UTC generation time
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Identifier of the entity the event concerns
    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }
}

/// An immutable fact about a past state change.
pub trait DomainEvent: Send + Sync {
    /// Name of the concrete event, used for subscriber lookup and as the
    /// fallback routing key
    fn event_type(&self) -> &'static str;

    /// Shared metadata
    fn meta(&self) -> &EventMeta;

    /// Canonical topic routing key for this event
    fn routing_key(&self) -> String;

    /// Event-specific fields as a JSON object
    fn payload(&self) -> serde_json::Value;
}

/// Serialized form of a domain event, one per broker delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event id
    pub event_id: Uuid,
    /// Concrete event name
    pub event_type: String,
    /// UTC generation time
    pub timestamp: DateTime<Utc>,
    /// Identifier of the entity the event concerns
    pub aggregate_id: Uuid,
    /// Event-specific fields
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Flatten a domain event into its wire form
    pub fn of<E: DomainEvent + ?Sized>(event: &E) -> Self {
        let meta = event.meta();
        Self {
            event_id: meta.event_id(),
            event_type: event.event_type().to_string(),
            timestamp: meta.occurred_at(),
            aggregate_id: meta.aggregate_id(),
            payload: event.payload(),
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes.
    ///
    /// Fails if any required field (notably `aggregate_id`) is missing.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
