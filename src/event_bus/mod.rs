//! Durable publish/subscribe for domain events
//!
//! The [`EventBus`] decouples write-side handlers from downstream consumers
//! (e.g. the matching step triggered by an application submission). Two
//! implementations share the contract:
//!
//! - [`NatsEventBus`]: the production bus over a durable JetStream stream
//! - [`InMemoryEventBus`]: an in-process twin for tests and local runs
//!
//! Publishing is best-effort by design: a publish that cannot reach the
//! broker is dropped with a logged warning and never fails the caller.
//! Domain events sit outside the write transaction's atomicity boundary.

pub mod memory;
pub mod nats;

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{DomainEvent, EventEnvelope};

pub use memory::InMemoryEventBus;
pub use nats::{NatsEventBus, NatsEventBusConfig};

/// In-process callback invoked for each matching delivery.
#[async_trait]
pub trait EventCallback: Send + Sync {
    /// Handle one delivered event.
    ///
    /// Returning an error marks the delivery as failed: the consume loop
    /// will discard the message without requeueing it.
    async fn call(&self, event: &EventEnvelope) -> anyhow::Result<()>;
}

/// Publish/subscribe contract shared by all bus implementations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event under `routing_key` (default: the envelope's
    /// `event_type`).
    ///
    /// Best-effort: transport failures are logged and swallowed.
    async fn publish(&self, envelope: EventEnvelope, routing_key: Option<&str>);

    /// Attach a callback for an event type.
    ///
    /// Multiple callbacks per event type are supported; all of them are
    /// invoked, independently, for each matching delivery.
    async fn subscribe(&self, event_type: &str, callback: Arc<dyn EventCallback>);
}

/// Convenience methods over any [`EventBus`].
#[async_trait]
pub trait EventBusExt: EventBus {
    /// Flatten a domain event and publish it under its canonical routing
    /// key.
    async fn publish_event<E: DomainEvent + Sync>(&self, event: &E) {
        let routing_key = event.routing_key();
        self.publish(EventEnvelope::of(event), Some(&routing_key))
            .await;
    }
}

#[async_trait]
impl<T: EventBus + ?Sized> EventBusExt for T {}
