//! Messaging substrate for the TalentLink recruiting platform
//!
//! This crate provides the dispatch layer the platform's services are built
//! on:
//!
//! - **Command/query buses** ([`bus`]) dispatching enveloped messages
//!   ([`message`]) to exactly one handler per message kind
//! - **Domain events** ([`events`]) with a flat JSON wire form, routed by
//!   `{aggregate}.{operation}` keys ([`routing`])
//! - **A durable event bus** ([`event_bus`]) over NATS JetStream, with an
//!   in-process twin for tests, delivering at-least-once to bound queues
//! - **Per-service layers** ([`services`]) wiring handlers, repositories,
//!   and event publication for applications, jobs, and users
//!
//! Write-side handlers follow one shape: validate through the repository,
//! mutate, publish the resulting events (best-effort), and answer with a
//! uniform [`message::Outcome`]. Dispatch metrics are collected through an
//! explicitly shared [`metrics::MetricsRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use talentlink_core::event_bus::InMemoryEventBus;
//! use talentlink_core::message::Envelope;
//! use talentlink_core::metrics::MetricsRegistry;
//! use talentlink_core::services::applications::{
//!     self, ApplicationCommand, InMemoryApplicationRepository,
//! };
//! use uuid::Uuid;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(InMemoryApplicationRepository::new());
//! let event_bus = Arc::new(InMemoryEventBus::new());
//! let metrics = Arc::new(MetricsRegistry::new());
//!
//! let service = applications::wire(repository, event_bus, metrics);
//!
//! let outcome = service
//!     .command_bus
//!     .send(Envelope::new(ApplicationCommand::Submit {
//!         job_id: Uuid::now_v7(),
//!         employee_id: Uuid::now_v7(),
//!         cv_id: None,
//!     }))
//!     .await?;
//! assert!(outcome.success());
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod domain;
pub mod errors;
pub mod event_bus;
pub mod events;
pub mod message;
pub mod metrics;
pub mod routing;
pub mod services;

pub use bus::{BusRole, Handler, MessageBus};
pub use errors::{DispatchError, EventBusError, StorageError};
pub use event_bus::{EventBus, EventBusExt, EventCallback, InMemoryEventBus, NatsEventBus};
pub use events::{DomainEvent, EventEnvelope};
pub use message::{DispatchMessage, Envelope, Outcome};
pub use metrics::MetricsRegistry;
