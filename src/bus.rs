//! In-process command and query buses (mediator pattern)
//!
//! A [`MessageBus`] maps a message's kind tag to exactly one registered
//! handler. Dispatch is direct and single-hop: no middleware chain, no
//! retry, no validation of message contents. Any retry or idempotency
//! responsibility belongs to the handler or the caller.
//!
//! The registration table is built once at service startup and only read
//! afterwards, so the bus can be shared freely across tasks without locks.
//!
//! Domain failures (not-found, duplicate, unauthorized, invalid-state) come
//! back inside the handler's [`Outcome`]. A missing registration is a
//! programmer error and surfaces as [`DispatchError::UnregisteredHandler`]
//! instead of being folded into an `Outcome`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::DispatchError;
use crate::message::{DispatchMessage, Envelope, Outcome};
use crate::metrics::MetricsRegistry;

/// Whether a bus carries write intents or read intents.
///
/// The dispatch contract is identical; the role only labels logs and
/// metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusRole {
    /// Write-side bus
    Command,
    /// Read-side bus
    Query,
}

impl BusRole {
    fn label(self) -> &'static str {
        match self {
            BusRole::Command => "command",
            BusRole::Query => "query",
        }
    }
}

/// Handler for one message kind.
///
/// Handlers own all domain validation and must return a failure [`Outcome`]
/// (never panic, never `Err`) for expected domain errors.
#[async_trait]
pub trait Handler<M: DispatchMessage>: Send + Sync {
    /// Execute the message and report the result
    async fn handle(&self, message: Envelope<M>) -> Outcome;
}

/// Mediator dispatching messages to their registered handlers by kind tag.
pub struct MessageBus<M: DispatchMessage> {
    role: BusRole,
    handlers: HashMap<M::Kind, Arc<dyn Handler<M>>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<M: DispatchMessage> MessageBus<M> {
    /// Create an empty bus
    pub fn new(role: BusRole) -> Self {
        Self {
            role,
            handlers: HashMap::new(),
            metrics: None,
        }
    }

    /// Attach a metrics registry; dispatches are counted per kind and status
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Associate a message kind with a handler.
    ///
    /// Registering a second handler for the same kind silently overwrites
    /// the first; there is no multi-dispatch.
    pub fn register(&mut self, kind: M::Kind, handler: Arc<dyn Handler<M>>) {
        if self.handlers.insert(kind, handler).is_some() {
            warn!(role = self.role.label(), kind = ?kind, "handler overwritten");
        }
    }

    /// Dispatch a message to its handler and return its outcome unchanged.
    ///
    /// Fails with [`DispatchError::UnregisteredHandler`] when no handler is
    /// registered for the message's kind.
    pub async fn send(&self, message: Envelope<M>) -> Result<Outcome, DispatchError> {
        let kind = message.body().kind();

        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| DispatchError::UnregisteredHandler {
                kind: format!("{kind:?}"),
            })?;

        debug!(
            role = self.role.label(),
            kind = ?kind,
            message_id = %message.id(),
            "dispatching message"
        );

        let outcome = handler.handle(message).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_dispatch(self.role, &format!("{kind:?}"), outcome.success());
        }

        Ok(outcome)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the bus has no registrations
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
