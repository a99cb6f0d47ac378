//! In-memory event bus
//!
//! In-process twin of the JetStream bus with the same delivery semantics:
//! bound queues receive matching publishes in publish order, subscribers
//! are looked up by `event_type`, and a failing callback discards the
//! triggering message without redelivery.
//!
//! Instead of a blocking receive loop, tests and local runs pump queues
//! explicitly with [`InMemoryEventBus::drain`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::errors::EventBusError;
use crate::event_bus::{EventBus, EventCallback};
use crate::events::EventEnvelope;
use crate::metrics::MetricsRegistry;
use crate::routing::key_matches;

#[derive(Debug, Default)]
struct BoundQueue {
    bindings: Vec<String>,
    pending: VecDeque<(String, EventEnvelope)>,
}

/// In-process topic exchange with bound queues.
#[derive(Default)]
pub struct InMemoryEventBus {
    queues: Mutex<HashMap<String, BoundQueue>>,
    subscriptions: RwLock<HashMap<String, Vec<Arc<dyn EventCallback>>>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl InMemoryEventBus {
    /// Create an empty exchange
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metrics registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Declare a queue and bind it to the given routing-key patterns.
    ///
    /// Mirrors the declare-and-bind half of the durable consumer setup.
    /// Binding an existing queue extends its bindings.
    pub fn bind_queue(&self, queue_name: &str, routing_keys: &[&str]) {
        let mut queues = self.queues.lock().expect("queue lock poisoned");
        let queue = queues.entry(queue_name.to_string()).or_default();
        queue
            .bindings
            .extend(routing_keys.iter().map(|key| key.to_string()));

        debug!(queue = queue_name, bindings = ?queue.bindings, "queue bound");
    }

    /// Deliver every pending message on a queue to its subscribers, in
    /// publish order.
    ///
    /// A message whose callbacks all succeed is acknowledged (removed); a
    /// message with any failing callback is discarded without redelivery.
    /// Returns the number of messages taken off the queue.
    pub async fn drain(&self, queue_name: &str) -> Result<usize, EventBusError> {
        let mut processed = 0;

        loop {
            let next = {
                let mut queues = self.queues.lock().expect("queue lock poisoned");
                let queue = queues
                    .get_mut(queue_name)
                    .ok_or_else(|| EventBusError::UnknownQueue(queue_name.to_string()))?;
                queue.pending.pop_front()
            };

            let Some((routing_key, envelope)) = next else {
                return Ok(processed);
            };
            processed += 1;

            let callbacks: Vec<Arc<dyn EventCallback>> = {
                let subscriptions =
                    self.subscriptions.read().expect("subscription lock poisoned");
                subscriptions
                    .get(&envelope.event_type)
                    .cloned()
                    .unwrap_or_default()
            };

            for callback in &callbacks {
                if let Err(e) = callback.call(&envelope).await {
                    // Discarded, not requeued, exactly like the broker loop.
                    error!(
                        queue = queue_name,
                        routing_key = %routing_key,
                        event_id = %envelope.event_id,
                        error = %e,
                        "subscriber failed, discarding message"
                    );
                }
            }
        }
    }

    /// Number of messages waiting on a queue
    pub fn pending(&self, queue_name: &str) -> usize {
        self.queues
            .lock()
            .expect("queue lock poisoned")
            .get(queue_name)
            .map(|queue| queue.pending.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, envelope: EventEnvelope, routing_key: Option<&str>) {
        let key = routing_key
            .map(str::to_string)
            .unwrap_or_else(|| envelope.event_type.clone());

        let mut queues = self.queues.lock().expect("queue lock poisoned");
        for (name, queue) in queues.iter_mut() {
            if queue
                .bindings
                .iter()
                .any(|pattern| key_matches(&key, pattern))
            {
                queue.pending.push_back((key.clone(), envelope.clone()));
                debug!(queue = %name, routing_key = %key, event_id = %envelope.event_id, "queued");
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_event_published(&envelope.event_type);
        }
    }

    async fn subscribe(&self, event_type: &str, callback: Arc<dyn EventCallback>) {
        let mut subscriptions = self
            .subscriptions
            .write()
            .expect("subscription lock poisoned");
        subscriptions
            .entry(event_type.to_string())
            .or_default()
            .push(callback);
    }
}
