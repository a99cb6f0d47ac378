//! NATS JetStream event bus
//!
//! The durable topic exchange of the platform: one file-backed stream
//! captures every `talentlink.>` subject, and each consuming service
//! declares a durable consumer (its queue) bound to the routing keys it
//! cares about.
//!
//! Connection handling is deliberately minimal: a single lazy
//! connection/JetStream context, one reconnect attempt at next use, and no
//! pooling. Access is serialized through a mutex because the context is not
//! treated as reentrant across concurrent publishers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_nats::jetstream::consumer::pull;
use async_nats::jetstream::consumer::AckPolicy;
use async_nats::jetstream::{self, AckKind, Context};
use async_nats::ConnectOptions;
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::EventBusError;
use crate::event_bus::{EventBus, EventCallback};
use crate::events::EventEnvelope;
use crate::metrics::MetricsRegistry;

/// Configuration for the JetStream event bus
#[derive(Debug, Clone)]
pub struct NatsEventBusConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Stream capturing all platform events
    pub stream_name: String,
    /// Subject prefix; events are published to `{prefix}.{routing_key}`
    pub subject_prefix: String,
}

impl Default for NatsEventBusConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "talentlink".to_string(),
            connect_timeout: Duration::from_secs(10),
            stream_name: "TALENTLINK_EVENTS".to_string(),
            subject_prefix: "talentlink".to_string(),
        }
    }
}

/// Durable publish/subscribe over NATS JetStream.
pub struct NatsEventBus {
    config: NatsEventBusConfig,
    /// Lazy connection; `None` until first use and after a failure
    connection: Mutex<Option<Context>>,
    subscriptions: RwLock<HashMap<String, Vec<Arc<dyn EventCallback>>>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl NatsEventBus {
    /// Create a bus with the given configuration.
    ///
    /// No connection is made until the first publish or consume.
    pub fn new(config: NatsEventBusConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
            subscriptions: RwLock::new(HashMap::new()),
            metrics: None,
        }
    }

    /// Attach a metrics registry; successful publishes are counted per
    /// event type
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn subject_for(&self, routing_key: &str) -> String {
        format!("{}.{}", self.config.subject_prefix, routing_key)
    }

    /// Connect and declare the stream if not already connected.
    ///
    /// Exactly one attempt; on failure the slot stays empty so the next use
    /// retries.
    async fn ensure_connected(
        &self,
        slot: &mut Option<Context>,
    ) -> Result<Context, EventBusError> {
        if let Some(context) = slot.as_ref() {
            return Ok(context.clone());
        }

        let options = ConnectOptions::new()
            .name(&self.config.name)
            .connection_timeout(self.config.connect_timeout);

        let client = async_nats::connect_with_options(self.config.servers.join(","), options)
            .await
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        let context = jetstream::new(client);

        let stream_config = jetstream::stream::Config {
            name: self.config.stream_name.clone(),
            subjects: vec![format!("{}.>", self.config.subject_prefix)],
            storage: jetstream::stream::StorageType::File,
            ..Default::default()
        };

        context
            .get_or_create_stream(stream_config)
            .await
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        info!(servers = ?self.config.servers, stream = %self.config.stream_name, "connected to NATS");

        *slot = Some(context.clone());
        Ok(context)
    }

    /// Declare a durable consumer bound to the given routing keys and block
    /// on its delivery loop.
    ///
    /// Per delivery: deserialize, invoke every subscriber for the contained
    /// `event_type`, then acknowledge only if no callback failed. A failed
    /// callback or an undecodable payload terminates the message without
    /// requeue; such deliveries are lost rather than redelivered.
    ///
    /// Returns only on setup failure or when the broker ends the stream.
    pub async fn start_consuming(
        &self,
        queue_name: &str,
        routing_keys: &[&str],
    ) -> Result<(), EventBusError> {
        let context = {
            let mut slot = self.connection.lock().await;
            self.ensure_connected(&mut slot).await?
        };

        let stream = context
            .get_stream(&self.config.stream_name)
            .await
            .map_err(|e| EventBusError::ConsumerSetup(e.to_string()))?;

        let filter_subjects: Vec<String> = routing_keys
            .iter()
            .map(|key| self.subject_for(key))
            .collect();

        let consumer = stream
            .create_consumer(pull::Config {
                durable_name: Some(queue_name.to_string()),
                filter_subjects: filter_subjects.clone(),
                ack_policy: AckPolicy::Explicit,
                ..Default::default()
            })
            .await
            .map_err(|e| EventBusError::ConsumerSetup(e.to_string()))?;

        info!(
            queue = queue_name,
            subjects = ?filter_subjects,
            "started consuming"
        );

        let mut messages = consumer
            .messages()
            .await
            .map_err(|e| EventBusError::ConsumerSetup(e.to_string()))?;

        while let Some(delivery) = messages.next().await {
            let message = match delivery {
                Ok(message) => message,
                Err(e) => {
                    warn!(queue = queue_name, error = %e, "delivery error");
                    continue;
                }
            };

            self.dispatch_delivery(message).await;
        }

        warn!(queue = queue_name, "consume loop ended");
        Ok(())
    }

    async fn dispatch_delivery(&self, message: jetstream::Message) {
        let envelope = match EventEnvelope::from_bytes(&message.payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "discarding undecodable delivery");
                if let Err(e) = message.ack_with(AckKind::Term).await {
                    warn!(error = %e, "failed to terminate delivery");
                }
                return;
            }
        };

        let callbacks: Vec<Arc<dyn EventCallback>> = {
            let subscriptions = self.subscriptions.read().expect("subscription lock poisoned");
            subscriptions
                .get(&envelope.event_type)
                .cloned()
                .unwrap_or_default()
        };

        debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscribers = callbacks.len(),
            "dispatching delivery"
        );

        // Invoke every subscriber even after one fails; ack only if all
        // succeeded.
        let mut failed = false;
        for callback in &callbacks {
            if let Err(e) = callback.call(&envelope).await {
                error!(
                    event_type = %envelope.event_type,
                    event_id = %envelope.event_id,
                    error = %e,
                    "subscriber failed"
                );
                failed = true;
            }
        }

        let ack = if failed {
            message.ack_with(AckKind::Term).await
        } else {
            message.ack().await
        };

        if let Err(e) = ack {
            warn!(event_id = %envelope.event_id, error = %e, "acknowledgement failed");
        }
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    /// Publish to `{prefix}.{routing_key}` with broker-side persistence.
    ///
    /// Best-effort: if the connection cannot be (re)established or the
    /// publish fails, the event is dropped with a warning and the caller
    /// does not fail. A crash between the database commit and this call
    /// loses the event; there is no outbox.
    async fn publish(&self, envelope: EventEnvelope, routing_key: Option<&str>) {
        let key = routing_key
            .map(str::to_string)
            .unwrap_or_else(|| envelope.event_type.clone());
        let subject = self.subject_for(&key);

        let payload = match envelope.to_bytes() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(event_id = %envelope.event_id, error = %e, "dropping unserializable event");
                return;
            }
        };

        let mut slot = self.connection.lock().await;

        let context = match self.ensure_connected(&mut slot).await {
            Ok(context) => context,
            Err(e) => {
                warn!(
                    subject = %subject,
                    event_id = %envelope.event_id,
                    error = %e,
                    "broker unavailable, dropping event"
                );
                return;
            }
        };

        let published: Result<(), String> = match context.publish(subject.clone(), payload.into()).await {
            Ok(ack) => ack.await.map(|_| ()).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match published {
            Ok(()) => {
                debug!(subject = %subject, event_id = %envelope.event_id, "event published");
                if let Some(metrics) = &self.metrics {
                    metrics.record_event_published(&envelope.event_type);
                }
            }
            Err(e) => {
                // Drop the connection so the next use reconnects once.
                *slot = None;
                warn!(
                    subject = %subject,
                    event_id = %envelope.event_id,
                    error = %e,
                    "publish failed, dropping event"
                );
            }
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

        debug!(event_type, "subscriber attached");
    }
}
