//! Delivery semantics tests for the in-process event bus

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use talentlink_core::events::ApplicationSubmitted;
use talentlink_core::{
    DomainEvent, EventBus, EventBusExt, EventCallback, EventEnvelope, InMemoryEventBus,
    MetricsRegistry,
};

struct Recorder {
    seen: Mutex<Vec<Uuid>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<Uuid> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventCallback for Recorder {
    async fn call(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(event.event_id);
        Ok(())
    }
}

struct FailOn {
    target: Uuid,
    seen: Mutex<Vec<Uuid>>,
}

impl FailOn {
    fn new(target: Uuid) -> Arc<Self> {
        Arc::new(Self {
            target,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EventCallback for FailOn {
    async fn call(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(event.event_id);
        if event.event_id == self.target {
            anyhow::bail!("simulated subscriber failure");
        }
        Ok(())
    }
}

fn submitted() -> ApplicationSubmitted {
    ApplicationSubmitted::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), None)
}

#[tokio::test]
async fn messages_are_delivered_in_publish_order() {
    let bus = InMemoryEventBus::new();
    bus.bind_queue("matching", &["application.submitted"]);
    let recorder = Recorder::new();
    bus.subscribe("ApplicationSubmitted", recorder.clone()).await;

    let mut published = Vec::new();
    for _ in 0..5 {
        let event = submitted();
        published.push(event.meta().event_id());
        bus.publish_event(&event).await;
    }

    let processed = bus.drain("matching").await.unwrap();

    assert_eq!(processed, 5);
    assert_eq!(recorder.seen(), published);
}

#[tokio::test]
async fn every_subscriber_sees_each_message_exactly_once() {
    let bus = InMemoryEventBus::new();
    bus.bind_queue("matching", &["application.submitted"]);
    let first = Recorder::new();
    let second = Recorder::new();
    bus.subscribe("ApplicationSubmitted", first.clone()).await;
    bus.subscribe("ApplicationSubmitted", second.clone()).await;

    let event = submitted();
    bus.publish_event(&event).await;
    bus.drain("matching").await.unwrap();

    assert_eq!(first.seen().len(), 1);
    assert_eq!(first.seen(), second.seen());
}

#[tokio::test]
async fn failing_callback_discards_only_that_message() {
    let bus = InMemoryEventBus::new();
    bus.bind_queue("matching", &["application.submitted"]);

    let events = [submitted(), submitted(), submitted()];
    let poison = events[1].meta().event_id();

    let failing = FailOn::new(poison);
    let healthy = Recorder::new();
    bus.subscribe("ApplicationSubmitted", failing.clone()).await;
    bus.subscribe("ApplicationSubmitted", healthy.clone()).await;

    for event in &events {
        bus.publish_event(event).await;
    }

    let processed = bus.drain("matching").await.unwrap();
    assert_eq!(processed, 3);

    // The healthy subscriber still saw the poison message, and nothing is
    // redelivered afterwards.
    assert_eq!(healthy.seen().len(), 3);
    assert_eq!(bus.pending("matching"), 0);
    assert_eq!(bus.drain("matching").await.unwrap(), 0);
}

#[tokio::test]
async fn unmatched_routing_keys_deliver_nowhere() {
    let bus = InMemoryEventBus::new();
    bus.bind_queue("jobs", &["job.>"]);

    bus.publish_event(&submitted()).await;

    assert_eq!(bus.pending("jobs"), 0);
}

#[tokio::test]
async fn publishes_are_counted_per_event_type() {
    let metrics = Arc::new(MetricsRegistry::new());
    let bus = InMemoryEventBus::new().with_metrics(metrics.clone());
    bus.bind_queue("matching", &["application.submitted"]);

    bus.publish_event(&submitted()).await;
    bus.publish_event(&submitted()).await;

    assert_eq!(metrics.events_published("ApplicationSubmitted"), 2);
    assert_eq!(metrics.events_published("JobCreated"), 0);
}
