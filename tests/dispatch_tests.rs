//! Bus dispatch contract tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use talentlink_core::{
    BusRole, DispatchError, DispatchMessage, Envelope, Handler, MessageBus, MetricsRegistry,
    Outcome,
};

#[derive(Debug, Clone)]
enum TestMessage {
    Echo(String),
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TestMessageKind {
    Echo,
    Reject,
}

impl DispatchMessage for TestMessage {
    type Kind = TestMessageKind;

    fn kind(&self) -> TestMessageKind {
        match self {
            Self::Echo(_) => TestMessageKind::Echo,
            Self::Reject => TestMessageKind::Reject,
        }
    }
}

struct CountingHandler {
    calls: Arc<AtomicUsize>,
    outcome: Outcome,
}

impl CountingHandler {
    fn new(calls: Arc<AtomicUsize>, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self { calls, outcome })
    }
}

#[async_trait]
impl Handler<TestMessage> for CountingHandler {
    async fn handle(&self, _message: Envelope<TestMessage>) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[tokio::test]
async fn send_invokes_exactly_one_handler() {
    let mut bus = MessageBus::new(BusRole::Command);
    let echo_calls = Arc::new(AtomicUsize::new(0));
    let reject_calls = Arc::new(AtomicUsize::new(0));
    bus.register(
        TestMessageKind::Echo,
        CountingHandler::new(echo_calls.clone(), Outcome::ok(json!(null))),
    );
    bus.register(
        TestMessageKind::Reject,
        CountingHandler::new(reject_calls.clone(), Outcome::fail("no")),
    );

    bus.send(Envelope::new(TestMessage::Echo("hi".to_string())))
        .await
        .unwrap();

    assert_eq!(echo_calls.load(Ordering::SeqCst), 1);
    assert_eq!(reject_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn handler_outcome_passes_through_unchanged() {
    let mut bus = MessageBus::new(BusRole::Query);
    let expected = Outcome::fail_with(
        "invalid",
        vec!["first problem".to_string(), "second problem".to_string()],
    );
    bus.register(
        TestMessageKind::Reject,
        CountingHandler::new(Arc::new(AtomicUsize::new(0)), expected.clone()),
    );

    let outcome = bus.send(Envelope::new(TestMessage::Reject)).await.unwrap();

    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn unregistered_kind_is_a_hard_error_every_time() {
    let bus: MessageBus<TestMessage> = MessageBus::new(BusRole::Command);

    for _ in 0..3 {
        let err = bus
            .send(Envelope::new(TestMessage::Echo("hi".to_string())))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::UnregisteredHandler {
                kind: "Echo".to_string()
            }
        );
    }
}

#[tokio::test]
async fn reregistration_replaces_the_previous_handler() {
    let mut bus = MessageBus::new(BusRole::Command);
    let first_calls = Arc::new(AtomicUsize::new(0));
    let second_calls = Arc::new(AtomicUsize::new(0));

    bus.register(
        TestMessageKind::Echo,
        CountingHandler::new(first_calls.clone(), Outcome::ok(json!("first"))),
    );
    bus.register(
        TestMessageKind::Echo,
        CountingHandler::new(second_calls.clone(), Outcome::ok(json!("second"))),
    );
    assert_eq!(bus.len(), 1);

    let outcome = bus
        .send(Envelope::new(TestMessage::Echo("hi".to_string())))
        .await
        .unwrap();

    assert_eq!(outcome.data(), Some(&json!("second")));
    assert_eq!(first_calls.load(Ordering::SeqCst), 0);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispatches_are_counted_per_kind_and_status() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut bus = MessageBus::new(BusRole::Command).with_metrics(metrics.clone());
    bus.register(
        TestMessageKind::Echo,
        CountingHandler::new(Arc::new(AtomicUsize::new(0)), Outcome::ok(json!(null))),
    );
    bus.register(
        TestMessageKind::Reject,
        CountingHandler::new(Arc::new(AtomicUsize::new(0)), Outcome::fail("no")),
    );

    bus.send(Envelope::new(TestMessage::Echo("a".to_string())))
        .await
        .unwrap();
    bus.send(Envelope::new(TestMessage::Echo("b".to_string())))
        .await
        .unwrap();
    bus.send(Envelope::new(TestMessage::Reject)).await.unwrap();

    assert_eq!(metrics.command_count("Echo", true), 2);
    assert_eq!(metrics.command_count("Reject", false), 1);
    assert_eq!(metrics.command_count("Reject", true), 0);
}

#[tokio::test]
async fn failed_sends_leave_metrics_untouched() {
    let metrics = Arc::new(MetricsRegistry::new());
    let bus: MessageBus<TestMessage> =
        MessageBus::new(BusRole::Command).with_metrics(metrics.clone());

    let result = bus.send(Envelope::new(TestMessage::Reject)).await;

    assert!(result.is_err());
    assert_eq!(metrics.snapshot().commands.len(), 0);
}
