//! End-to-end service scenarios through the wired buses

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use talentlink_core::services::applications::{
    self, ApplicationCommand, ApplicationQuery, InMemoryApplicationRepository,
};
use talentlink_core::services::jobs::{self, InMemoryJobRepository, JobCommand, JobQuery};
use talentlink_core::services::users::{self, InMemoryUserRepository, UserCommand, UserQuery};
use talentlink_core::{
    Envelope, EventBus, EventCallback, EventEnvelope, InMemoryEventBus, MetricsRegistry,
};

struct Recorder {
    seen: Mutex<Vec<EventEnvelope>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn event_types(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl EventCallback for Recorder {
    async fn call(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn submit(job_id: Uuid, employee_id: Uuid) -> Envelope<ApplicationCommand> {
    Envelope::new(ApplicationCommand::Submit {
        job_id,
        employee_id,
        cv_id: None,
    })
}

#[tokio::test]
async fn submitted_application_reaches_the_matching_queue() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.bind_queue("matching", &["application.submitted"]);
    let recorder = Recorder::new();
    event_bus
        .subscribe("ApplicationSubmitted", recorder.clone())
        .await;

    let service = applications::wire(
        Arc::new(InMemoryApplicationRepository::new()),
        event_bus.clone(),
        Arc::new(MetricsRegistry::new()),
    );

    let outcome = service
        .command_bus
        .send(submit(Uuid::now_v7(), Uuid::now_v7()))
        .await
        .unwrap();
    assert!(outcome.success());

    event_bus.drain("matching").await.unwrap();
    assert_eq!(recorder.event_types(), vec!["ApplicationSubmitted"]);
}

#[tokio::test]
async fn duplicate_submission_yields_no_second_event() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.bind_queue("matching", &["application.submitted"]);
    let metrics = Arc::new(MetricsRegistry::new());

    let service = applications::wire(
        Arc::new(InMemoryApplicationRepository::new()),
        event_bus.clone(),
        metrics.clone(),
    );

    let job_id = Uuid::now_v7();
    let employee_id = Uuid::now_v7();
    service
        .command_bus
        .send(submit(job_id, employee_id))
        .await
        .unwrap();
    let second = service
        .command_bus
        .send(submit(job_id, employee_id))
        .await
        .unwrap();

    assert_eq!(second.error(), Some("You have already applied to this job"));
    assert_eq!(event_bus.pending("matching"), 1);
    assert_eq!(metrics.command_count("Submit", true), 1);
    assert_eq!(metrics.command_count("Submit", false), 1);
}

#[tokio::test]
async fn invitation_publishes_status_change_then_invitation() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.bind_queue("notifications", &["application.status_changed", "candidate.invited"]);
    let recorder = Recorder::new();
    event_bus
        .subscribe("ApplicationStatusChanged", recorder.clone())
        .await;
    event_bus
        .subscribe("CandidateInvited", recorder.clone())
        .await;

    let service = applications::wire(
        Arc::new(InMemoryApplicationRepository::new()),
        event_bus.clone(),
        Arc::new(MetricsRegistry::new()),
    );

    let outcome = service
        .command_bus
        .send(submit(Uuid::now_v7(), Uuid::now_v7()))
        .await
        .unwrap();
    let application_id: Uuid = outcome.data().unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    service
        .command_bus
        .send(Envelope::new(ApplicationCommand::InviteCandidate {
            application_id,
            employer_id: Uuid::now_v7(),
        }))
        .await
        .unwrap();

    event_bus.drain("notifications").await.unwrap();
    assert_eq!(
        recorder.event_types(),
        vec!["ApplicationStatusChanged", "CandidateInvited"]
    );
}

#[tokio::test]
async fn job_pipeline_lists_best_matches_after_unscored() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    let repository = Arc::new(InMemoryApplicationRepository::new());
    let service = applications::wire(
        repository.clone(),
        event_bus,
        Arc::new(MetricsRegistry::new()),
    );

    let job_id = Uuid::now_v7();
    for _ in 0..3 {
        service
            .command_bus
            .send(submit(job_id, Uuid::now_v7()))
            .await
            .unwrap();
    }

    let outcome = service
        .query_bus
        .send(Envelope::new(ApplicationQuery::ForJob { job_id }))
        .await
        .unwrap();

    assert!(outcome.success());
    assert_eq!(outcome.data().unwrap().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn closed_job_disappears_from_the_public_listing() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.bind_queue("audit", &["job.>"]);

    let service = jobs::wire(
        Arc::new(InMemoryJobRepository::new()),
        event_bus.clone(),
        Arc::new(MetricsRegistry::new()),
    );

    let employer_id = Uuid::now_v7();
    let created = service
        .command_bus
        .send(Envelope::new(JobCommand::Create {
            employer_id,
            title: "Platform Engineer".to_string(),
            description: "Own the event substrate".to_string(),
            company_name: "Acme".to_string(),
            required_skills: vec!["Rust".to_string()],
            required_technologies: vec!["NATS".to_string()],
            experience_years: 4,
            location: "Utrecht".to_string(),
            employment_type: "full-time".to_string(),
        }))
        .await
        .unwrap();
    let job_id: Uuid = created.data().unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    service
        .command_bus
        .send(Envelope::new(JobCommand::Close {
            job_id,
            employer_id,
        }))
        .await
        .unwrap();

    let listing = service
        .query_bus
        .send(Envelope::new(JobQuery::ListActive {
            limit: 100,
            offset: 0,
        }))
        .await
        .unwrap();

    assert_eq!(listing.data().unwrap().as_array().unwrap().len(), 0);
    // JobCreated and JobClosed both reached the audit queue.
    assert_eq!(event_bus.pending("audit"), 2);
}

#[tokio::test]
async fn user_lifecycle_round_trip() {
    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.bind_queue("directory", &["user.>"]);

    let service = users::wire(
        Arc::new(InMemoryUserRepository::new()),
        event_bus.clone(),
        Arc::new(MetricsRegistry::new()),
    );

    let created = service
        .command_bus
        .send(Envelope::new(UserCommand::Create {
            keycloak_id: "kc-42".to_string(),
            email: "grace@acme.nl".to_string(),
            full_name: "Grace Hopper".to_string(),
            role: "employer".to_string(),
            company_name: Some("Acme".to_string()),
            phone: None,
            location: None,
        }))
        .await
        .unwrap();
    assert!(created.success());
    let user_id: Uuid = created.data().unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let by_email = service
        .query_bus
        .send(Envelope::new(UserQuery::ByEmail {
            email: "grace@acme.nl".to_string(),
        }))
        .await
        .unwrap();
    assert_eq!(by_email.data().unwrap()["keycloak_id"], "kc-42");

    let deleted = service
        .command_bus
        .send(Envelope::new(UserCommand::Delete { user_id }))
        .await
        .unwrap();
    assert!(deleted.success());

    let gone = service
        .query_bus
        .send(Envelope::new(UserQuery::ById { user_id }))
        .await
        .unwrap();
    assert_eq!(
        gone.error(),
        Some(format!("User not found: {user_id}").as_str())
    );

    // Create, Update skipped, Delete: two events on the directory queue.
    assert_eq!(event_bus.pending("directory"), 2);
}
