//! Application command and query handlers

use std::sync::Arc;

use async_trait::async_trait;

use crate::bus::Handler;
use crate::domain::{Application, ApplicationStatus};
use crate::errors::StorageError;
use crate::event_bus::{EventBus, EventBusExt};
use crate::events::{ApplicationStatusChanged, ApplicationSubmitted, CandidateInvited};
use crate::message::{Envelope, Outcome};
use crate::services::applications::{
    ApplicationCommand, ApplicationQuery, ApplicationRepository,
};

fn snapshots(applications: &[Application]) -> serde_json::Value {
    serde_json::Value::Array(applications.iter().map(Application::snapshot).collect())
}

/// Handles [`ApplicationCommand::Submit`].
pub struct SubmitApplicationHandler {
    repository: Arc<dyn ApplicationRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl SubmitApplicationHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<ApplicationCommand> for SubmitApplicationHandler {
    async fn handle(&self, message: Envelope<ApplicationCommand>) -> Outcome {
        let ApplicationCommand::Submit {
            job_id,
            employee_id,
            cv_id,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let application = Application::new(job_id, employee_id, cv_id);
        match self.repository.insert_unique(application).await {
            Ok(application) => {
                let event = ApplicationSubmitted::new(
                    application.id,
                    application.job_id,
                    application.employee_id,
                    application.cv_id,
                );
                self.event_bus.publish_event(&event).await;
                Outcome::ok(application.snapshot())
            }
            Err(StorageError::Duplicate) => {
                Outcome::fail("You have already applied to this job")
            }
            Err(e) => Outcome::fail(format!("Failed to submit application: {e}")),
        }
    }
}

/// Handles [`ApplicationCommand::UpdateStatus`].
pub struct UpdateApplicationStatusHandler {
    repository: Arc<dyn ApplicationRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl UpdateApplicationStatusHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<ApplicationCommand> for UpdateApplicationStatusHandler {
    async fn handle(&self, message: Envelope<ApplicationCommand>) -> Outcome {
        let ApplicationCommand::UpdateStatus {
            application_id,
            new_status,
            changed_by,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let status: ApplicationStatus = match new_status.parse() {
            Ok(status) => status,
            Err(e) => return Outcome::fail(format!("Failed to update application: {e}")),
        };

        match self.repository.update_status(application_id, status).await {
            Ok((application, old_status)) => {
                let event = ApplicationStatusChanged::new(
                    application.id,
                    old_status.as_str(),
                    status.as_str(),
                    changed_by,
                );
                self.event_bus.publish_event(&event).await;
                Outcome::ok(application.snapshot())
            }
            Err(StorageError::NotFound) => Outcome::fail("Application not found"),
            Err(e) => Outcome::fail(format!("Failed to update application: {e}")),
        }
    }
}

/// Handles [`ApplicationCommand::InviteCandidate`].
///
/// Moves the application to `invited` and publishes both the status change
/// and the invitation itself, in that order.
pub struct InviteCandidateHandler {
    repository: Arc<dyn ApplicationRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl InviteCandidateHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<ApplicationCommand> for InviteCandidateHandler {
    async fn handle(&self, message: Envelope<ApplicationCommand>) -> Outcome {
        let ApplicationCommand::InviteCandidate {
            application_id,
            employer_id,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        match self
            .repository
            .update_status(application_id, ApplicationStatus::Invited)
            .await
        {
            Ok((application, old_status)) => {
                self.event_bus
                    .publish_event(&ApplicationStatusChanged::new(
                        application.id,
                        old_status.as_str(),
                        ApplicationStatus::Invited.as_str(),
                        employer_id,
                    ))
                    .await;
                self.event_bus
                    .publish_event(&CandidateInvited::new(
                        application.id,
                        application.employee_id,
                        application.job_id,
                    ))
                    .await;
                Outcome::ok(application.snapshot())
            }
            Err(StorageError::NotFound) => Outcome::fail("Application not found"),
            Err(e) => Outcome::fail(format!("Failed to invite candidate: {e}")),
        }
    }
}

/// Handles [`ApplicationQuery::Get`].
pub struct GetApplicationHandler {
    repository: Arc<dyn ApplicationRepository>,
}

impl GetApplicationHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<ApplicationQuery> for GetApplicationHandler {
    async fn handle(&self, message: Envelope<ApplicationQuery>) -> Outcome {
        let ApplicationQuery::Get { application_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.get(application_id).await {
            Ok(application) => Outcome::ok(application.snapshot()),
            Err(StorageError::NotFound) => Outcome::fail("Application not found"),
            Err(e) => Outcome::fail(format!("Failed to get application: {e}")),
        }
    }
}

/// Handles [`ApplicationQuery::ForEmployee`].
pub struct GetEmployeeApplicationsHandler {
    repository: Arc<dyn ApplicationRepository>,
}

impl GetEmployeeApplicationsHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<ApplicationQuery> for GetEmployeeApplicationsHandler {
    async fn handle(&self, message: Envelope<ApplicationQuery>) -> Outcome {
        let ApplicationQuery::ForEmployee { employee_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.list_for_employee(employee_id).await {
            Ok(applications) => Outcome::ok(snapshots(&applications)),
            Err(e) => Outcome::fail(format!("Failed to get applications: {e}")),
        }
    }
}

/// Handles [`ApplicationQuery::ForJob`].
pub struct GetJobApplicationsHandler {
    repository: Arc<dyn ApplicationRepository>,
}

impl GetJobApplicationsHandler {
    pub fn new(repository: Arc<dyn ApplicationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<ApplicationQuery> for GetJobApplicationsHandler {
    async fn handle(&self, message: Envelope<ApplicationQuery>) -> Outcome {
        let ApplicationQuery::ForJob { job_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.list_for_job(job_id).await {
            Ok(applications) => Outcome::ok(snapshots(&applications)),
            Err(e) => Outcome::fail(format!("Failed to get job applications: {e}")),
        }
    }
}
