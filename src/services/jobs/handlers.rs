//! Job command and query handlers

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::bus::Handler;
use crate::domain::{EmploymentType, Job, JobStatus};
use crate::errors::StorageError;
use crate::event_bus::{EventBus, EventBusExt};
use crate::events::{JobClosed, JobCreated, JobUpdated};
use crate::message::{Envelope, Outcome};
use crate::services::jobs::{JobCommand, JobQuery, JobRepository};

fn snapshots(jobs: &[Job]) -> serde_json::Value {
    serde_json::Value::Array(jobs.iter().map(Job::snapshot).collect())
}

/// Handles [`JobCommand::Create`].
pub struct CreateJobHandler {
    repository: Arc<dyn JobRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl CreateJobHandler {
    pub fn new(repository: Arc<dyn JobRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<JobCommand> for CreateJobHandler {
    async fn handle(&self, message: Envelope<JobCommand>) -> Outcome {
        let JobCommand::Create {
            employer_id,
            title,
            description,
            company_name,
            required_skills,
            required_technologies,
            experience_years,
            location,
            employment_type,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let employment_type: EmploymentType = match employment_type.parse() {
            Ok(employment_type) => employment_type,
            Err(e) => return Outcome::fail(format!("Failed to create job: {e}")),
        };

        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            employer_id,
            title,
            description,
            company_name,
            required_skills,
            required_technologies,
            experience_years,
            location,
            employment_type,
            status: JobStatus::Active,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.repository.insert(job.clone()).await {
            return Outcome::fail(format!("Failed to create job: {e}"));
        }

        self.event_bus
            .publish_event(&JobCreated::new(job.id, job.employer_id, job.title.clone()))
            .await;

        Outcome::ok(job.snapshot())
    }
}

/// Handles [`JobCommand::Update`].
///
/// Only the posting employer may edit; the event carries just the fields
/// that actually changed and is skipped entirely for an empty edit.
pub struct UpdateJobHandler {
    repository: Arc<dyn JobRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl UpdateJobHandler {
    pub fn new(repository: Arc<dyn JobRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<JobCommand> for UpdateJobHandler {
    async fn handle(&self, message: Envelope<JobCommand>) -> Outcome {
        let JobCommand::Update {
            job_id,
            employer_id,
            changes,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let mut job = match self.repository.get(job_id).await {
            Ok(job) => job,
            Err(StorageError::NotFound) => return Outcome::fail("Job not found"),
            Err(e) => return Outcome::fail(format!("Failed to update job: {e}")),
        };

        if job.employer_id != employer_id {
            return Outcome::fail("Unauthorized");
        }

        let mut updated_fields = serde_json::Map::new();

        if let Some(title) = changes.title {
            updated_fields.insert("title".to_string(), json!(title));
            job.title = title;
        }
        if let Some(description) = changes.description {
            updated_fields.insert("description".to_string(), json!(description));
            job.description = description;
        }
        if let Some(required_skills) = changes.required_skills {
            updated_fields.insert("required_skills".to_string(), json!(required_skills));
            job.required_skills = required_skills;
        }
        if let Some(required_technologies) = changes.required_technologies {
            updated_fields.insert(
                "required_technologies".to_string(),
                json!(required_technologies),
            );
            job.required_technologies = required_technologies;
        }
        if let Some(experience_years) = changes.experience_years {
            updated_fields.insert("experience_years".to_string(), json!(experience_years));
            job.experience_years = experience_years;
        }
        if let Some(location) = changes.location {
            updated_fields.insert("location".to_string(), json!(location));
            job.location = location;
        }
        if let Some(employment_type) = changes.employment_type {
            match employment_type.parse::<EmploymentType>() {
                Ok(employment_type) => {
                    updated_fields
                        .insert("employment_type".to_string(), json!(employment_type.as_str()));
                    job.employment_type = employment_type;
                }
                Err(e) => return Outcome::fail(format!("Failed to update job: {e}")),
            }
        }
        if let Some(status) = changes.status {
            match status.parse::<JobStatus>() {
                Ok(status) => {
                    updated_fields.insert("status".to_string(), json!(status.as_str()));
                    job.status = status;
                }
                Err(e) => return Outcome::fail(format!("Failed to update job: {e}")),
            }
        }

        job.touch();
        if let Err(e) = self.repository.save(job.clone()).await {
            return Outcome::fail(format!("Failed to update job: {e}"));
        }

        if !updated_fields.is_empty() {
            self.event_bus
                .publish_event(&JobUpdated::new(
                    job.id,
                    serde_json::Value::Object(updated_fields),
                ))
                .await;
        }

        Outcome::ok(job.snapshot())
    }
}

/// Handles [`JobCommand::Close`].
///
/// Soft-close: the row stays, its status moves to `closed`.
pub struct CloseJobHandler {
    repository: Arc<dyn JobRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl CloseJobHandler {
    pub fn new(repository: Arc<dyn JobRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<JobCommand> for CloseJobHandler {
    async fn handle(&self, message: Envelope<JobCommand>) -> Outcome {
        let JobCommand::Close {
            job_id,
            employer_id,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let mut job = match self.repository.get(job_id).await {
            Ok(job) => job,
            Err(StorageError::NotFound) => return Outcome::fail("Job not found"),
            Err(e) => return Outcome::fail(format!("Failed to close job: {e}")),
        };

        if job.employer_id != employer_id {
            return Outcome::fail("Unauthorized");
        }

        job.status = JobStatus::Closed;
        job.touch();
        if let Err(e) = self.repository.save(job.clone()).await {
            return Outcome::fail(format!("Failed to close job: {e}"));
        }

        self.event_bus
            .publish_event(&JobClosed::new(job.id, job.employer_id))
            .await;

        Outcome::ok(json!({"message": "Job closed successfully"}))
    }
}

/// Handles [`JobQuery::Get`].
pub struct GetJobHandler {
    repository: Arc<dyn JobRepository>,
}

impl GetJobHandler {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<JobQuery> for GetJobHandler {
    async fn handle(&self, message: Envelope<JobQuery>) -> Outcome {
        let JobQuery::Get { job_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.get(job_id).await {
            Ok(job) => Outcome::ok(job.snapshot()),
            Err(StorageError::NotFound) => Outcome::fail("Job not found"),
            Err(e) => Outcome::fail(format!("Failed to get job: {e}")),
        }
    }
}

/// Handles [`JobQuery::ListActive`].
pub struct ListActiveJobsHandler {
    repository: Arc<dyn JobRepository>,
}

impl ListActiveJobsHandler {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<JobQuery> for ListActiveJobsHandler {
    async fn handle(&self, message: Envelope<JobQuery>) -> Outcome {
        let JobQuery::ListActive { limit, offset } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.list_active(limit, offset).await {
            Ok(jobs) => Outcome::ok(snapshots(&jobs)),
            Err(e) => Outcome::fail(format!("Failed to list jobs: {e}")),
        }
    }
}

/// Handles [`JobQuery::ForEmployer`].
pub struct GetEmployerJobsHandler {
    repository: Arc<dyn JobRepository>,
}

impl GetEmployerJobsHandler {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<JobQuery> for GetEmployerJobsHandler {
    async fn handle(&self, message: Envelope<JobQuery>) -> Outcome {
        let JobQuery::ForEmployer { employer_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.list_for_employer(employer_id).await {
            Ok(jobs) => Outcome::ok(snapshots(&jobs)),
            Err(e) => Outcome::fail(format!("Failed to get employer jobs: {e}")),
        }
    }
}
