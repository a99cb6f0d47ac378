//! Job service: posting and maintaining ICT job listings
//!
//! Write side: create a posting, edit it, or soft-close it; the latter two
//! are restricted to the posting employer. Read side: single job lookup,
//! the public active-jobs listing, and an employer's own postings.

mod handlers;
mod repository;

use std::sync::Arc;

use uuid::Uuid;

use crate::bus::{BusRole, MessageBus};
use crate::event_bus::EventBus;
use crate::message::DispatchMessage;
use crate::metrics::MetricsRegistry;

pub use handlers::{
    CloseJobHandler, CreateJobHandler, GetEmployerJobsHandler, GetJobHandler,
    ListActiveJobsHandler, UpdateJobHandler,
};
pub use repository::{InMemoryJobRepository, JobRepository};

/// Partial edit of a job posting; absent fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub required_technologies: Option<Vec<String>>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    /// Validated against [`EmploymentType`](crate::domain::EmploymentType)
    pub employment_type: Option<String>,
    /// Validated against [`JobStatus`](crate::domain::JobStatus)
    pub status: Option<String>,
}

/// Write intents accepted by the job service.
#[derive(Debug, Clone)]
pub enum JobCommand {
    /// Publish a new active job posting
    Create {
        employer_id: Uuid,
        title: String,
        description: String,
        company_name: String,
        required_skills: Vec<String>,
        required_technologies: Vec<String>,
        experience_years: i32,
        location: String,
        /// Validated in the handler
        employment_type: String,
    },
    /// Edit an existing posting; only the posting employer may do this
    Update {
        job_id: Uuid,
        employer_id: Uuid,
        changes: JobChanges,
    },
    /// Soft-close a posting; only the posting employer may do this
    Close { job_id: Uuid, employer_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCommandKind {
    Create,
    Update,
    Close,
}

impl DispatchMessage for JobCommand {
    type Kind = JobCommandKind;

    fn kind(&self) -> JobCommandKind {
        match self {
            Self::Create { .. } => JobCommandKind::Create,
            Self::Update { .. } => JobCommandKind::Update,
            Self::Close { .. } => JobCommandKind::Close,
        }
    }
}

/// Read intents accepted by the job service.
#[derive(Debug, Clone)]
pub enum JobQuery {
    /// Single job by id
    Get { job_id: Uuid },
    /// Public listing of active jobs, newest first
    ListActive { limit: usize, offset: usize },
    /// All postings of one employer, newest first
    ForEmployer { employer_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobQueryKind {
    Get,
    ListActive,
    ForEmployer,
}

impl DispatchMessage for JobQuery {
    type Kind = JobQueryKind;

    fn kind(&self) -> JobQueryKind {
        match self {
            Self::Get { .. } => JobQueryKind::Get,
            Self::ListActive { .. } => JobQueryKind::ListActive,
            Self::ForEmployer { .. } => JobQueryKind::ForEmployer,
        }
    }
}

/// The wired buses of the job service.
pub struct JobService {
    pub command_bus: MessageBus<JobCommand>,
    pub query_bus: MessageBus<JobQuery>,
}

/// Build both buses with every handler registered.
pub fn wire(
    repository: Arc<dyn JobRepository>,
    event_bus: Arc<dyn EventBus>,
    metrics: Arc<MetricsRegistry>,
) -> JobService {
    let mut command_bus = MessageBus::new(BusRole::Command).with_metrics(metrics.clone());
    command_bus.register(
        JobCommandKind::Create,
        Arc::new(CreateJobHandler::new(repository.clone(), event_bus.clone())),
    );
    command_bus.register(
        JobCommandKind::Update,
        Arc::new(UpdateJobHandler::new(repository.clone(), event_bus.clone())),
    );
    command_bus.register(
        JobCommandKind::Close,
        Arc::new(CloseJobHandler::new(repository.clone(), event_bus)),
    );

    let mut query_bus = MessageBus::new(BusRole::Query).with_metrics(metrics);
    query_bus.register(
        JobQueryKind::Get,
        Arc::new(GetJobHandler::new(repository.clone())),
    );
    query_bus.register(
        JobQueryKind::ListActive,
        Arc::new(ListActiveJobsHandler::new(repository.clone())),
    );
    query_bus.register(
        JobQueryKind::ForEmployer,
        Arc::new(GetEmployerJobsHandler::new(repository)),
    );

    JobService {
        command_bus,
        query_bus,
    }
}
