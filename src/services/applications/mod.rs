//! Application service: submitting and progressing job applications
//!
//! Write side: submit an application (duplicate job/employee pairs are
//! rejected), move it through its status lifecycle, invite the candidate to
//! an interview. Read side: single application lookup plus the two listing
//! views (an employee's own applications, an employer's per-job pipeline).

mod handlers;
mod repository;

use std::sync::Arc;

use uuid::Uuid;

use crate::bus::{BusRole, MessageBus};
use crate::event_bus::EventBus;
use crate::message::DispatchMessage;
use crate::metrics::MetricsRegistry;

pub use handlers::{
    GetApplicationHandler, GetEmployeeApplicationsHandler, GetJobApplicationsHandler,
    InviteCandidateHandler, SubmitApplicationHandler, UpdateApplicationStatusHandler,
};
pub use repository::{ApplicationRepository, InMemoryApplicationRepository};

/// Write intents accepted by the application service.
#[derive(Debug, Clone)]
pub enum ApplicationCommand {
    /// Submit a new application for a job
    Submit {
        job_id: Uuid,
        employee_id: Uuid,
        cv_id: Option<Uuid>,
    },
    /// Move an application to a new status
    UpdateStatus {
        application_id: Uuid,
        /// Target status as submitted by the caller; validated in the handler
        new_status: String,
        /// Actor performing the change
        changed_by: Uuid,
    },
    /// Invite the candidate behind an application to an interview
    InviteCandidate {
        application_id: Uuid,
        employer_id: Uuid,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationCommandKind {
    Submit,
    UpdateStatus,
    InviteCandidate,
}

impl DispatchMessage for ApplicationCommand {
    type Kind = ApplicationCommandKind;

    fn kind(&self) -> ApplicationCommandKind {
        match self {
            Self::Submit { .. } => ApplicationCommandKind::Submit,
            Self::UpdateStatus { .. } => ApplicationCommandKind::UpdateStatus,
            Self::InviteCandidate { .. } => ApplicationCommandKind::InviteCandidate,
        }
    }
}

/// Read intents accepted by the application service.
#[derive(Debug, Clone)]
pub enum ApplicationQuery {
    /// Single application by id
    Get { application_id: Uuid },
    /// All applications of one employee, newest first
    ForEmployee { employee_id: Uuid },
    /// All applications for one job, best match first
    ForJob { job_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationQueryKind {
    Get,
    ForEmployee,
    ForJob,
}

impl DispatchMessage for ApplicationQuery {
    type Kind = ApplicationQueryKind;

    fn kind(&self) -> ApplicationQueryKind {
        match self {
            Self::Get { .. } => ApplicationQueryKind::Get,
            Self::ForEmployee { .. } => ApplicationQueryKind::ForEmployee,
            Self::ForJob { .. } => ApplicationQueryKind::ForJob,
        }
    }
}

/// The wired buses of the application service.
pub struct ApplicationService {
    pub command_bus: MessageBus<ApplicationCommand>,
    pub query_bus: MessageBus<ApplicationQuery>,
}

/// Build both buses with every handler registered.
pub fn wire(
    repository: Arc<dyn ApplicationRepository>,
    event_bus: Arc<dyn EventBus>,
    metrics: Arc<MetricsRegistry>,
) -> ApplicationService {
    let mut command_bus = MessageBus::new(BusRole::Command).with_metrics(metrics.clone());
    command_bus.register(
        ApplicationCommandKind::Submit,
        Arc::new(SubmitApplicationHandler::new(
            repository.clone(),
            event_bus.clone(),
        )),
    );
    command_bus.register(
        ApplicationCommandKind::UpdateStatus,
        Arc::new(UpdateApplicationStatusHandler::new(
            repository.clone(),
            event_bus.clone(),
        )),
    );
    command_bus.register(
        ApplicationCommandKind::InviteCandidate,
        Arc::new(InviteCandidateHandler::new(repository.clone(), event_bus)),
    );

    let mut query_bus = MessageBus::new(BusRole::Query).with_metrics(metrics);
    query_bus.register(
        ApplicationQueryKind::Get,
        Arc::new(GetApplicationHandler::new(repository.clone())),
    );
    query_bus.register(
        ApplicationQueryKind::ForEmployee,
        Arc::new(GetEmployeeApplicationsHandler::new(repository.clone())),
    );
    query_bus.register(
        ApplicationQueryKind::ForJob,
        Arc::new(GetJobApplicationsHandler::new(repository)),
    );

    ApplicationService {
        command_bus,
        query_bus,
    }
}
