//! Application aggregate events

use serde_json::json;
use uuid::Uuid;

use crate::events::{DomainEvent, EventMeta};
use crate::routing::keys;

/// A candidate submitted an application for a job.
///
/// Downstream this triggers the AI matching pipeline.
#[derive(Debug, Clone)]
pub struct ApplicationSubmitted {
    meta: EventMeta,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub employee_id: Uuid,
    pub cv_id: Option<Uuid>,
}

impl ApplicationSubmitted {
    pub fn new(
        application_id: Uuid,
        job_id: Uuid,
        employee_id: Uuid,
        cv_id: Option<Uuid>,
    ) -> Self {
        Self {
            meta: EventMeta::new(application_id),
            application_id,
            job_id,
            employee_id,
            cv_id,
        }
    }
}

impl DomainEvent for ApplicationSubmitted {
    fn event_type(&self) -> &'static str {
        "ApplicationSubmitted"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::application_submitted()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "application_id": self.application_id,
            "job_id": self.job_id,
            "employee_id": self.employee_id,
            "cv_id": self.cv_id,
        })
    }
}

/// An application moved to a new status.
///
/// Records both sides of the transition and the actor who triggered it.
#[derive(Debug, Clone)]
pub struct ApplicationStatusChanged {
    meta: EventMeta,
    pub application_id: Uuid,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: Uuid,
}

impl ApplicationStatusChanged {
    pub fn new(
        application_id: Uuid,
        old_status: impl Into<String>,
        new_status: impl Into<String>,
        changed_by: Uuid,
    ) -> Self {
        Self {
            meta: EventMeta::new(application_id),
            application_id,
            old_status: old_status.into(),
            new_status: new_status.into(),
            changed_by,
        }
    }
}

impl DomainEvent for ApplicationStatusChanged {
    fn event_type(&self) -> &'static str {
        "ApplicationStatusChanged"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::application_status_changed()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "application_id": self.application_id,
            "old_status": self.old_status,
            "new_status": self.new_status,
            "changed_by": self.changed_by,
        })
    }
}

/// A candidate was invited for an interview.
#[derive(Debug, Clone)]
pub struct CandidateInvited {
    meta: EventMeta,
    pub application_id: Uuid,
    pub employee_id: Uuid,
    pub job_id: Uuid,
}

impl CandidateInvited {
    pub fn new(application_id: Uuid, employee_id: Uuid, job_id: Uuid) -> Self {
        Self {
            meta: EventMeta::new(application_id),
            application_id,
            employee_id,
            job_id,
        }
    }
}

impl DomainEvent for CandidateInvited {
    fn event_type(&self) -> &'static str {
        "CandidateInvited"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::candidate_invited()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "application_id": self.application_id,
            "employee_id": self.employee_id,
            "job_id": self.job_id,
        })
    }
}
