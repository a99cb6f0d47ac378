//! Job aggregate events

use serde_json::json;
use uuid::Uuid;

use crate::events::{DomainEvent, EventMeta};
use crate::routing::keys;

/// An employer published a new job posting.
#[derive(Debug, Clone)]
pub struct JobCreated {
    meta: EventMeta,
    pub job_id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
}

impl JobCreated {
    pub fn new(job_id: Uuid, employer_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            meta: EventMeta::new(job_id),
            job_id,
            employer_id,
            title: title.into(),
        }
    }
}

impl DomainEvent for JobCreated {
    fn event_type(&self) -> &'static str {
        "JobCreated"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::job_created()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "job_id": self.job_id,
            "employer_id": self.employer_id,
            "title": self.title,
        })
    }
}

/// A job posting was edited.
#[derive(Debug, Clone)]
pub struct JobUpdated {
    meta: EventMeta,
    pub job_id: Uuid,
    pub updated_fields: serde_json::Value,
}

impl JobUpdated {
    pub fn new(job_id: Uuid, updated_fields: serde_json::Value) -> Self {
        Self {
            meta: EventMeta::new(job_id),
            job_id,
            updated_fields,
        }
    }
}

impl DomainEvent for JobUpdated {
    fn event_type(&self) -> &'static str {
        "JobUpdated"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::job_updated()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "job_id": self.job_id,
            "updated_fields": self.updated_fields,
        })
    }
}

/// A job posting was closed to new applications.
#[derive(Debug, Clone)]
pub struct JobClosed {
    meta: EventMeta,
    pub job_id: Uuid,
    pub employer_id: Uuid,
}

impl JobClosed {
    pub fn new(job_id: Uuid, employer_id: Uuid) -> Self {
        Self {
            meta: EventMeta::new(job_id),
            job_id,
            employer_id,
        }
    }
}

impl DomainEvent for JobClosed {
    fn event_type(&self) -> &'static str {
        "JobClosed"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::job_closed()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "job_id": self.job_id,
            "employer_id": self.employer_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_created_routing_and_payload() {
        let job_id = Uuid::now_v7();
        let event = JobCreated::new(job_id, Uuid::now_v7(), "Backend Engineer");

        assert_eq!(event.routing_key(), "job.created");
        assert_eq!(event.meta().aggregate_id(), job_id);
        assert_eq!(event.payload()["title"], "Backend Engineer");
    }

    #[test]
    fn job_updated_carries_changed_fields() {
        let event = JobUpdated::new(
            Uuid::now_v7(),
            serde_json::json!({"title": "Senior Backend Engineer"}),
        );

        assert_eq!(
            event.payload()["updated_fields"]["title"],
            "Senior Backend Engineer"
        );
    }
}
