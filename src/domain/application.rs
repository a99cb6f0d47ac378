//! Job application entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ParseEnumError;

/// Lifecycle status of an application.
///
/// Any status may follow any other; the workflow is enforced by the
/// callers, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Invited,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Invited => "invited",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "invited" => Ok(Self::Invited),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError::new("application status", other)),
        }
    }
}

/// A candidate's application to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub employee_id: Uuid,
    pub cv_id: Option<Uuid>,
    pub status: ApplicationStatus,
    /// Score from the matching pipeline, 0-100; absent until scored
    pub match_score: Option<i32>,
    pub match_summary: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// New pending application, stamped with a fresh id and timestamps.
    pub fn new(job_id: Uuid, employee_id: Uuid, cv_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            job_id,
            employee_id,
            cv_id,
            status: ApplicationStatus::Pending,
            match_score: None,
            match_summary: None,
            applied_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// JSON snapshot returned inside successful outcomes.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "job_id": self.job_id,
            "employee_id": self.employee_id,
            "cv_id": self.cv_id,
            "status": self.status.as_str(),
            "match_score": self.match_score,
            "match_summary": self.match_summary,
            "applied_at": self.applied_at.to_rfc3339(),
            "updated_at": self.updated_at.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn new_application_is_pending_and_unscored() {
        let app = Application::new(Uuid::now_v7(), Uuid::now_v7(), None);

        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.match_score, None);
        assert_eq!(app.applied_at, app.updated_at);
    }

    #[test_case("pending", ApplicationStatus::Pending)]
    #[test_case("reviewed", ApplicationStatus::Reviewed)]
    #[test_case("invited", ApplicationStatus::Invited)]
    #[test_case("rejected", ApplicationStatus::Rejected)]
    fn status_round_trips_through_str(text: &str, status: ApplicationStatus) {
        assert_eq!(text.parse::<ApplicationStatus>().unwrap(), status);
        assert_eq!(status.to_string(), text);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("withdrawn".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn snapshot_includes_nullable_fields() {
        let app = Application::new(Uuid::now_v7(), Uuid::now_v7(), None);
        let snapshot = app.snapshot();

        assert_eq!(snapshot["status"], "pending");
        assert!(snapshot["cv_id"].is_null());
        assert!(snapshot["match_score"].is_null());
    }
}
