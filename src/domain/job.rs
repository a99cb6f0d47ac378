//! Job posting entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "draft" => Ok(Self::Draft),
            other => Err(ParseEnumError::new("job status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            other => Err(ParseEnumError::new("employment type", other)),
        }
    }
}

/// An ICT job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub required_skills: Vec<String>,
    pub required_technologies: Vec<String>,
    pub experience_years: i32,
    pub location: String,
    pub employment_type: EmploymentType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// JSON snapshot returned inside successful outcomes.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "employer_id": self.employer_id,
            "title": self.title,
            "description": self.description,
            "company_name": self.company_name,
            "required_skills": self.required_skills,
            "required_technologies": self.required_technologies,
            "experience_years": self.experience_years,
            "location": self.location,
            "employment_type": self.employment_type.as_str(),
            "status": self.status.as_str(),
            "created_at": self.created_at.to_rfc3339(),
            "updated_at": self.updated_at.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("full-time", EmploymentType::FullTime)]
    #[test_case("part-time", EmploymentType::PartTime)]
    #[test_case("contract", EmploymentType::Contract)]
    #[test_case("internship", EmploymentType::Internship)]
    fn employment_type_round_trips_through_str(text: &str, expected: EmploymentType) {
        assert_eq!(text.parse::<EmploymentType>().unwrap(), expected);
        assert_eq!(expected.to_string(), text);
    }

    #[test]
    fn unknown_employment_type_is_rejected() {
        assert!("freelance".parse::<EmploymentType>().is_err());
    }

    #[test]
    fn status_uses_lowercase_wire_form() {
        assert_eq!(
            serde_json::to_value(JobStatus::Active).unwrap(),
            serde_json::json!("active")
        );
    }
}
