//! User profile entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employee,
    Employer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Employer => "employer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "employer" => Ok(Self::Employer),
            other => Err(ParseEnumError::new("user role", other)),
        }
    }
}

/// A platform user, either a candidate or an employer.
///
/// `keycloak_id` is the subject from the identity provider; uniqueness is
/// enforced on it and on `email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub keycloak_id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// JSON snapshot returned inside successful outcomes.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "keycloak_id": self.keycloak_id,
            "email": self.email,
            "full_name": self.full_name,
            "role": self.role.as_str(),
            "company_name": self.company_name,
            "phone": self.phone,
            "location": self.location,
            "created_at": self.created_at.to_rfc3339(),
            "updated_at": self.updated_at.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("employer".parse::<UserRole>().unwrap(), UserRole::Employer);
        assert_eq!(UserRole::Employee.to_string(), "employee");
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn snapshot_keeps_optional_employer_fields() {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            keycloak_id: "kc-123".to_string(),
            email: "hire@acme.nl".to_string(),
            full_name: "Grace Hopper".to_string(),
            role: UserRole::Employer,
            company_name: Some("Acme".to_string()),
            phone: None,
            location: None,
            created_at: now,
            updated_at: now,
        };

        let snapshot = user.snapshot();
        assert_eq!(snapshot["company_name"], "Acme");
        assert!(snapshot["phone"].is_null());
    }
}
