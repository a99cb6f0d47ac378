//! Platform entities
//!
//! Plain data carriers for the recruiting domain. Schema/ORM mapping lives
//! with the storage collaborators; here the entities only need to validate
//! their enumerated fields and serialize into the JSON snapshots handlers
//! put inside successful outcomes.

use thiserror::Error;

pub mod application;
pub mod job;
pub mod user;

/// A string did not name a known variant of an enumerated field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field}: {value}")]
pub struct ParseEnumError {
    field: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

pub use application::{Application, ApplicationStatus};
pub use job::{EmploymentType, Job, JobStatus};
pub use user::{User, UserRole};
