//! Routing-key hierarchy for platform events
//!
//! Every domain event is published under a hierarchical routing key:
//!
//! ```text
//! {aggregate}.{operation}
//! ```
//!
//! This allows for:
//! - Precise bindings (`application.submitted`)
//! - Aggregate-level wildcards (`application.>`)
//! - Global bindings (`>`)
//!
//! # Examples
//!
//! ```rust
//! use talentlink_core::routing::{Aggregate, Operation, RoutingKeyBuilder};
//!
//! let key = RoutingKeyBuilder::new()
//!     .aggregate(Aggregate::Application)
//!     .operation(Operation::Submitted)
//!     .build();
//! assert_eq!(key, "application.submitted");
//!
//! let wildcard = RoutingKeyBuilder::new()
//!     .aggregate(Aggregate::Job)
//!     .build_wildcard();
//! assert_eq!(wildcard, "job.>");
//! ```

use std::fmt;

/// Aggregates of the recruiting platform that emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    /// Job applications
    Application,
    /// Job postings
    Job,
    /// User profiles
    User,
    /// Candidates (interview invitations)
    Candidate,
    /// Uploaded CVs
    Cv,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Application => write!(f, "application"),
            Aggregate::Job => write!(f, "job"),
            Aggregate::User => write!(f, "user"),
            Aggregate::Candidate => write!(f, "candidate"),
            Aggregate::Cv => write!(f, "cv"),
        }
    }
}

/// Operations (event types) that can occur within each aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Application operations
    /// An application was submitted
    Submitted,
    /// An application's status changed
    StatusChanged,

    // Candidate operations
    /// A candidate was invited for an interview
    Invited,

    // Job operations
    /// A job posting was created
    Created,
    /// An entity was updated
    Updated,
    /// A job posting was closed
    Closed,

    // User operations
    /// A user was deleted
    Deleted,

    // CV operations
    /// A CV was uploaded
    Uploaded,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Submitted => write!(f, "submitted"),
            Operation::StatusChanged => write!(f, "status_changed"),
            Operation::Invited => write!(f, "invited"),
            Operation::Created => write!(f, "created"),
            Operation::Updated => write!(f, "updated"),
            Operation::Closed => write!(f, "closed"),
            Operation::Deleted => write!(f, "deleted"),
            Operation::Uploaded => write!(f, "uploaded"),
        }
    }
}

/// Builder for routing keys
#[derive(Debug, Clone, Default)]
pub struct RoutingKeyBuilder {
    aggregate: Option<Aggregate>,
    operation: Option<Operation>,
}

impl RoutingKeyBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the aggregate
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    /// Set the operation
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Build the complete routing key
    ///
    /// # Panics
    ///
    /// Panics if aggregate or operation is not set
    pub fn build(self) -> String {
        let aggregate = self.aggregate.expect("aggregate must be set");
        let operation = self.operation.expect("operation must be set");
        format!("{aggregate}.{operation}")
    }

    /// Build a wildcard binding for all operations on this aggregate
    ///
    /// Returns: `{aggregate}.>`
    ///
    /// # Panics
    ///
    /// Panics if aggregate is not set
    pub fn build_wildcard(self) -> String {
        let aggregate = self.aggregate.expect("aggregate must be set");
        format!("{aggregate}.>")
    }

    /// Binding matching every platform event
    pub fn build_all() -> String {
        ">".to_string()
    }
}

/// Whether a routing key matches a binding pattern.
///
/// Segment-wise topic matching: `*` matches exactly one segment, a trailing
/// `>` matches one or more remaining segments.
pub fn key_matches(key: &str, pattern: &str) -> bool {
    let mut key_parts = key.split('.');
    let mut pattern_parts = pattern.split('.');

    loop {
        match (key_parts.next(), pattern_parts.next()) {
            // `>` needs at least one remaining key segment
            (Some(_), Some(">")) => return true,
            (Some(k), Some(p)) => {
                if p != "*" && p != k {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Canonical routing keys used across the platform
pub mod keys {
    use super::*;

    pub fn application_submitted() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Application)
            .operation(Operation::Submitted)
            .build()
    }

    pub fn application_status_changed() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Application)
            .operation(Operation::StatusChanged)
            .build()
    }

    pub fn candidate_invited() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Candidate)
            .operation(Operation::Invited)
            .build()
    }

    pub fn job_created() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Job)
            .operation(Operation::Created)
            .build()
    }

    pub fn job_updated() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Job)
            .operation(Operation::Updated)
            .build()
    }

    pub fn job_closed() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Job)
            .operation(Operation::Closed)
            .build()
    }

    pub fn user_created() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::User)
            .operation(Operation::Created)
            .build()
    }

    pub fn user_updated() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::User)
            .operation(Operation::Updated)
            .build()
    }

    pub fn user_deleted() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::User)
            .operation(Operation::Deleted)
            .build()
    }

    pub fn cv_uploaded() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Cv)
            .operation(Operation::Uploaded)
            .build()
    }

    // Wildcard bindings
    pub fn all_application_events() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Application)
            .build_wildcard()
    }

    pub fn all_job_events() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::Job)
            .build_wildcard()
    }

    pub fn all_user_events() -> String {
        RoutingKeyBuilder::new()
            .aggregate(Aggregate::User)
            .build_wildcard()
    }

    pub fn all_events() -> String {
        RoutingKeyBuilder::build_all()
    }
}
