//! Error types for the dispatch and event-bus substrate

use thiserror::Error;

/// Errors surfaced by the command/query buses.
///
/// These are programmer/configuration errors. Domain failures never appear
/// here; handlers report those through [`crate::message::Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No handler registered for the message kind
    #[error("no handler registered for {kind}")]
    UnregisteredHandler {
        /// Debug rendering of the message kind tag
        kind: String,
    },
}

/// Errors that can occur in event-bus operations
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Broker connection error
    #[error("broker connection error: {0}")]
    Connection(String),

    /// Publish error
    #[error("publish error: {0}")]
    Publish(String),

    /// Stream or consumer setup error
    #[error("consumer setup error: {0}")]
    ConsumerSetup(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Queue is not bound (in-memory bus)
    #[error("queue not bound: {0}")]
    UnknownQueue(String),
}

impl From<serde_json::Error> for EventBusError {
    fn from(err: serde_json::Error) -> Self {
        EventBusError::Serialization(err.to_string())
    }
}

/// Errors reported by the storage collaborators.
///
/// Handlers convert every variant into a failure `Outcome`; storage errors
/// never cross the bus layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The requested entity does not exist
    #[error("not found")]
    NotFound,

    /// A uniqueness precondition failed
    #[error("duplicate")]
    Duplicate,

    /// The storage backend failed (connection, constraint, rollback)
    #[error("storage backend error: {0}")]
    Backend(String),
}
