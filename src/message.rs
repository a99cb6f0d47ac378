//! Message and result envelopes for the command/query buses
//!
//! Every request that travels through a bus is wrapped in an [`Envelope`]
//! that stamps it with a unique id and an issue timestamp, both assigned
//! exactly once at construction. The body is a service-defined command or
//! query enum carrying an explicit kind tag ([`DispatchMessage`]), which is
//! what the bus resolves handlers by. There is no runtime-type reflection
//! anywhere in the dispatch path.
//!
//! Handlers answer with an [`Outcome`], the uniform success/failure envelope
//! callers translate into HTTP responses. The bus itself is status-code
//! agnostic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// A dispatchable message body with an enumerated kind tag.
///
/// Each service defines one command enum and one query enum, plus a matching
/// `…Kind` enum with one variant per message. The tag is stable across
/// refactors and is the sole dispatch key.
pub trait DispatchMessage: Send + 'static {
    /// The kind tag type for this message family
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// The kind tag of this particular message
    fn kind(&self) -> Self::Kind;
}

/// Envelope wrapping a command or query for dispatch.
///
/// `id` and `issued_at` are assigned once, when the envelope is built, and
/// cannot be changed afterwards.
#[derive(Debug, Clone)]
pub struct Envelope<M> {
    id: Uuid,
    issued_at: DateTime<Utc>,
    body: M,
}

impl<M> Envelope<M> {
    /// Wrap a message body, stamping it with a fresh id and timestamp
    pub fn new(body: M) -> Self {
        Self {
            id: Uuid::now_v7(),
            issued_at: Utc::now(),
            body,
        }
    }

    /// Unique message id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// UTC timestamp of envelope construction
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Borrow the message body
    pub fn body(&self) -> &M {
        &self.body
    }

    /// Consume the envelope, yielding the body
    pub fn into_body(self) -> M {
        self.body
    }
}

/// Uniform success/failure envelope returned by every handler.
///
/// Exactly one of `data`/`error` is meaningful: the constructors make it
/// impossible to build a success carrying an error or a failure carrying
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl Outcome {
    /// Successful outcome carrying an opaque payload
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: Vec::new(),
        }
    }

    /// Failed outcome with a single message
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            errors: Vec::new(),
        }
    }

    /// Failed outcome with a message and an ordered list of sub-errors
    pub fn fail_with(error: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            errors,
        }
    }

    /// Whether the operation succeeded
    pub fn success(&self) -> bool {
        self.success
    }

    /// Payload of a successful outcome
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Message of a failed outcome
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ordered sub-errors of a failed outcome (possibly empty)
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
