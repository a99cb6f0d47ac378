//! Per-service message definitions, handlers, and wiring
//!
//! Each service owns one command enum and one query enum with their kind
//! tags, a repository trait with an in-memory implementation, one handler
//! per operation, and a wiring function that builds both buses with every
//! handler registered. The wiring runs once at startup; the returned buses
//! are read-only afterwards.
//!
//! Handlers share a common shape: check preconditions through the
//! repository, mutate, publish the resulting domain events, and answer with
//! an [`Outcome`](crate::message::Outcome) carrying the entity snapshot.
//! Storage errors are converted into failure outcomes here and never travel
//! further up.

pub mod applications;
pub mod jobs;
pub mod users;
