//! Dispatch and publish counters
//!
//! One [`MetricsRegistry`] is constructed at process start and handed by
//! `Arc` to every bus that should record. There is no global state and no
//! initialize-once flag; two registries in one process simply count
//! independently. Exposing the counters (Prometheus endpoint etc.) is the
//! transport layer's job; [`MetricsRegistry::snapshot`] gives it a
//! serializable view.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::bus::BusRole;

/// Dispatch status recorded for a command or query
const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// Process-wide counters for commands, queries, and published events.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    commands: RwLock<HashMap<(String, &'static str), u64>>,
    queries: RwLock<HashMap<(String, &'static str), u64>>,
    events_published: RwLock<HashMap<String, u64>>,
}

impl MetricsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one dispatch for the given bus role, message kind, and status
    pub fn record_dispatch(&self, role: BusRole, kind: &str, success: bool) {
        let status = if success { STATUS_SUCCESS } else { STATUS_ERROR };
        let table = match role {
            BusRole::Command => &self.commands,
            BusRole::Query => &self.queries,
        };
        let mut table = table.write().expect("metrics lock poisoned");
        *table.entry((kind.to_string(), status)).or_insert(0) += 1;
    }

    /// Count one published event by event type
    pub fn record_event_published(&self, event_type: &str) {
        let mut table = self
            .events_published
            .write()
            .expect("metrics lock poisoned");
        *table.entry(event_type.to_string()).or_insert(0) += 1;
    }

    /// Counter for one command kind and status
    pub fn command_count(&self, kind: &str, success: bool) -> u64 {
        let status = if success { STATUS_SUCCESS } else { STATUS_ERROR };
        self.commands
            .read()
            .expect("metrics lock poisoned")
            .get(&(kind.to_string(), status))
            .copied()
            .unwrap_or(0)
    }

    /// Counter for one query kind and status
    pub fn query_count(&self, kind: &str, success: bool) -> u64 {
        let status = if success { STATUS_SUCCESS } else { STATUS_ERROR };
        self.queries
            .read()
            .expect("metrics lock poisoned")
            .get(&(kind.to_string(), status))
            .copied()
            .unwrap_or(0)
    }

    /// Counter for one published event type
    pub fn events_published(&self, event_type: &str) -> u64 {
        self.events_published
            .read()
            .expect("metrics lock poisoned")
            .get(event_type)
            .copied()
            .unwrap_or(0)
    }

    /// Serializable view of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let flatten = |table: &RwLock<HashMap<(String, &'static str), u64>>| {
            table
                .read()
                .expect("metrics lock poisoned")
                .iter()
                .map(|((kind, status), count)| DispatchCount {
                    kind: kind.clone(),
                    status,
                    count: *count,
                })
                .collect()
        };

        MetricsSnapshot {
            commands: flatten(&self.commands),
            queries: flatten(&self.queries),
            events_published: self
                .events_published
                .read()
                .expect("metrics lock poisoned")
                .clone(),
        }
    }
}

/// One (kind, status) counter in a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DispatchCount {
    pub kind: String,
    pub status: &'static str,
    pub count: u64,
}

/// Point-in-time view of all counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub commands: Vec<DispatchCount>,
    pub queries: Vec<DispatchCount>,
    pub events_published: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_counters_accumulate_per_kind_and_status() {
        let metrics = MetricsRegistry::new();
        metrics.record_dispatch(BusRole::Command, "Submit", true);
        metrics.record_dispatch(BusRole::Command, "Submit", true);
        metrics.record_dispatch(BusRole::Command, "Submit", false);
        metrics.record_dispatch(BusRole::Query, "GetApplication", true);

        assert_eq!(metrics.command_count("Submit", true), 2);
        assert_eq!(metrics.command_count("Submit", false), 1);
        assert_eq!(metrics.query_count("GetApplication", true), 1);
        assert_eq!(metrics.query_count("Submit", true), 0);
    }

    #[test]
    fn event_counter_accumulates_per_type() {
        let metrics = MetricsRegistry::new();
        metrics.record_event_published("ApplicationSubmitted");
        metrics.record_event_published("ApplicationSubmitted");

        assert_eq!(metrics.events_published("ApplicationSubmitted"), 2);
        assert_eq!(metrics.events_published("JobCreated"), 0);
    }

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = MetricsRegistry::new();
        metrics.record_dispatch(BusRole::Command, "CreateJob", true);
        metrics.record_event_published("JobCreated");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.commands.len(), 1);
        assert_eq!(snapshot.commands[0].kind, "CreateJob");
        assert_eq!(snapshot.commands[0].count, 1);
        assert_eq!(snapshot.events_published["JobCreated"], 1);
    }
}
