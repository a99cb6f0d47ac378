//! User aggregate events

use serde_json::json;
use uuid::Uuid;

use crate::events::{DomainEvent, EventMeta};
use crate::routing::keys;

/// A user profile was created.
#[derive(Debug, Clone)]
pub struct UserCreated {
    meta: EventMeta,
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub full_name: String,
}

impl UserCreated {
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        role: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            meta: EventMeta::new(user_id),
            user_id,
            email: email.into(),
            role: role.into(),
            full_name: full_name.into(),
        }
    }
}

impl DomainEvent for UserCreated {
    fn event_type(&self) -> &'static str {
        "UserCreated"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::user_created()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "user_id": self.user_id,
            "email": self.email,
            "role": self.role,
            "full_name": self.full_name,
        })
    }
}

/// A user profile was updated.
///
/// Only carries the fields that actually changed.
#[derive(Debug, Clone)]
pub struct UserUpdated {
    meta: EventMeta,
    pub user_id: Uuid,
    pub updated_fields: serde_json::Value,
}

impl UserUpdated {
    pub fn new(user_id: Uuid, updated_fields: serde_json::Value) -> Self {
        Self {
            meta: EventMeta::new(user_id),
            user_id,
            updated_fields,
        }
    }
}

impl DomainEvent for UserUpdated {
    fn event_type(&self) -> &'static str {
        "UserUpdated"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::user_updated()
    }

    fn payload(&self) -> serde_json::Value {
        json!({
            "user_id": self.user_id,
            "updated_fields": self.updated_fields,
        })
    }
}

/// A user profile was deleted.
#[derive(Debug, Clone)]
pub struct UserDeleted {
    meta: EventMeta,
    pub user_id: Uuid,
}

impl UserDeleted {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            meta: EventMeta::new(user_id),
            user_id,
        }
    }
}

impl DomainEvent for UserDeleted {
    fn event_type(&self) -> &'static str {
        "UserDeleted"
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }

    fn routing_key(&self) -> String {
        keys::user_deleted()
    }

    fn payload(&self) -> serde_json::Value {
        json!({"user_id": self.user_id})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_created_routing_and_payload() {
        let user_id = Uuid::now_v7();
        let event = UserCreated::new(user_id, "a@b.nl", "employee", "Ada Lovelace");

        assert_eq!(event.routing_key(), "user.created");
        assert_eq!(event.meta().aggregate_id(), user_id);
        assert_eq!(event.payload()["role"], "employee");
    }

    #[test]
    fn user_deleted_payload_is_minimal() {
        let user_id = Uuid::now_v7();
        let event = UserDeleted::new(user_id);

        assert_eq!(event.payload(), json!({"user_id": user_id}));
    }
}
