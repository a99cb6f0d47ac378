//! User command and query handlers

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::bus::Handler;
use crate::domain::{User, UserRole};
use crate::errors::StorageError;
use crate::event_bus::{EventBus, EventBusExt};
use crate::events::{UserCreated, UserDeleted, UserUpdated};
use crate::message::{Envelope, Outcome};
use crate::services::users::{UserCommand, UserQuery, UserRepository};

/// Handles [`UserCommand::Create`].
pub struct CreateUserHandler {
    repository: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl CreateUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<UserCommand> for CreateUserHandler {
    async fn handle(&self, message: Envelope<UserCommand>) -> Outcome {
        let UserCommand::Create {
            keycloak_id,
            email,
            full_name,
            role,
            company_name,
            phone,
            location,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let role: UserRole = match role.parse() {
            Ok(role) => role,
            Err(e) => return Outcome::fail(format!("Failed to create user: {e}")),
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            keycloak_id,
            email: email.clone(),
            full_name,
            role,
            company_name,
            phone,
            location,
            created_at: now,
            updated_at: now,
        };

        match self.repository.insert_unique(user.clone()).await {
            Ok(()) => {
                let event = UserCreated::new(
                    user.id,
                    user.email.clone(),
                    user.role.as_str(),
                    user.full_name.clone(),
                );
                self.event_bus.publish_event(&event).await;
                Outcome::ok(user.snapshot())
            }
            Err(StorageError::Duplicate) => {
                Outcome::fail(format!("User already exists with email: {email}"))
            }
            Err(e) => Outcome::fail(format!("Failed to create user: {e}")),
        }
    }
}

/// Handles [`UserCommand::Update`].
///
/// The event carries just the fields that actually changed and is skipped
/// entirely for an empty edit.
pub struct UpdateUserHandler {
    repository: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl UpdateUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<UserCommand> for UpdateUserHandler {
    async fn handle(&self, message: Envelope<UserCommand>) -> Outcome {
        let UserCommand::Update {
            user_id,
            full_name,
            company_name,
            phone,
            location,
        } = message.into_body()
        else {
            return Outcome::fail("misrouted command");
        };

        let mut user = match self.repository.get(user_id).await {
            Ok(user) => user,
            Err(StorageError::NotFound) => {
                return Outcome::fail(format!("User not found: {user_id}"))
            }
            Err(e) => return Outcome::fail(format!("Failed to update user: {e}")),
        };

        let mut updated_fields = serde_json::Map::new();

        if let Some(full_name) = full_name {
            updated_fields.insert("full_name".to_string(), json!(full_name));
            user.full_name = full_name;
        }
        if let Some(company_name) = company_name {
            updated_fields.insert("company_name".to_string(), json!(company_name));
            user.company_name = Some(company_name);
        }
        if let Some(phone) = phone {
            updated_fields.insert("phone".to_string(), json!(phone));
            user.phone = Some(phone);
        }
        if let Some(location) = location {
            updated_fields.insert("location".to_string(), json!(location));
            user.location = Some(location);
        }

        user.touch();
        if let Err(e) = self.repository.save(user.clone()).await {
            return Outcome::fail(format!("Failed to update user: {e}"));
        }

        if !updated_fields.is_empty() {
            self.event_bus
                .publish_event(&UserUpdated::new(
                    user.id,
                    serde_json::Value::Object(updated_fields),
                ))
                .await;
        }

        Outcome::ok(user.snapshot())
    }
}

/// Handles [`UserCommand::Delete`].
pub struct DeleteUserHandler {
    repository: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl DeleteUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }
}

#[async_trait]
impl Handler<UserCommand> for DeleteUserHandler {
    async fn handle(&self, message: Envelope<UserCommand>) -> Outcome {
        let UserCommand::Delete { user_id } = message.into_body() else {
            return Outcome::fail("misrouted command");
        };

        match self.repository.delete(user_id).await {
            Ok(user) => {
                self.event_bus.publish_event(&UserDeleted::new(user.id)).await;
                Outcome::ok(json!({"message": "User deleted successfully"}))
            }
            Err(StorageError::NotFound) => Outcome::fail(format!("User not found: {user_id}")),
            Err(e) => Outcome::fail(format!("Failed to delete user: {e}")),
        }
    }
}

/// Handles [`UserQuery::ById`].
pub struct GetUserByIdHandler {
    repository: Arc<dyn UserRepository>,
}

impl GetUserByIdHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<UserQuery> for GetUserByIdHandler {
    async fn handle(&self, message: Envelope<UserQuery>) -> Outcome {
        let UserQuery::ById { user_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.get(user_id).await {
            Ok(user) => Outcome::ok(user.snapshot()),
            Err(StorageError::NotFound) => Outcome::fail(format!("User not found: {user_id}")),
            Err(e) => Outcome::fail(format!("Failed to get user: {e}")),
        }
    }
}

/// Handles [`UserQuery::ByKeycloakId`].
pub struct GetUserByKeycloakIdHandler {
    repository: Arc<dyn UserRepository>,
}

impl GetUserByKeycloakIdHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<UserQuery> for GetUserByKeycloakIdHandler {
    async fn handle(&self, message: Envelope<UserQuery>) -> Outcome {
        let UserQuery::ByKeycloakId { keycloak_id } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.get_by_keycloak_id(&keycloak_id).await {
            Ok(user) => Outcome::ok(user.snapshot()),
            Err(StorageError::NotFound) => {
                Outcome::fail(format!("User not found with Keycloak ID: {keycloak_id}"))
            }
            Err(e) => Outcome::fail(format!("Failed to get user: {e}")),
        }
    }
}

/// Handles [`UserQuery::ByEmail`].
pub struct GetUserByEmailHandler {
    repository: Arc<dyn UserRepository>,
}

impl GetUserByEmailHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Handler<UserQuery> for GetUserByEmailHandler {
    async fn handle(&self, message: Envelope<UserQuery>) -> Outcome {
        let UserQuery::ByEmail { email } = message.into_body() else {
            return Outcome::fail("misrouted query");
        };

        match self.repository.get_by_email(&email).await {
            Ok(user) => Outcome::ok(user.snapshot()),
            Err(StorageError::NotFound) => {
                Outcome::fail(format!("User not found with email: {email}"))
            }
            Err(e) => Outcome::fail(format!("Failed to get user: {e}")),
        }
    }
}
