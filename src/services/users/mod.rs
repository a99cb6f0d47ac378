//! User service: profile management for employees and employers
//!
//! Write side: create a profile (unique per identity-provider subject and
//! per email), update it, or delete it. Read side: lookup by internal id,
//! by identity-provider subject, or by email.

mod handlers;
mod repository;

use std::sync::Arc;

use uuid::Uuid;

use crate::bus::{BusRole, MessageBus};
use crate::event_bus::EventBus;
use crate::message::DispatchMessage;
use crate::metrics::MetricsRegistry;

pub use handlers::{
    CreateUserHandler, DeleteUserHandler, GetUserByEmailHandler, GetUserByIdHandler,
    GetUserByKeycloakIdHandler, UpdateUserHandler,
};
pub use repository::{InMemoryUserRepository, UserRepository};

/// Write intents accepted by the user service.
#[derive(Debug, Clone)]
pub enum UserCommand {
    /// Create a profile for an authenticated identity
    Create {
        keycloak_id: String,
        email: String,
        full_name: String,
        /// Validated against [`UserRole`](crate::domain::UserRole)
        role: String,
        company_name: Option<String>,
        phone: Option<String>,
        location: Option<String>,
    },
    /// Update profile fields; absent fields stay untouched
    Update {
        user_id: Uuid,
        full_name: Option<String>,
        company_name: Option<String>,
        phone: Option<String>,
        location: Option<String>,
    },
    /// Remove a profile
    Delete { user_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserCommandKind {
    Create,
    Update,
    Delete,
}

impl DispatchMessage for UserCommand {
    type Kind = UserCommandKind;

    fn kind(&self) -> UserCommandKind {
        match self {
            Self::Create { .. } => UserCommandKind::Create,
            Self::Update { .. } => UserCommandKind::Update,
            Self::Delete { .. } => UserCommandKind::Delete,
        }
    }
}

/// Read intents accepted by the user service.
#[derive(Debug, Clone)]
pub enum UserQuery {
    ById { user_id: Uuid },
    ByKeycloakId { keycloak_id: String },
    ByEmail { email: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserQueryKind {
    ById,
    ByKeycloakId,
    ByEmail,
}

impl DispatchMessage for UserQuery {
    type Kind = UserQueryKind;

    fn kind(&self) -> UserQueryKind {
        match self {
            Self::ById { .. } => UserQueryKind::ById,
            Self::ByKeycloakId { .. } => UserQueryKind::ByKeycloakId,
            Self::ByEmail { .. } => UserQueryKind::ByEmail,
        }
    }
}

/// The wired buses of the user service.
pub struct UserService {
    pub command_bus: MessageBus<UserCommand>,
    pub query_bus: MessageBus<UserQuery>,
}

/// Build both buses with every handler registered.
pub fn wire(
    repository: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
    metrics: Arc<MetricsRegistry>,
) -> UserService {
    let mut command_bus = MessageBus::new(BusRole::Command).with_metrics(metrics.clone());
    command_bus.register(
        UserCommandKind::Create,
        Arc::new(CreateUserHandler::new(repository.clone(), event_bus.clone())),
    );
    command_bus.register(
        UserCommandKind::Update,
        Arc::new(UpdateUserHandler::new(repository.clone(), event_bus.clone())),
    );
    command_bus.register(
        UserCommandKind::Delete,
        Arc::new(DeleteUserHandler::new(repository.clone(), event_bus)),
    );

    let mut query_bus = MessageBus::new(BusRole::Query).with_metrics(metrics);
    query_bus.register(
        UserQueryKind::ById,
        Arc::new(GetUserByIdHandler::new(repository.clone())),
    );
    query_bus.register(
        UserQueryKind::ByKeycloakId,
        Arc::new(GetUserByKeycloakIdHandler::new(repository.clone())),
    );
    query_bus.register(
        UserQueryKind::ByEmail,
        Arc::new(GetUserByEmailHandler::new(repository)),
    );

    UserService {
        command_bus,
        query_bus,
    }
}
