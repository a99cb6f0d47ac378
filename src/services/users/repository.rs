//! User storage contract and in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::StorageError;

/// Storage collaborator for the user service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert unless a user with the same identity-provider subject or
    /// email exists.
    async fn insert_unique(&self, user: User) -> Result<(), StorageError>;

    async fn get(&self, id: Uuid) -> Result<User, StorageError>;

    async fn get_by_keycloak_id(&self, keycloak_id: &str) -> Result<User, StorageError>;

    async fn get_by_email(&self, email: &str) -> Result<User, StorageError>;

    /// Replace an existing row
    async fn save(&self, user: User) -> Result<(), StorageError>;

    /// Remove a row, returning it
    async fn delete(&self, id: Uuid) -> Result<User, StorageError>;
}

/// Hash-map backed repository for tests and local runs.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert_unique(&self, user: User) -> Result<(), StorageError> {
        let mut rows = self.rows.write().expect("row lock poisoned");

        let duplicate = rows.values().any(|existing| {
            existing.keycloak_id == user.keycloak_id || existing.email == user.email
        });
        if duplicate {
            return Err(StorageError::Duplicate);
        }

        rows.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<User, StorageError> {
        self.rows
            .read()
            .expect("row lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn get_by_keycloak_id(&self, keycloak_id: &str) -> Result<User, StorageError> {
        self.rows
            .read()
            .expect("row lock poisoned")
            .values()
            .find(|user| user.keycloak_id == keycloak_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StorageError> {
        self.rows
            .read()
            .expect("row lock poisoned")
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn save(&self, user: User) -> Result<(), StorageError> {
        let mut rows = self.rows.write().expect("row lock poisoned");
        match rows.get_mut(&user.id) {
            Some(row) => {
                *row = user;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<User, StorageError> {
        self.rows
            .write()
            .expect("row lock poisoned")
            .remove(&id)
            .ok_or(StorageError::NotFound)
    }
}
