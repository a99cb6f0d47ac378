//! Job storage contract and in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Job, JobStatus};
use crate::errors::StorageError;

/// Storage collaborator for the job service.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: Job) -> Result<(), StorageError>;

    async fn get(&self, id: Uuid) -> Result<Job, StorageError>;

    /// Replace an existing row; fails with [`StorageError::NotFound`] if
    /// the job was removed in the meantime
    async fn save(&self, job: Job) -> Result<(), StorageError>;

    /// Active jobs, newest first, paginated
    async fn list_active(&self, limit: usize, offset: usize) -> Result<Vec<Job>, StorageError>;

    /// All postings of one employer regardless of status, newest first
    async fn list_for_employer(&self, employer_id: Uuid) -> Result<Vec<Job>, StorageError>;
}

/// Hash-map backed repository for tests and local runs.
#[derive(Default)]
pub struct InMemoryJobRepository {
    rows: RwLock<HashMap<Uuid, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: Job) -> Result<(), StorageError> {
        self.rows
            .write()
            .expect("row lock poisoned")
            .insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Job, StorageError> {
        self.rows
            .read()
            .expect("row lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn save(&self, job: Job) -> Result<(), StorageError> {
        let mut rows = self.rows.write().expect("row lock poisoned");
        match rows.get_mut(&job.id) {
            Some(row) => {
                *row = job;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_active(&self, limit: usize, offset: usize) -> Result<Vec<Job>, StorageError> {
        let rows = self.rows.read().expect("row lock poisoned");
        let mut jobs: Vec<Job> = rows
            .values()
            .filter(|job| job.status == JobStatus::Active)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs.into_iter().skip(offset).take(limit).collect())
    }

    async fn list_for_employer(&self, employer_id: Uuid) -> Result<Vec<Job>, StorageError> {
        let rows = self.rows.read().expect("row lock poisoned");
        let mut jobs: Vec<Job> = rows
            .values()
            .filter(|job| job.employer_id == employer_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}
