//! Application storage contract and in-memory implementation

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Application, ApplicationStatus};
use crate::errors::StorageError;

/// Storage collaborator for the application service.
///
/// Each method is one transactional unit: precondition checks and the
/// mutation happen atomically with respect to other callers.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert unless an application for the same job/employee pair exists.
    ///
    /// A duplicate pair fails with [`StorageError::Duplicate`] and leaves
    /// the store untouched.
    async fn insert_unique(&self, application: Application) -> Result<Application, StorageError>;

    async fn get(&self, id: Uuid) -> Result<Application, StorageError>;

    /// Set the status, bump `updated_at`, and return the updated row with
    /// the status it had before.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(Application, ApplicationStatus), StorageError>;

    /// All applications of one employee, newest first
    async fn list_for_employee(&self, employee_id: Uuid)
        -> Result<Vec<Application>, StorageError>;

    /// All applications for one job: unscored first, then by match score
    /// descending, ties broken newest first
    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, StorageError>;
}

/// Hash-map backed repository for tests and local runs.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    rows: RwLock<HashMap<Uuid, Application>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row directly, bypassing the uniqueness check
    #[cfg(test)]
    pub fn seed(&self, application: Application) {
        self.rows
            .write()
            .expect("row lock poisoned")
            .insert(application.id, application);
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert_unique(&self, application: Application) -> Result<Application, StorageError> {
        let mut rows = self.rows.write().expect("row lock poisoned");

        let duplicate = rows.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.employee_id == application.employee_id
        });
        if duplicate {
            return Err(StorageError::Duplicate);
        }

        rows.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get(&self, id: Uuid) -> Result<Application, StorageError> {
        self.rows
            .read()
            .expect("row lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(Application, ApplicationStatus), StorageError> {
        let mut rows = self.rows.write().expect("row lock poisoned");
        let application = rows.get_mut(&id).ok_or(StorageError::NotFound)?;

        let old_status = application.status;
        application.status = status;
        application.touch();

        Ok((application.clone(), old_status))
    }

    async fn list_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<Application>, StorageError> {
        let rows = self.rows.read().expect("row lock poisoned");
        let mut applications: Vec<Application> = rows
            .values()
            .filter(|app| app.employee_id == employee_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, StorageError> {
        let rows = self.rows.read().expect("row lock poisoned");
        let mut applications: Vec<Application> = rows
            .values()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| match (a.match_score, b.match_score) {
            (None, None) => b.applied_at.cmp(&a.applied_at),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(left), Some(right)) => {
                right.cmp(&left).then(b.applied_at.cmp(&a.applied_at))
            }
        });
        Ok(applications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn application(job_id: Uuid, employee_id: Uuid) -> Application {
        Application::new(job_id, employee_id, None)
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let repo = InMemoryApplicationRepository::new();
        let job_id = Uuid::now_v7();
        let employee_id = Uuid::now_v7();

        repo.insert_unique(application(job_id, employee_id))
            .await
            .unwrap();
        let second = repo.insert_unique(application(job_id, employee_id)).await;

        assert_eq!(second, Err(StorageError::Duplicate));
    }

    #[tokio::test]
    async fn same_employee_may_apply_to_other_jobs() {
        let repo = InMemoryApplicationRepository::new();
        let employee_id = Uuid::now_v7();

        repo.insert_unique(application(Uuid::now_v7(), employee_id))
            .await
            .unwrap();
        repo.insert_unique(application(Uuid::now_v7(), employee_id))
            .await
            .unwrap();

        let listed = repo.list_for_employee(employee_id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn update_status_returns_previous_status() {
        let repo = InMemoryApplicationRepository::new();
        let app = repo
            .insert_unique(application(Uuid::now_v7(), Uuid::now_v7()))
            .await
            .unwrap();

        let (updated, old) = repo
            .update_status(app.id, ApplicationStatus::Reviewed)
            .await
            .unwrap();

        assert_eq!(old, ApplicationStatus::Pending);
        assert_eq!(updated.status, ApplicationStatus::Reviewed);
        assert!(updated.updated_at >= app.updated_at);
    }

    #[tokio::test]
    async fn job_listing_puts_unscored_first_then_best_match() {
        let repo = InMemoryApplicationRepository::new();
        let job_id = Uuid::now_v7();

        let mut scored_low = application(job_id, Uuid::now_v7());
        scored_low.match_score = Some(40);
        let mut scored_high = application(job_id, Uuid::now_v7());
        scored_high.match_score = Some(90);
        let unscored = application(job_id, Uuid::now_v7());

        repo.seed(scored_low.clone());
        repo.seed(scored_high.clone());
        repo.seed(unscored.clone());

        let listed = repo.list_for_job(job_id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|app| app.id).collect();
        assert_eq!(ids, vec![unscored.id, scored_high.id, scored_low.id]);
    }

    #[tokio::test]
    async fn employee_listing_is_newest_first() {
        let repo = InMemoryApplicationRepository::new();
        let employee_id = Uuid::now_v7();

        let mut older = application(Uuid::now_v7(), employee_id);
        older.applied_at = older.applied_at - Duration::hours(2);
        let newer = application(Uuid::now_v7(), employee_id);

        repo.seed(older.clone());
        repo.seed(newer.clone());

        let listed = repo.list_for_employee(employee_id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|app| app.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
