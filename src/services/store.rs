use crate::models::Item;
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors that can occur when reading items
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Read access to reported items
///
/// The matcher never queries storage itself; services use this to build the
/// reference set and the candidate pool before calling it.
pub trait ItemSource: Send + Sync + 'static {
    /// Fetch a single item by id
    fn get_item(&self, id: Uuid) -> impl Future<Output = Result<Option<Item>, StoreError>> + Send;

    /// Open reports owned by a user
    fn items_reported_by(&self, user_id: &str) -> impl Future<Output = Result<Vec<Item>, StoreError>> + Send;

    /// Open items of any status reported by users other than `exclude_user`,
    /// created at or after `since` when given, oldest first
    fn candidate_pool(
        &self,
        exclude_user: &str,
        since: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<Item>, StoreError>> + Send;

    /// Distinct owners of at least one open report
    fn active_reporters(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Cheap liveness probe
    fn health_check(&self) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Item source backed by a vector, for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn insert(&self, item: Item) {
        self.items.write().await.push(item);
    }
}

impl ItemSource for InMemoryStore {
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn items_reported_by(&self, user_id: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.reported_by == user_id && i.is_open())
            .cloned()
            .collect())
    }

    async fn candidate_pool(
        &self,
        exclude_user: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Item>, StoreError> {
        let mut pool: Vec<Item> = self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.reported_by != exclude_user && i.is_open())
            .filter(|i| since.map_or(true, |since| i.created_at >= since))
            .cloned()
            .collect();
        pool.sort_by_key(|i| i.created_at);
        Ok(pool)
    }

    async fn active_reporters(&self) -> Result<Vec<String>, StoreError> {
        let mut reporters: Vec<String> = Vec::new();
        for item in self.items.read().await.iter().filter(|i| i.is_open()) {
            if !reporters.contains(&item.reported_by) {
                reporters.push(item.reported_by.clone());
            }
        }
        Ok(reporters)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
