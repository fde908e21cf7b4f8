use crate::models::{Item, ItemStatus};
use crate::services::store::{ItemSource, StoreError};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

const ITEM_COLUMNS: &str = r#"
    id, title, description, category, location, status,
    reported_by, date_lost_found, resolved_at, created_at
"#;

/// PostgreSQL client for reading lost & found reports
///
/// Read-only from the matcher's point of view: reports are created by the
/// item API, this client only builds reference sets and candidate pools.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Map a row to an item; NULL text columns become empty strings
fn item_from_row(row: &PgRow) -> Result<Item, sqlx::Error> {
    Ok(Item {
        id: row.try_get("id")?,
        title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
        description: row.try_get::<Option<String>, _>("description")?.unwrap_or_default(),
        category: row.try_get::<Option<String>, _>("category")?.unwrap_or_default(),
        location: row.try_get::<Option<String>, _>("location")?.unwrap_or_default(),
        status: row.try_get::<ItemStatus, _>("status")?,
        reported_by: row.try_get("reported_by")?,
        date_lost_found: row.try_get("date_lost_found")?,
        resolved_at: row.try_get("resolved_at")?,
        created_at: row.try_get("created_at")?,
    })
}

fn items_from_rows(rows: &[PgRow]) -> Result<Vec<Item>, StoreError> {
    rows.iter()
        .map(|row| item_from_row(row).map_err(StoreError::from))
        .collect()
}

impl ItemSource for PostgresClient {
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn items_reported_by(&self, user_id: &str) -> Result<Vec<Item>, StoreError> {
        let query = format!(
            "SELECT {} FROM items WHERE reported_by = $1 AND resolved_at IS NULL ORDER BY created_at",
            ITEM_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        tracing::debug!("User {} has {} reports", user_id, rows.len());

        items_from_rows(&rows)
    }

    async fn candidate_pool(
        &self,
        exclude_user: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Item>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM items
            WHERE reported_by <> $1
              AND resolved_at IS NULL
              AND ($2::timestamptz IS NULL OR created_at >= $2)
            ORDER BY created_at
            "#,
            ITEM_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(exclude_user)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Candidate pool for {} has {} items", exclude_user, rows.len());

        items_from_rows(&rows)
    }

    async fn active_reporters(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT reported_by FROM items WHERE resolved_at IS NULL ORDER BY reported_by")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("reported_by")).collect())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
