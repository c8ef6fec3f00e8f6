use crate::error::{AppError, AppResult};
use crate::models::UrlRecord;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;

/// Store operations the allocator depends on.
///
/// `Repository` is the production implementation; allocator tests
/// substitute an in-memory double.
#[async_trait]
pub trait UrlStore: Send + Sync {
    async fn find_by_original_url(&self, original_url: &str) -> AppResult<Option<UrlRecord>>;
    async fn short_id_exists(&self, short_id: &str) -> AppResult<bool>;
    async fn insert_url(&self, short_id: &str, original_url: &str) -> AppResult<UrlRecord>;
}

/// Database repository for URL records
pub struct Repository {
    pool: PgPool,
}

#[async_trait]
impl UrlStore for Repository {
    async fn find_by_original_url(&self, original_url: &str) -> AppResult<Option<UrlRecord>> {
        Repository::find_by_original_url(self, original_url).await
    }

    async fn short_id_exists(&self, short_id: &str) -> AppResult<bool> {
        Repository::short_id_exists(self, short_id).await
    }

    async fn insert_url(&self, short_id: &str, original_url: &str) -> AppResult<UrlRecord> {
        Repository::insert_url(self, short_id, original_url).await
    }
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_seconds: u64,
    ) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Verify database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new URL record.
    ///
    /// The unique index on `short_id` is the backstop for allocation races:
    /// a violation maps to `DuplicateShortId`, which the allocator treats as
    /// a signal to generate a new id.
    pub async fn insert_url(&self, short_id: &str, original_url: &str) -> AppResult<UrlRecord> {
        let now = Utc::now();

        sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (short_id, original_url, created_at, clicks, is_active)
            VALUES ($1, $2, $3, 0, TRUE)
            RETURNING *
            "#,
        )
        .bind(short_id)
        .bind(original_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::DuplicateShortId(short_id.to_string())
            }
            other => AppError::Database(other),
        })
    }

    /// Get a URL record by short id, regardless of active state
    pub async fn find_by_short_id(&self, short_id: &str) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Get an active URL record by short id (redirect and stats paths)
    pub async fn find_active_by_short_id(&self, short_id: &str) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE short_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Exact-match lookup by original URL, used for dedup before allocation
    pub async fn find_by_original_url(&self, original_url: &str) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE original_url = $1
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Check if a short id exists, active or not
    pub async fn short_id_exists(&self, short_id: &str) -> AppResult<bool> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM urls WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result > 0)
    }

    /// Atomically increment the click counter and stamp the click time.
    ///
    /// A no-op when the record no longer exists; the caller has already
    /// fetched the record, so a missing row is only a race-window concern.
    pub async fn increment_clicks(&self, short_id: &str) -> AppResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE urls
            SET clicks = clicks + 1,
                last_clicked = $1
            WHERE short_id = $2
            "#,
        )
        .bind(now)
        .bind(short_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List active URL records, most recent first
    pub async fn list_active(&self, limit: i64, offset: i64) -> AppResult<Vec<UrlRecord>> {
        let results = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    /// Count active URL records, for pagination metadata
    pub async fn count_active(&self) -> AppResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM urls WHERE is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Set the soft-delete flag. Administrative only; no HTTP endpoint
    /// exposes this operation.
    pub async fn set_active(&self, short_id: &str, active: bool) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE urls SET is_active = $1 WHERE short_id = $2
            "#,
        )
        .bind(active)
        .bind(short_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get aggregate statistics for the admin CLI
    pub async fn get_stats(&self) -> AppResult<Stats> {
        let row = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) as total_urls,
                COALESCE(CAST(SUM(clicks) AS BIGINT), 0) as total_clicks,
                COUNT(*) FILTER (WHERE is_active) as active_urls
            FROM urls
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Stats {
            total_urls: row.0,
            total_clicks: row.1,
            active_urls: row.2,
        })
    }
}

/// Aggregate statistics
#[derive(Debug)]
pub struct Stats {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub active_urls: i64,
}

impl Clone for Repository {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}
