use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{AnswerVector, LikeEdge, UserId};
use crate::services::store::{AnswerStore, LikeStore, StoreError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl From<PostgresError> for StoreError {
    fn from(value: PostgresError) -> Self {
        match value {
            PostgresError::InvalidRow(message) => StoreError::Corrupt(message),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        PostgresError::from(value).into()
    }
}

/// PostgreSQL-backed answer and like store
///
/// Quiz attempts live in `quiz_answers` (one row per user) and directed likes
/// in `likes`, keyed by `(from_user_id, to_user_id)`.
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
    ) -> Result<Self, PostgresError> {
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
    ) -> Result<Self, PostgresError> {
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

fn edge_from_row(row: &PgRow) -> Result<LikeEdge, StoreError> {
    let from: String = row.try_get("from_user_id")?;
    let to: String = row.try_get("to_user_id")?;

    Ok(LikeEdge {
        from: parse_stored_id(&from)?,
        to: parse_stored_id(&to)?,
        is_match: row.try_get("is_match")?,
        created_at: row.try_get("created_at")?,
    })
}

fn parse_stored_id(raw: &str) -> Result<UserId, StoreError> {
    UserId::parse(raw).map_err(|_| PostgresError::InvalidRow(format!("bad user id {:?}", raw)).into())
}

const UPSERT_EDGE: &str = r#"
    INSERT INTO likes (from_user_id, to_user_id, is_match, created_at)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (from_user_id, to_user_id)
    DO UPDATE SET is_match = EXCLUDED.is_match
"#;

#[async_trait]
impl AnswerStore for PostgresClient {
    async fn get_answers(&self, user_id: &UserId) -> Result<AnswerVector, StoreError> {
        let query = r#"
            SELECT answers
            FROM quiz_answers
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let answers: Vec<i32> = row.try_get("answers")?;
                Ok(AnswerVector::new(answers))
            }
            None => Err(StoreError::NotFound(user_id.clone())),
        }
    }

    async fn get_all_answers_except(
        &self,
        user_id: &UserId,
    ) -> Result<HashMap<UserId, AnswerVector>, StoreError> {
        let query = r#"
            SELECT user_id, answers
            FROM quiz_answers
            WHERE user_id <> $1
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        let mut corpus = HashMap::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("user_id")?;
            let answers: Vec<i32> = row.try_get("answers")?;
            corpus.insert(parse_stored_id(&id)?, AnswerVector::new(answers));
        }

        tracing::debug!("Loaded {} answer vectors (excluding {})", corpus.len(), user_id);

        Ok(corpus)
    }

    async fn insert_answers(
        &self,
        user_id: &UserId,
        answers: &AnswerVector,
    ) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO quiz_answers (user_id, answers, submitted_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(user_id.as_str())
            .bind(answers.as_slice())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl LikeStore for PostgresClient {
    async fn get_edge(&self, from: &UserId, to: &UserId) -> Result<Option<LikeEdge>, StoreError> {
        let query = r#"
            SELECT from_user_id, to_user_id, is_match, created_at
            FROM likes
            WHERE from_user_id = $1 AND to_user_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(edge_from_row).transpose()
    }

    async fn put_edge(&self, edge: &LikeEdge) -> Result<(), StoreError> {
        sqlx::query(UPSERT_EDGE)
            .bind(edge.from.as_str())
            .bind(edge.to.as_str())
            .bind(edge.is_match)
            .bind(edge.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_edge_if_absent(&self, edge: &LikeEdge) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO likes (from_user_id, to_user_id, is_match, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (from_user_id, to_user_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(edge.from.as_str())
            .bind(edge.to.as_str())
            .bind(edge.is_match)
            .bind(edge.created_at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Both upserts share one transaction; dropping it on error rolls back
    async fn put_edge_pair(&self, first: &LikeEdge, second: &LikeEdge) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for edge in [first, second] {
            sqlx::query(UPSERT_EDGE)
                .bind(edge.from.as_str())
                .bind(edge.to.as_str())
                .bind(edge.is_match)
                .bind(edge.created_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Persisted edge pair: {} -> {} and {} -> {}",
            first.from,
            first.to,
            second.from,
            second.to
        );

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        AnswerStore::health_check(self).await
    }
}
