//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresSavedQueryStore`, backed by a `saved_queries` table via
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! saved-queries = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! `(user_id, name)` carries a unique constraint; a violation on insert is
//! reported as [`StoreError::DuplicateName`]. Every round-trip is bounded by
//! the configured store timeout.

use crate::core::field::FieldValue;
use crate::core::query::{ListQuery, SqlStatement};
use crate::core::resource::{OwnerId, SavedQuery};
use crate::core::store::{SavedQueryStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::{QueryAs, QueryScalar};
use std::future::Future;
use std::time::Duration;

const COLUMNS: &str = "id, user_id, name, query, created_at, updated_at";

/// Apply the required table and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS saved_queries (
            id BIGSERIAL PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            query TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT saved_queries_user_id_name_key UNIQUE (user_id, name)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::backend("create saved_queries table", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_saved_queries_user_id ON saved_queries (user_id)")
        .execute(pool)
        .await
        .map_err(|e| StoreError::backend("create saved_queries index", e))?;

    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct SavedQueryRow {
    id: i64,
    user_id: String,
    name: String,
    query: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SavedQueryRow> for SavedQuery {
    type Error = StoreError;

    fn try_from(row: SavedQueryRow) -> Result<Self, Self::Error> {
        let user_id = OwnerId::parse(&row.user_id)
            .map_err(|e| StoreError::backend("decode saved query owner", e))?;

        Ok(SavedQuery {
            id: row.id,
            user_id,
            name: row.name,
            query: row.query,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn bind_rows<'q>(
    mut query: QueryAs<'q, sqlx::Postgres, SavedQueryRow, PgArguments>,
    params: &'q [FieldValue],
) -> QueryAs<'q, sqlx::Postgres, SavedQueryRow, PgArguments> {
    for param in params {
        query = match param {
            FieldValue::String(s) => query.bind(s.as_str()),
            FieldValue::Integer(i) => query.bind(*i),
            FieldValue::DateTime(dt) => query.bind(*dt),
        };
    }
    query
}

fn bind_scalar<'q>(
    mut query: QueryScalar<'q, sqlx::Postgres, i64, PgArguments>,
    params: &'q [FieldValue],
) -> QueryScalar<'q, sqlx::Postgres, i64, PgArguments> {
    for param in params {
        query = match param {
            FieldValue::String(s) => query.bind(s.as_str()),
            FieldValue::Integer(i) => query.bind(*i),
            FieldValue::DateTime(dt) => query.bind(*dt),
        };
    }
    query
}

/// Saved query store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let store = PostgresSavedQueryStore::connect(&url, Duration::from_secs(5)).await?;
/// store.migrate().await?;
/// let saved = store.create(&owner, "alpha", "MATCH (n) RETURN n").await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresSavedQueryStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresSavedQueryStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Connect a fresh pool
    pub async fn connect(database_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let pool = tokio::time::timeout(
            timeout,
            PgPoolOptions::new().max_connections(8).connect(database_url),
        )
        .await
        .map_err(|_| StoreError::Timeout { operation: "connect" })?
        .map_err(|e| StoreError::backend("connect", e))?;

        Ok(Self::new(pool, timeout))
    }

    /// Create the table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.bounded("migrate", ensure_schema(&self.pool)).await?
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one store round-trip under the configured timeout
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout { operation })
    }

    async fn fetch_page(&self, statement: &SqlStatement) -> Result<Vec<SavedQuery>, StoreError> {
        let query = bind_rows(
            sqlx::query_as::<_, SavedQueryRow>(&statement.text),
            &statement.params,
        );

        self.bounded("list saved queries", query.fetch_all(&self.pool))
            .await?
            .map_err(|e| StoreError::backend("list saved queries", e))?
            .into_iter()
            .map(SavedQuery::try_from)
            .collect()
    }

    async fn fetch_count(&self, statement: &SqlStatement) -> Result<u64, StoreError> {
        let query = bind_scalar(
            sqlx::query_scalar::<_, i64>(&statement.text),
            &statement.params,
        );

        let count = self
            .bounded("count saved queries", query.fetch_one(&self.pool))
            .await?
            .map_err(|e| StoreError::backend("count saved queries", e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl SavedQueryStore for PostgresSavedQueryStore {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<SavedQuery>, u64), StoreError> {
        let count = self.fetch_count(&query.count_statement()).await?;
        let rows = self.fetch_page(&query.select_statement(COLUMNS)).await?;
        Ok((rows, count))
    }

    async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        query: &str,
    ) -> Result<SavedQuery, StoreError> {
        let insert = sqlx::query_as::<_, SavedQueryRow>(
            "INSERT INTO saved_queries (user_id, name, query, created_at, updated_at) \
             VALUES ($1, $2, $3, now(), now()) \
             RETURNING id, user_id, name, query, created_at, updated_at",
        )
        .bind(owner.to_string())
        .bind(name)
        .bind(query);

        let row = self
            .bounded("create saved query", insert.fetch_one(&self.pool))
            .await?
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return StoreError::DuplicateName;
                    }
                }
                StoreError::backend("create saved query", e)
            })?;

        SavedQuery::try_from(row)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = self
            .bounded(
                "delete saved query",
                sqlx::query("DELETE FROM saved_queries WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?
            .map_err(|e| StoreError::backend("delete saved query", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn lookup(&self, id: i64) -> Result<SavedQuery, StoreError> {
        let lookup = sqlx::query_as::<_, SavedQueryRow>(
            "SELECT id, user_id, name, query, created_at, updated_at \
             FROM saved_queries WHERE id = $1",
        )
        .bind(id);

        self.bounded("look up saved query", lookup.fetch_optional(&self.pool))
            .await?
            .map_err(|e| StoreError::backend("look up saved query", e))?
            .ok_or(StoreError::NotFound)
            .and_then(SavedQuery::try_from)
    }
}
