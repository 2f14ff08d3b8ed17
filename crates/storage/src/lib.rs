use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    FromRow, PgPool,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use idpage_core::types::ExampleRecord;

/// Upper bound on waiting for a pooled connection before a query fails.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Row types that can be returned from [`QueryExecutor::query_raw`].
///
/// Rows decode from PostgreSQL through sqlx and from JSON through serde, so
/// substitute executors can hand back the same types without a database.
pub trait RawRow: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin + 'static {}

impl<T> RawRow for T where
    T: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin + 'static
{
}

/// Capability to issue a raw, parameterless query and receive typed rows.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn query_raw<T: RawRow>(&self, sql: &str) -> Result<Vec<T>, QueryError>;
}

/// Raised when the query cannot complete: the pool is unavailable, the server
/// rejects the statement, or the rows fail to decode.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Top-level database handle that owns the PostgreSQL connection pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Establishes a new connection pool and verifies one connection eagerly.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = pool_options(max_connections)
            .connect(database_url)
            .await
            .map_err(StorageError::Connect)?;

        debug!(stage = "storage", max_connections, "postgres pool connected");
        Ok(Self { pool })
    }

    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = pool_options(max_connections)
            .connect_lazy(database_url)
            .map_err(StorageError::Connect)?;
        Ok(Self { pool })
    }
}

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
}

#[async_trait]
impl QueryExecutor for Database {
    async fn query_raw<T: RawRow>(&self, sql: &str) -> Result<Vec<T>, QueryError> {
        let rows = sqlx::query_as::<_, T>(sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to postgres: {0}")]
    Connect(sqlx::Error),
}

/// Row shape of the example query: one `uuid` column named `id`.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct ExampleRow {
    pub id: Uuid,
}

impl ExampleRow {
    pub fn into_domain(self) -> ExampleRecord {
        ExampleRecord {
            id: self.id.to_string(),
        }
    }
}
