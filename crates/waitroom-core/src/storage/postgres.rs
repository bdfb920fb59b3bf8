//! Postgres-backed signup store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{error::Result, storage::SignupStore};

/// Production store writing signup records into the `waitlist_entries`
/// table.
///
/// The table is `(key TEXT PRIMARY KEY, value JSONB, created_at)`; the
/// primary key enforces the write-once semantics. Concurrent independent
/// writes need no handler-side coordination beyond the pool.
#[derive(Debug, Clone)]
pub struct PostgresSignupStore {
    pool: PgPool,
}

impl PostgresSignupStore {
    /// Creates a new store backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SignupStore for PostgresSignupStore {
    async fn put(&self, key: &str, value: serde_json::Value) -> Result<()> {
        sqlx::query("INSERT INTO waitlist_entries (key, value) VALUES ($1, $2)")
            .bind(key)
            .bind(&value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;

        Ok(())
    }
}
