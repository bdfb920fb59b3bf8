//! Storage abstraction for the write-only signup store.
//!
//! The service only ever writes: one JSON value per signup, under a key
//! derived from the signup itself. The trait keeps handlers independent of
//! the backing store, so production uses Postgres while tests run against
//! the in-memory mock without database overhead.

use async_trait::async_trait;

use crate::error::Result;

pub mod mock;
pub mod postgres;

pub use postgres::PostgresSignupStore;

/// Write-only key-value store for signup records.
///
/// Keys are opaque strings; values are JSON documents. Writes are
/// write-once: putting an existing key is a constraint violation, which is
/// how same-millisecond duplicate submissions of the same address surface.
#[async_trait]
pub trait SignupStore: Send + Sync + std::fmt::Debug {
    /// Writes one JSON value under the given key.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConstraintViolation` if the key already exists,
    /// or `CoreError::Database` on any other storage failure.
    async fn put(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Verifies the store is reachable. Used by readiness probes.
    async fn health_check(&self) -> Result<()>;
}
