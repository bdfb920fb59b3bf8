//! Mock store implementation for testing.
//!
//! In-memory, deterministic, with failure injection for exercising the
//! store-write-failure path without a database.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{CoreError, Result},
    storage::SignupStore,
};

/// In-memory signup store mirroring the write-once semantics of the
/// Postgres implementation.
#[derive(Debug, Default, Clone)]
pub struct MemorySignupStore {
    entries: Arc<RwLock<BTreeMap<String, serde_json::Value>>>,
    put_error: Arc<RwLock<Option<String>>>,
    health_error: Arc<RwLock<Option<String>>>,
}

impl MemorySignupStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects an error for the next `put` call.
    pub async fn inject_put_error(&self, error: impl Into<String>) {
        *self.put_error.write().await = Some(error.into());
    }

    /// Injects an error for the next `health_check` call.
    pub async fn inject_health_error(&self, error: impl Into<String>) {
        *self.health_error.write().await = Some(error.into());
    }

    /// Returns a snapshot of all stored entries, ordered by key.
    pub async fn entries(&self) -> BTreeMap<String, serde_json::Value> {
        self.entries.read().await.clone()
    }

    /// Returns the number of stored entries.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SignupStore for MemorySignupStore {
    async fn put(&self, key: &str, value: serde_json::Value) -> Result<()> {
        if let Some(error) = self.put_error.write().await.take() {
            return Err(CoreError::Database(error));
        }

        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            return Err(CoreError::ConstraintViolation(format!("duplicate key: {key}")));
        }
        entries.insert(key.to_string(), value);

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        if let Some(error) = self.health_error.write().await.take() {
            return Err(CoreError::Database(error));
        }
        Ok(())
    }
}
