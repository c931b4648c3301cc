//! # Document Store
//!
//! Key → JSON text mapping on top of the `documents` table, fronted by a
//! session cache shared by every handle cloned from one [`Store`](crate::Store).
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load(key, default)                                                     │
//! │    cached ──────────────────► cached value (or default if discarded)    │
//! │    row missing ─────────────► default            (debug!)               │
//! │    row present, bad JSON ───► default            (warn!)                │
//! │    query failed ────────────► default            (error!)               │
//! │                                                                         │
//! │  save(key, value)            cache updated first, then                  │
//! │    written ─────────────────► WriteOutcome::Persisted                   │
//! │    over quota ──────────────► WriteOutcome::Dropped   (error!)          │
//! │    query failed ────────────► WriteOutcome::Dropped   (error!)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A dropped write is still visible to every later read of this process;
//! only a restart loses it.
//!
//! The raw `get_raw` / `put_raw` / `remove` calls do surface [`StoreError`]
//! and go straight to SQLite. A raw write evicts the cached entry so the next
//! `load` sees it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Keys
// =============================================================================

/// The four named records of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Products,
    Staff,
    Orders,
    Settings,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 4] = [
        DocumentKey::Products,
        DocumentKey::Staff,
        DocumentKey::Orders,
        DocumentKey::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::Products => "products",
            DocumentKey::Staff => "staff",
            DocumentKey::Orders => "orders",
            DocumentKey::Settings => "settings",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Write Outcome
// =============================================================================

/// Whether a write reached the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Persisted,
    /// The write never reached the database and was logged. Reads in this
    /// process still see the new value; the database keeps the old one.
    Dropped,
}

impl WriteOutcome {
    #[inline]
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteOutcome::Persisted)
    }

    /// Persisted only if both are.
    pub fn and(self, other: WriteOutcome) -> WriteOutcome {
        if self.is_persisted() && other.is_persisted() {
            WriteOutcome::Persisted
        } else {
            WriteOutcome::Dropped
        }
    }
}

// =============================================================================
// Session Cache
// =============================================================================

/// JSON text per key as this process last saw or wrote it.
///
/// A `None` entry marks a key that is absent or was discarded in this
/// session: reads yield the caller's default without asking SQLite.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocumentCache {
    entries: Arc<RwLock<HashMap<DocumentKey, Option<String>>>>,
}

impl DocumentCache {
    async fn get(&self, key: DocumentKey) -> Option<Option<String>> {
        self.entries.read().await.get(&key).cloned()
    }

    async fn set(&self, key: DocumentKey, json: Option<String>) {
        self.entries.write().await.insert(key, json);
    }

    async fn evict(&self, key: DocumentKey) {
        self.entries.write().await.remove(&key);
    }
}

// =============================================================================
// Document Store
// =============================================================================

/// Handle to the `documents` table.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    max_document_bytes: Option<usize>,
    cache: DocumentCache,
}

impl DocumentStore {
    /// Creates a new DocumentStore.
    ///
    /// `max_document_bytes` caps a single serialized document; `None`
    /// disables the check.
    pub(crate) fn new(
        pool: SqlitePool,
        max_document_bytes: Option<usize>,
        cache: DocumentCache,
    ) -> Self {
        DocumentStore {
            pool,
            max_document_bytes,
            cache,
        }
    }

    // -------------------------------------------------------------------------
    // Raw access
    // -------------------------------------------------------------------------

    /// Reads the raw JSON text stored under `key`.
    pub async fn get_raw(&self, key: DocumentKey) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM documents WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Writes raw JSON text under `key`, replacing any previous value.
    pub async fn put_raw(&self, key: DocumentKey, value: &str) -> StoreResult<()> {
        self.write_row(key, value).await?;
        self.cache.evict(key).await;
        Ok(())
    }

    /// Deletes the document under `key`. Missing keys are not an error.
    pub async fn remove(&self, key: DocumentKey) -> StoreResult<()> {
        self.delete_row(key).await?;
        self.cache.evict(key).await;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Typed, failure-masking access
    // -------------------------------------------------------------------------

    /// Reads and decodes `key`, falling back to `default()` on any failure.
    pub async fn load<T, F>(&self, key: DocumentKey, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.cache.get(key).await {
            return match cached {
                Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                    warn!(key = %key, error = %e, "Cached document has another shape, using defaults");
                    default()
                }),
                None => default(),
            };
        }

        match self.try_load(key).await {
            Ok(Some((value, json))) => {
                self.cache.set(key, Some(json)).await;
                value
            }
            Ok(None) => {
                debug!(key = %key, "Document absent, using defaults");
                self.cache.set(key, None).await;
                default()
            }
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!(key = %key, error = %err, "Stored document unreadable, using defaults");
                default()
            }
            Err(err) => {
                error!(key = %key, error = %err, "Document read failed, using defaults");
                default()
            }
        }
    }

    /// Encodes `value`, makes it the session's copy of `key`, then writes it
    /// to SQLite. A failed write is logged and dropped.
    pub async fn save<T>(&self, key: DocumentKey, value: &T) -> WriteOutcome
    where
        T: Serialize + ?Sized,
    {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                error!(key = %key, error = %err, "Document could not be encoded");
                return WriteOutcome::Dropped;
            }
        };

        self.cache.set(key, Some(json.clone())).await;

        match self.write_row(key, &json).await {
            Ok(()) => {
                debug!(key = %key, "Document persisted");
                WriteOutcome::Persisted
            }
            Err(err) => {
                error!(key = %key, error = %err, "Document write dropped, kept for this session");
                WriteOutcome::Dropped
            }
        }
    }

    /// Deletes `key`; later reads in this session yield defaults even if the
    /// delete is dropped.
    pub async fn discard(&self, key: DocumentKey) -> WriteOutcome {
        self.cache.set(key, None).await;

        match self.delete_row(key).await {
            Ok(()) => WriteOutcome::Persisted,
            Err(err) => {
                error!(key = %key, error = %err, "Document delete dropped");
                WriteOutcome::Dropped
            }
        }
    }

    // -------------------------------------------------------------------------
    // SQLite
    // -------------------------------------------------------------------------

    async fn write_row(&self, key: DocumentKey, value: &str) -> StoreResult<()> {
        if let Some(limit) = self.max_document_bytes {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    limit,
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO documents (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_row(&self, key: DocumentKey) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Decoded value plus the text it came from.
    async fn try_load<T: DeserializeOwned>(&self, key: DocumentKey) -> StoreResult<Option<(T, String)>> {
        match self.get_raw(key).await? {
            Some(raw) => {
                let value =
                    serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(key.as_str(), e))?;
                Ok(Some((value, raw)))
            }
            None => Ok(None),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn store_with_quota(limit: Option<usize>) -> DocumentStore {
        let store = Store::new(StoreConfig::in_memory().max_document_bytes(limit))
            .await
            .unwrap();
        store.documents()
    }

    async fn file_store(path: &std::path::Path, limit: Option<usize>) -> Store {
        Store::new(StoreConfig::new(path).max_document_bytes(limit))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_absent_key_yields_default() {
        let docs = store_with_quota(None).await;
        let value: Vec<String> = docs.load(DocumentKey::Staff, || vec!["seed".to_string()]).await;
        assert_eq!(value, vec!["seed".to_string()]);
    }

    #[tokio::test]
    async fn test_roundtrip_and_overwrite() {
        let docs = store_with_quota(None).await;

        assert!(docs.save(DocumentKey::Orders, &vec![1, 2]).await.is_persisted());
        assert!(docs.save(DocumentKey::Orders, &vec![3]).await.is_persisted());

        let value: Vec<i32> = docs.load(DocumentKey::Orders, Vec::new).await;
        assert_eq!(value, vec![3]);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_masked() {
        let docs = store_with_quota(None).await;
        docs.put_raw(DocumentKey::Products, "{not json").await.unwrap();

        let value: Vec<i32> = docs.load(DocumentKey::Products, || vec![42]).await;
        assert_eq!(value, vec![42]);

        // The corrupt text is left in place until the next write.
        let raw = docs.get_raw(DocumentKey::Products).await.unwrap();
        assert_eq!(raw.as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_masked() {
        let docs = store_with_quota(None).await;
        docs.put_raw(DocumentKey::Orders, r#"{"orders":"nope"}"#).await.unwrap();

        let value: Vec<i32> = docs.load(DocumentKey::Orders, Vec::new).await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_over_quota_write_lives_for_the_session_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");

        let store = file_store(&path, Some(16)).await;
        let docs = store.documents();
        assert!(docs.save(DocumentKey::Staff, &"short").await.is_persisted());

        let long = "x".repeat(64);
        let outcome = docs.save(DocumentKey::Staff, &long).await;
        assert_eq!(outcome, WriteOutcome::Dropped);

        // Every handle of this store sees the new value.
        let value: String = store.documents().load(DocumentKey::Staff, String::new).await;
        assert_eq!(value, long);
        let raw = docs.get_raw(DocumentKey::Staff).await.unwrap();
        assert_eq!(raw.as_deref(), Some(r#""short""#));
        store.close().await;

        let reopened = file_store(&path, Some(16)).await;
        let value: String = reopened.documents().load(DocumentKey::Staff, String::new).await;
        assert_eq!(value, "short");
    }

    #[tokio::test]
    async fn test_raw_write_evicts_cached_value() {
        let docs = store_with_quota(None).await;
        assert!(docs.save(DocumentKey::Orders, &vec![1]).await.is_persisted());
        let _: Vec<i32> = docs.load(DocumentKey::Orders, Vec::new).await;

        docs.put_raw(DocumentKey::Orders, "[2]").await.unwrap();
        let value: Vec<i32> = docs.load(DocumentKey::Orders, Vec::new).await;
        assert_eq!(value, vec![2]);
    }

    #[tokio::test]
    async fn test_dropped_discard_still_yields_default() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let docs = store.documents();
        docs.save(DocumentKey::Settings, &7).await;
        store.close().await;

        assert_eq!(docs.discard(DocumentKey::Settings).await, WriteOutcome::Dropped);
        let value: i32 = docs.load(DocumentKey::Settings, || 0).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_remove_then_default() {
        let docs = store_with_quota(None).await;
        docs.save(DocumentKey::Settings, &7).await;
        assert!(docs.discard(DocumentKey::Settings).await.is_persisted());
        assert!(docs.discard(DocumentKey::Settings).await.is_persisted());

        let value: i32 = docs.load(DocumentKey::Settings, || 0).await;
        assert_eq!(value, 0);
    }

    #[test]
    fn test_write_outcome_and() {
        use WriteOutcome::*;
        assert_eq!(Persisted.and(Persisted), Persisted);
        assert_eq!(Persisted.and(Dropped), Dropped);
        assert_eq!(Dropped.and(Persisted), Dropped);
    }
}
