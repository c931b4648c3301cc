//! # Store Handle
//!
//! Connection pool creation plus access to the three record stores.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store                                                                  │
//! │   ├── pool: SqlitePool  (WAL, one writer)                               │
//! │   │                                                                     │
//! │   ├── catalog()  ──► CatalogStore   products, staff                     │
//! │   ├── ledger()   ──► OrderLedger    orders                              │
//! │   ├── settings() ──► SettingsStore  settings                            │
//! │   └── documents()──► DocumentStore  raw key/value access                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every accessor is a cheap clone of the pool and the session cache; hand
//! them out freely.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::documents::{DocumentCache, DocumentKey, DocumentStore, WriteOutcome};
use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::catalog::CatalogStore;
use crate::repository::ledger::OrderLedger;
use crate::repository::settings::SettingsStore;

/// Default per-document size cap (5 MiB), matching a browser-style storage quota.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/tally.db")
///     .max_document_bytes(Some(1024 * 1024));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Largest serialized document a write may store; `None` disables the cap.
    /// Default: [`DEFAULT_MAX_DOCUMENT_BYTES`]
    pub max_document_bytes: Option<usize>,
}

impl StoreConfig {
    /// Creates a configuration for the database file at `path`.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            max_document_bytes: Some(DEFAULT_MAX_DOCUMENT_BYTES),
        }
    }

    /// Sets the per-document size cap.
    pub fn max_document_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let store = Store::new(StoreConfig::in_memory()).await?;
    /// // Isolated, gone when the pool closes
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            max_document_bytes: Some(DEFAULT_MAX_DOCUMENT_BYTES),
        }
    }

    /// True when this configuration points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main storage handle providing repository access.
#[derive(Debug, Clone)]
pub struct Store {
    /// The SQLite connection pool.
    pool: SqlitePool,
    max_document_bytes: Option<usize>,
    /// Shared by every handle cloned from this store.
    cache: DocumentCache,
}

impl Store {
    /// Opens the database and prepares the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL journal, NORMAL synchronous
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// This is the only storage call whose failure reaches the caller.
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening document store"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                // Readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                // May lose the last write on power loss, never corrupts
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            max_document_bytes = ?config.max_document_bytes,
            "Store pool created"
        );

        let store = Store {
            pool,
            max_document_bytes: config.max_document_bytes,
            cache: DocumentCache::default(),
        };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw document access.
    pub fn documents(&self) -> DocumentStore {
        DocumentStore::new(self.pool.clone(), self.max_document_bytes, self.cache.clone())
    }

    /// Products and staff.
    pub fn catalog(&self) -> CatalogStore {
        CatalogStore::new(self.documents())
    }

    /// Finalized orders.
    pub fn ledger(&self) -> OrderLedger {
        OrderLedger::new(self.documents())
    }

    /// The settings record.
    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.documents())
    }

    /// Removes all four records; every subsequent read yields seed defaults.
    pub async fn clear_all_data(&self) -> WriteOutcome {
        warn!("Clearing all stored data");

        let docs = self.documents();
        let mut outcome = WriteOutcome::Persisted;
        for key in DocumentKey::ALL {
            outcome = outcome.and(docs.discard(key).await);
        }
        outcome
    }

    /// Closes the connection pool.
    ///
    /// Afterwards writes are dropped. Reads return what this store already
    /// holds in its session cache, or defaults.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is responsive.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
