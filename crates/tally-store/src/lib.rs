//! # tally-store: Persistence Layer for Tally POS
//!
//! Local document storage for the register: the product catalog, the staff
//! roster, the order ledger and the settings record, each kept as one JSON
//! document in SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Data Flow                              │
//! │                                                                         │
//! │  Register command (submit_order)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tally-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ CatalogStore  │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ OrderLedger   │    │ 001_docs.sql │  │   │
//! │  │   │ SqlitePool    │    │ SettingsStore │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ DocumentStore (mask failures)  │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite  documents(key, value)   products|staff|orders|settings│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Masking
//!
//! Reads never fail: a missing, corrupt or unreachable record yields the
//! seed default. Writes never fail: a rejected write is logged and reported
//! as [`WriteOutcome::Dropped`].
//!
//! Every record read or written is held in a session cache shared by all
//! clones of a [`Store`]. Reads are served from it, so a dropped write is
//! still what the rest of this process sees until the next restart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/tally.db")).await?;
//! let products = store.catalog().products().await;
//! store.ledger().save_order(&order).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod documents;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use documents::{DocumentKey, DocumentStore, WriteOutcome};
pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig, DEFAULT_MAX_DOCUMENT_BYTES};

pub use repository::catalog::CatalogStore;
pub use repository::ledger::OrderLedger;
pub use repository::settings::SettingsStore;
