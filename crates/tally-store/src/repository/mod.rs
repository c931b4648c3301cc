//! # Repository Module
//!
//! Typed stores over the document table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register command                                                       │
//! │       │                                                                 │
//! │       │  store.ledger().save_order(&order)                              │
//! │       ▼                                                                 │
//! │  OrderLedger                                                            │
//! │  ├── orders()          load "orders" or []                              │
//! │  ├── save_order(o)     upsert by id, write whole array                  │
//! │  └── clear()                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DocumentStore  ──►  documents(key, value)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogStore`](catalog::CatalogStore) - Products and staff
//! - [`OrderLedger`](ledger::OrderLedger) - Finalized orders
//! - [`SettingsStore`](settings::SettingsStore) - The settings record

pub mod catalog;
pub mod ledger;
pub mod settings;
