//! # State Module
//!
//! Application state for the register.
//!
//! One type per concern, so each command takes exactly the state it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Register (lib.rs)                          │   │
//! │  │  owns one of each, hands out references to commands             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┼──────────┬──────────────┐               │
//! │     ▼              ▼         ▼          ▼              ▼                │
//! │  ┌──────────┐ ┌──────────┐ ┌────────┐ ┌────────────┐ ┌─────────────┐   │
//! │  │StoreState│ │ Session  │ │ Admin  │ │PrinterState│ │ ConfigState │   │
//! │  │          │ │  State   │ │  Gate  │ │            │ │             │   │
//! │  │ Store    │ │ Arc<     │ │ Atomic │ │ Receipt    │ │ paths,      │   │
//! │  │ (SQLite  │ │  Mutex<  │ │ Bool   │ │ Pipeline   │ │ scale,      │   │
//! │  │  pool)   │ │ Session>>│ │        │ │            │ │ quota       │   │
//! │  └──────────┘ └──────────┘ └────────┘ └────────────┘ └─────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: Store has an internal connection pool                   │
//! │  • SessionState: every mutation runs to completion under the mutex     │
//! │  • AdminGate: a single atomic flag                                     │
//! │  • PrinterState / ConfigState: read-only after startup                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod admin;
mod config;
mod printer;
mod session;
mod store;

pub use admin::AdminGate;
pub use config::ConfigState;
pub use printer::PrinterState;
pub use session::SessionState;
pub use store::StoreState;
