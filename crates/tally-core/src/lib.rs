//! # tally-core: Pure Business Logic for Tally POS
//!
//! Everything the register decides without touching a disk, a screen or a
//! printer: money, catalog and order types, pricing, the order session state
//! machine and the sales report.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (terminal / external UI)                 │   │
//! │  │    Login ──► Product grid ──► Order panel ──► Submit / Report   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Register commands                            │   │
//! │  │    login_with_code, add_to_order, submit_order, daily_report    │   │
//! │  └──────────┬──────────────────┬──────────────────────┬────────────┘   │
//! │             │                  │                      │                 │
//! │  ┌──────────▼──────────┐ ┌─────▼──────────────┐ ┌─────▼────────────┐   │
//! │  │ ★ tally-core ★      │ │   tally-store      │ │  tally-receipt   │   │
//! │  │  types  pricing     │ │  catalog, ledger,  │ │  layout, raster, │   │
//! │  │  session  report    │ │  settings (SQLite) │ │  pdf, dispatch   │   │
//! │  │  NO I/O             │ │                    │ │                  │   │
//! │  └─────────────────────┘ └────────────────────┘ └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Staff, Order, Settings)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Item and order totals
//! - [`session`] - The order session state machine
//! - [`report`] - Sales aggregation per staff member
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{AddonCategory, AddonOption, AddonSelection, Money, OrderSession, Product, Staff, StaffRole};
//!
//! let latte = Product::new("p2", "Latte", Money::from_major(22)).with_addon_category(AddonCategory {
//!     id: "size".into(),
//!     name: "Size".into(),
//!     is_single_select: true,
//!     options: vec![AddonOption { id: "large".into(), name: "Large".into(), price_adjustment: Money::from_major(5) }],
//! });
//!
//! let mut session = OrderSession::new();
//! session.login(Staff { id: "w1".into(), name: "Ahmed".into(), access_code: "1111".into(), role: StaffRole::Staff }).unwrap();
//! let row = session.add_item(&latte, &[AddonSelection::new("size", "large")]).unwrap();
//! session.update_quantity(row, 2).unwrap();
//!
//! assert_eq!(session.current_order().unwrap().total_amount, Money::from_major(54));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{DailyReport, StaffSales};
pub use session::{AddonSelection, OrderIdGenerator, OrderSession, SessionPhase};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every order id; the remainder is printed as the order number.
pub const ORDER_ID_PREFIX: &str = "ORD-";

/// Length of a staff access code (and the admin code).
pub const ACCESS_CODE_LEN: usize = 4;
