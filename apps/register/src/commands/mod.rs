//! # Commands Module
//!
//! Everything the front end can ask the register to do.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Register Commands                                 │
//! │                                                                         │
//! │  auth.rs        login_candidates, login_with_code, login_as, logout,   │
//! │                 unlock_admin, lock_admin                                │
//! │  order.rs       get_order, add_to_order, update_item_quantity,          │
//! │                 remove_item, submit_order, print_current_order          │
//! │  catalog.rs     list/save/delete products and staff       (admin gate)  │
//! │  settings.rs    get_settings, save_settings, reset_all_data (admin gate)│
//! │  report.rs      daily_report, print_daily_report, list_orders,          │
//! │                 clear_orders                              (admin gate)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state types it touches and returns
//! `Result<_, ApiError>` when it can fail. Reads from the store never fail;
//! prints report a `PrintOutcome` instead of an error.

pub mod auth;
pub mod catalog;
pub mod order;
pub mod report;
pub mod settings;

use serde::Serialize;
use tally_core::{Order, OrderSession, SessionPhase, Staff};

/// The session as the front end sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub phase: SessionPhase,
    pub staff: Option<Staff>,
    pub order: Option<Order>,
}

impl From<&OrderSession> for OrderResponse {
    fn from(session: &OrderSession) -> Self {
        OrderResponse {
            phase: session.phase(),
            staff: session.current_staff().cloned(),
            order: session.current_order().cloned(),
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================
