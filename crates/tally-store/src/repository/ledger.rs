//! # Order Ledger
//!
//! Upsert collection of finalized orders keyed by order id.
//!
//! ```text
//! save_order(o):
//!   orders = load("orders") or []
//!   if orders has id == o.id  → replace in place
//!   else                      → append
//!   write orders
//! ```

use tally_core::Order;
use tracing::{debug, info};

use crate::documents::{DocumentKey, DocumentStore, WriteOutcome};

#[derive(Debug, Clone)]
pub struct OrderLedger {
    docs: DocumentStore,
}

impl OrderLedger {
    pub fn new(docs: DocumentStore) -> Self {
        OrderLedger { docs }
    }

    /// All finalized orders in insertion order.
    pub async fn orders(&self) -> Vec<Order> {
        self.docs.load(DocumentKey::Orders, Vec::new).await
    }

    /// Inserts or replaces `order` by id.
    pub async fn save_order(&self, order: &Order) -> WriteOutcome {
        let mut orders = self.orders().await;

        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                debug!(order_id = %order.id, "Replacing ledger entry");
                *existing = order.clone();
            }
            None => orders.push(order.clone()),
        }

        let outcome = self.docs.save(DocumentKey::Orders, &orders).await;
        if outcome.is_persisted() {
            info!(
                order_id = %order.id,
                total = %order.total_amount,
                ledger_len = orders.len(),
                "Order saved to ledger"
            );
        }
        outcome
    }

    /// Replaces the whole ledger.
    pub async fn set_orders(&self, orders: &[Order]) -> WriteOutcome {
        self.docs.save(DocumentKey::Orders, orders).await
    }

    /// Empties the ledger.
    pub async fn clear(&self) -> WriteOutcome {
        info!("Clearing order ledger");
        self.docs.save(DocumentKey::Orders, &Vec::<Order>::new()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
