//! # Report Commands
//!
//! Sales report over the order ledger, order history, and clearing the
//! ledger at the end of the day.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales Report                                   19/10/2026 18:02        │
//! │  ─────────────────────────────────────────────────────────────────     │
//! │  Ahmed                     4 orders                  98.00 SAR          │
//! │  Fatima                    2 orders                  44.00 SAR          │
//! │  ─────────────────────────────────────────────────────────────────     │
//! │  TOTAL                     6 orders                 142.00 SAR          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tally_core::{DailyReport, Order};
use tally_receipt::PrintOutcome;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AdminGate, PrinterState, StoreState};

/// Builds the per-staff report from everything in the ledger.
pub async fn daily_report(store: &StoreState) -> DailyReport {
    debug!("daily_report command");

    let orders = store.inner().ledger().orders().await;
    let staff = store.inner().catalog().staff().await;
    DailyReport::from_orders(&orders, &staff, Utc::now())
}

pub async fn print_daily_report(store: &StoreState, printer: &PrinterState) -> PrintOutcome {
    debug!("print_daily_report command");

    let report = daily_report(store).await;
    let settings = store.inner().settings().settings().await;
    printer.pipeline().print_report(&report, &settings).await
}

/// Submitted orders, newest first.
pub async fn list_orders(store: &StoreState) -> Vec<Order> {
    debug!("list_orders command");

    let mut orders = store.inner().ledger().orders().await;
    orders.reverse();
    orders
}

/// Empties the ledger.
pub async fn clear_orders(store: &StoreState, admin: &AdminGate) -> Result<(), ApiError> {
    debug!("clear_orders command");
    admin.require()?;

    if store.inner().ledger().clear().await.is_persisted() {
        info!("Order ledger cleared");
    } else {
        warn!("Order ledger could not be cleared");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::{login_as, logout};
    use crate::commands::order::{add_to_order, submit_order};
    use crate::commands::test_support::register;
    use crate::error::ErrorCode;
    use crate::Register;
    use tally_core::Money;

    async fn sell(reg: &Register, staff_id: &str, product_id: &str) {
        login_as(&reg.store, &reg.session, staff_id).await.unwrap();
        add_to_order(&reg.store, &reg.session, product_id, &[]).await.unwrap();
        submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap();
        logout(&reg.session, &reg.admin);
    }

    #[tokio::test]
    async fn test_report_groups_by_staff() {
        let (reg, _) = register().await;
        sell(&reg, "w1", "p1").await;
        sell(&reg, "w2", "p4").await;
        sell(&reg, "w1", "p3").await;

        let report = daily_report(&reg.store).await;

        assert_eq!(report.order_count, 3);
        assert_eq!(report.total_amount, Money::from_major(65));
        assert_eq!(report.staff_sales.len(), 2);
        assert_eq!(report.staff_sales[0].staff_name, "Ahmed");
        assert_eq!(report.staff_sales[0].total_amount, Money::from_major(35));
        assert_eq!(report.staff_sales[0].order_count, 2);
        assert_eq!(report.staff_sales[1].staff_name, "Fatima");
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let (reg, _) = register().await;
        sell(&reg, "w1", "p1").await;
        sell(&reg, "w2", "p4").await;

        let orders = list_orders(&reg.store).await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].staff_id, "w2");
        assert!(orders[0].id > orders[1].id);
    }

    #[tokio::test]
    async fn test_print_daily_report() {
        let (reg, surface) = register().await;

        let outcome = print_daily_report(&reg.store, &reg.printer).await;

        assert!(!outcome.is_failed());
        assert!(surface.documents()[0].file_stem.starts_with("report-"));
    }

    #[tokio::test]
    async fn test_clear_orders_needs_admin() {
        let (reg, _) = register().await;
        sell(&reg, "w1", "p1").await;

        let err = clear_orders(&reg.store, &reg.admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(list_orders(&reg.store).await.len(), 1);

        reg.admin.unlock();
        clear_orders(&reg.store, &reg.admin).await.unwrap();
        assert!(daily_report(&reg.store).await.is_empty());
    }
}
