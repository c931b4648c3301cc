//! # Order Commands
//!
//! Building, submitting and printing the in-progress order.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login ──► ┌──────────────┐ add_to_order ┌────────────────┐             │
//! │            │ ActiveEmpty  │─────────────►│ ActiveNonEmpty │◄──┐         │
//! │            └──────────────┘◄─────────────└────────────────┘   │         │
//! │                   ▲          remove_item        │  update_item_quantity │
//! │                   │          (last line)        │  remove_item ─────────┘
//! │                   │                             │                       │
//! │                   └──────── submit_order ◄──────┘                       │
//! │                    (persist, maybe print, fresh order for same staff)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tally_core::{AddonSelection, CoreError, Order};
use tally_receipt::PrintOutcome;
use tracing::{debug, info, warn};

use crate::commands::OrderResponse;
use crate::error::ApiError;
use crate::state::{PrinterState, SessionState, StoreState};

/// Result of submitting an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// The submitted order as written to the ledger
    pub order: Order,

    /// False when the ledger write was dropped (see the log)
    pub persisted: bool,

    /// Receipt outcome; `None` when auto-print is off
    pub print: Option<PrintOutcome>,
}

/// Gets the current session and order.
pub fn get_order(session: &SessionState) -> OrderResponse {
    debug!("get_order command");
    session.with_session(|s| OrderResponse::from(s))
}

/// Adds a product with the chosen addons to the current order.
///
/// ## Behavior
/// - Product without addon categories already in the order: quantity + 1
/// - Anything else: new line with quantity 1
/// - Name, price and addon choices are copied into the line
pub async fn add_to_order(
    store: &StoreState,
    session: &SessionState,
    product_id: &str,
    selections: &[AddonSelection],
) -> Result<OrderResponse, ApiError> {
    debug!(product_id = %product_id, selections = selections.len(), "add_to_order command");

    let product = store
        .inner()
        .catalog()
        .product(product_id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let response = session.with_session_mut(|s| {
        s.add_item(&product, selections)?;
        Ok::<_, CoreError>(OrderResponse::from(&*s))
    })?;

    Ok(response)
}

/// Sets the quantity of an order line. Zero is rejected; use `remove_item`.
pub fn update_item_quantity(
    session: &SessionState,
    index: usize,
    quantity: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(index, quantity, "update_item_quantity command");

    let response = session.with_session_mut(|s| {
        s.update_quantity(index, quantity)?;
        Ok::<_, CoreError>(OrderResponse::from(&*s))
    })?;

    Ok(response)
}

/// Removes an order line; later lines shift down by one.
pub fn remove_item(session: &SessionState, index: usize) -> Result<OrderResponse, ApiError> {
    debug!(index, "remove_item command");

    let response = session.with_session_mut(|s| {
        let removed = s.remove_item(index)?;
        debug!(product_id = %removed.product_id, "Order line removed");
        Ok::<_, CoreError>(OrderResponse::from(&*s))
    })?;

    Ok(response)
}

/// Submits the current order.
///
/// ## Steps
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. session.submit()      snapshot flagged is_printed, fresh order     │
/// │                           installed for the same staff (one lock)      │
/// │  2. ledger.save_order()   exactly one ledger entry                     │
/// │  3. auto_print?           print the snapshot; a failed print is        │
/// │                           reported, the ledger entry stays             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// An empty order fails with `EmptyOrder` and changes nothing.
pub async fn submit_order(
    store: &StoreState,
    session: &SessionState,
    printer: &PrinterState,
) -> Result<SubmitResponse, ApiError> {
    debug!("submit_order command");

    let order = session.with_session_mut(|s| s.submit())?;

    let persisted = store.inner().ledger().save_order(&order).await.is_persisted();
    if !persisted {
        warn!(order_id = %order.id, "Submitted order was not persisted");
    }

    let settings = store.inner().settings().settings().await;
    let print = if settings.auto_print {
        Some(printer.pipeline().print_receipt(&order, &settings).await)
    } else {
        None
    };

    info!(
        order_id = %order.id,
        staff_id = %order.staff_id,
        items = order.item_count(),
        total = %order.total_amount,
        "Order submitted"
    );

    Ok(SubmitResponse {
        order,
        persisted,
        print,
    })
}

/// Prints the current order without submitting it.
pub async fn print_current_order(
    store: &StoreState,
    session: &SessionState,
    printer: &PrinterState,
) -> Result<PrintOutcome, ApiError> {
    debug!("print_current_order command");

    let order = session
        .with_session(|s| s.current_order().cloned())
        .ok_or(CoreError::NoActiveOrder)?;
    if order.is_empty() {
        return Err(CoreError::EmptyOrder.into());
    }

    let settings = store.inner().settings().settings().await;
    Ok(printer.pipeline().print_receipt(&order, &settings).await)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::login_as;
    use crate::commands::catalog::save_product;
    use crate::commands::report::daily_report;
    use crate::commands::test_support::{register, register_with, register_with_quota};
    use crate::error::ErrorCode;
    use tally_core::{Money, Product, SessionPhase};
    use tally_receipt::RecordingSurface;

    fn total(response: &OrderResponse) -> Money {
        response.order.as_ref().unwrap().total_amount
    }

    #[tokio::test]
    async fn test_add_without_login() {
        let (reg, _) = register().await;
        let err = add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionError);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();

        let err = add_to_order(&reg.store, &reg.session, "nope", &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_espresso_quantity_scenario() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();

        let r = add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();
        assert_eq!(total(&r), Money::from_major(15));

        let r = add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();
        assert_eq!(r.order.as_ref().unwrap().items.len(), 1);
        assert_eq!(total(&r), Money::from_major(30));

        let r = update_item_quantity(&reg.session, 0, 3).unwrap();
        assert_eq!(total(&r), Money::from_major(45));

        let r = remove_item(&reg.session, 0).unwrap();
        assert_eq!(total(&r), Money::zero());
        assert_eq!(r.phase, SessionPhase::ActiveEmpty);
    }

    #[tokio::test]
    async fn test_latte_with_addons() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();

        let large = [AddonSelection::new("size", "large")];
        add_to_order(&reg.store, &reg.session, "p2", &large).await.unwrap();
        let r = update_item_quantity(&reg.session, 0, 2).unwrap();
        assert_eq!(total(&r), Money::from_major(54));

        let err = add_to_order(&reg.store, &reg.session, "p2", &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_invalid_quantity_and_index() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();

        let err = update_item_quantity(&reg.session, 0, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = remove_item(&reg.session, 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);

        let err = update_item_quantity(&reg.session, 0, 100_000_000_000_000_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let order = get_order(&reg.session).order.unwrap();
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.total_amount, Money::from_major(15));
    }

    #[tokio::test]
    async fn test_submit_persists_once_and_starts_fresh_order() {
        let (reg, surface) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();
        add_to_order(&reg.store, &reg.session, "p3", &[]).await.unwrap();

        let submitted = submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap();

        assert!(submitted.persisted);
        assert!(submitted.order.is_printed);
        assert_eq!(submitted.order.total_amount, Money::from_major(35));
        assert!(matches!(submitted.print, Some(ref p) if !p.is_failed()));
        assert_eq!(surface.count(), 1);

        let ledger = reg.store.inner().ledger().orders().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0], submitted.order);

        let current = get_order(&reg.session);
        assert_eq!(current.phase, SessionPhase::ActiveEmpty);
        let fresh = current.order.unwrap();
        assert_eq!(fresh.staff_id, "w1");
        assert_ne!(fresh.id, submitted.order.id);
        assert!(!fresh.is_printed);
    }

    #[tokio::test]
    async fn test_submit_with_auto_print_off() {
        let (reg, surface) = register().await;
        let mut settings = reg.store.inner().settings().settings().await;
        settings.auto_print = false;
        reg.store.inner().settings().set_settings(&settings).await;

        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();

        let submitted = submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap();

        assert!(submitted.print.is_none());
        assert_eq!(surface.count(), 0);
        let ledger = reg.store.inner().ledger().orders().await;
        assert_eq!(ledger.len(), 1);
        assert!(ledger[0].is_printed);
    }

    #[tokio::test]
    async fn test_print_failure_keeps_ledger_entry() {
        let (reg, surface) = register_with(RecordingSurface::failing()).await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();

        let submitted = submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap();

        assert!(submitted.print.unwrap().is_failed());
        assert_eq!(surface.count(), 1);
        assert_eq!(reg.store.inner().ledger().orders().await.len(), 1);
        assert_eq!(get_order(&reg.session).phase, SessionPhase::ActiveEmpty);
    }

    #[tokio::test]
    async fn test_empty_submit_changes_nothing() {
        let (reg, surface) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        let before = get_order(&reg.session).order.unwrap();

        let err = submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::OrderError);
        assert_eq!(get_order(&reg.session).order.unwrap(), before);
        assert!(reg.store.inner().ledger().orders().await.is_empty());
        assert_eq!(surface.count(), 0);
    }

    #[tokio::test]
    async fn test_print_current_order_leaves_session_alone() {
        let (reg, surface) = register().await;

        let err = print_current_order(&reg.store, &reg.session, &reg.printer)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionError);

        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        add_to_order(&reg.store, &reg.session, "p1", &[]).await.unwrap();

        let outcome = print_current_order(&reg.store, &reg.session, &reg.printer)
            .await
            .unwrap();

        assert!(!outcome.is_failed());
        assert_eq!(surface.count(), 1);
        assert_eq!(get_order(&reg.session).phase, SessionPhase::ActiveNonEmpty);
        assert!(reg.store.inner().ledger().orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_writes_stay_visible_this_session() {
        let (reg, surface) = register_with_quota(64).await;
        reg.admin.unlock();

        let tea = Product::new("p5", "Tea", Money::from_major(8));
        save_product(&reg.store, &reg.admin, tea).await.unwrap();

        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        let r = add_to_order(&reg.store, &reg.session, "p5", &[]).await.unwrap();
        assert_eq!(total(&r), Money::from_major(8));

        let submitted = submit_order(&reg.store, &reg.session, &reg.printer).await.unwrap();
        assert!(!submitted.persisted);
        assert_eq!(surface.count(), 1);

        let report = daily_report(&reg.store).await;
        assert_eq!(report.order_count, 1);
        assert_eq!(report.total_amount, Money::from_major(8));
    }
}
