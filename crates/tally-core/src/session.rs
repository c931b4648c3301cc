//! # Order Session
//!
//! The state machine that owns the single in-progress order of the register.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Session Lifecycle                            │
//! │                                                                         │
//! │   ┌───────────┐  login(staff)   ┌─────────────┐  add_item   ┌────────┐ │
//! │   │ NoSession │ ──────────────► │ ActiveEmpty │ ──────────► │ Active │ │
//! │   └───────────┘                 └─────────────┘ ◄────────── │NonEmpty│ │
//! │         ▲                          ▲      │   remove last   └────────┘ │
//! │         │          logout()        │      │                     │      │
//! │         └──────────────────────────┼──────┘                     │      │
//! │         └──────────────────────────┼────────────────────────────┘      │
//! │                                    │   submit (checkout + rollover)    │
//! │                                    └───────────────────────────────────│
//! │                                                                         │
//! │  Every mutation recomputes item and order totals before returning.     │
//! │  A failed call leaves the session exactly as it was.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::session::OrderSession;
//! use tally_core::{Product, Staff, StaffRole};
//!
//! let ahmed = Staff { id: "w1".into(), name: "Ahmed".into(), access_code: "1111".into(), role: StaffRole::Staff };
//! let espresso = Product::new("p1", "Espresso", Money::from_major(15));
//!
//! let mut session = OrderSession::new();
//! session.login(ahmed).unwrap();
//! session.add_item(&espresso, &[]).unwrap();
//! session.add_item(&espresso, &[]).unwrap();
//!
//! let order = session.current_order().unwrap();
//! assert_eq!(order.items[0].quantity, 2);
//! assert_eq!(order.total_amount, Money::from_major(30));
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Order, OrderItem, Product, SelectedAddon, Staff};
use crate::ORDER_ID_PREFIX;

// =============================================================================
// Public Types
// =============================================================================

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NoSession,
    ActiveEmpty,
    ActiveNonEmpty,
}

/// One addon choice made at the product detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddonSelection {
    pub category_id: String,
    pub option_id: String,
}

impl AddonSelection {
    pub fn new(category_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        AddonSelection {
            category_id: category_id.into(),
            option_id: option_id.into(),
        }
    }
}

// =============================================================================
// Order Id Generator
// =============================================================================

/// Produces `ORD-<unix millis>` ids that strictly increase within a process.
///
/// Two orders created in the same millisecond (or after the wall clock
/// stepped backwards) get the last value plus one.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    last_millis: i64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id and the instant it encodes.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let millis = now.timestamp_millis().max(self.last_millis + 1);
        self.last_millis = millis;

        let timestamp = if millis == now.timestamp_millis() {
            now
        } else {
            Utc.timestamp_millis_opt(millis).single().unwrap_or(now)
        };

        (format!("{}{}", ORDER_ID_PREFIX, millis), timestamp)
    }
}

// =============================================================================
// Order Session
// =============================================================================

#[derive(Debug, Clone)]
enum SessionState {
    NoSession,
    Active { staff: Staff, order: Order },
}

/// Owns the logged-in staff member and their in-progress order.
#[derive(Debug, Clone)]
pub struct OrderSession {
    state: SessionState,
    ids: OrderIdGenerator,
}

impl Default for OrderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSession {
    /// Creates a session with nobody logged in.
    pub fn new() -> Self {
        OrderSession {
            state: SessionState::NoSession,
            ids: OrderIdGenerator::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            SessionState::NoSession => SessionPhase::NoSession,
            SessionState::Active { order, .. } if order.is_empty() => SessionPhase::ActiveEmpty,
            SessionState::Active { .. } => SessionPhase::ActiveNonEmpty,
        }
    }

    pub fn current_order(&self) -> Option<&Order> {
        match &self.state {
            SessionState::Active { order, .. } => Some(order),
            SessionState::NoSession => None,
        }
    }

    pub fn current_staff(&self) -> Option<&Staff> {
        match &self.state {
            SessionState::Active { staff, .. } => Some(staff),
            SessionState::NoSession => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    // -------------------------------------------------------------------------
    // Login / Logout
    // -------------------------------------------------------------------------

    /// Opens a session for `staff` with a fresh empty order.
    ///
    /// Fails with [`CoreError::AlreadyLoggedIn`] while another session is open.
    pub fn login(&mut self, staff: Staff) -> CoreResult<&Order> {
        if let SessionState::Active { staff: current, .. } = &self.state {
            return Err(CoreError::AlreadyLoggedIn {
                staff_name: current.name.clone(),
            });
        }

        let order = self.fresh_order(&staff);
        self.state = SessionState::Active { staff, order };
        self.current_order().ok_or(CoreError::NoActiveOrder)
    }

    /// Closes the session, discarding the in-progress order.
    ///
    /// Returns how many item rows were thrown away (0 when nobody was logged in).
    pub fn logout(&mut self) -> usize {
        match std::mem::replace(&mut self.state, SessionState::NoSession) {
            SessionState::Active { order, .. } => order.item_count(),
            SessionState::NoSession => 0,
        }
    }

    // -------------------------------------------------------------------------
    // Item Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of `product` with the given addon selections.
    ///
    /// ## Behavior
    /// - Plain product already in the order: that row's quantity goes up by one
    /// - Otherwise a new row with quantity 1 is appended
    /// - Products with addon categories always get their own row
    ///
    /// Returns the index of the row that was created or incremented.
    pub fn add_item(&mut self, product: &Product, selections: &[AddonSelection]) -> CoreResult<usize> {
        self.edit_order(|order| {
            let selected_addons = resolve_selections(product, selections)?;

            let existing = if product.has_addons() {
                None
            } else {
                order.items.iter().position(|i| i.product_id == product.id)
            };

            match existing {
                Some(index) => {
                    let item = &mut order.items[index];
                    item.quantity = item
                        .quantity
                        .checked_add(1)
                        .ok_or_else(|| CoreError::AmountOverflow("quantity".to_string()))?;
                    item.recompute_total()?;
                    Ok(index)
                }
                None => {
                    order
                        .items
                        .push(OrderItem::from_product(product, selected_addons, 1)?);
                    Ok(order.items.len() - 1)
                }
            }
        })
    }

    /// Sets the quantity of the row at `index`.
    ///
    /// The row is repriced from its own snapshots; later catalog edits never
    /// leak into it.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        self.edit_order(|order| {
            if quantity <= 0 {
                return Err(CoreError::InvalidQuantity(quantity));
            }

            let len = order.items.len();
            let item = order
                .items
                .get_mut(index)
                .ok_or(CoreError::InvalidIndex { index, len })?;

            item.quantity = quantity;
            item.recompute_total()
        })
    }

    /// Removes the row at `index`; later rows shift down by one.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<OrderItem> {
        self.edit_order(|order| {
            let len = order.items.len();
            if index >= len {
                return Err(CoreError::InvalidIndex { index, len });
            }
            Ok(order.items.remove(index))
        })
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Snapshots the current order for persistence, flagged as printed.
    ///
    /// The session itself is untouched; call [`rollover`](Self::rollover)
    /// once the snapshot has been handed off.
    pub fn checkout(&self) -> CoreResult<Order> {
        let order = match &self.state {
            SessionState::Active { order, .. } => order,
            SessionState::NoSession => return Err(CoreError::NoActiveOrder),
        };

        if order.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let mut snapshot = order.clone();
        snapshot.is_printed = true;
        Ok(snapshot)
    }

    /// Replaces the current order with a fresh empty one for the same staff.
    pub fn rollover(&mut self) -> CoreResult<&Order> {
        let staff = match &self.state {
            SessionState::Active { staff, .. } => staff.clone(),
            SessionState::NoSession => return Err(CoreError::NoActiveOrder),
        };

        let fresh = self.fresh_order(&staff);
        let order = self.order_mut()?;
        *order = fresh;
        Ok(order)
    }

    /// Checkout and rollover as one step.
    ///
    /// Returns the submitted snapshot. On error nothing changes.
    pub fn submit(&mut self) -> CoreResult<Order> {
        let snapshot = self.checkout()?;
        self.rollover()?;
        Ok(snapshot)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs `edit` against a copy of the current order and commits the copy
    /// only when the edit and the total recomputation both succeed.
    fn edit_order<T>(&mut self, edit: impl FnOnce(&mut Order) -> CoreResult<T>) -> CoreResult<T> {
        let order = self.order_mut()?;
        let mut draft = order.clone();
        let value = edit(&mut draft)?;
        draft.recompute_total()?;
        *order = draft;
        Ok(value)
    }

    fn order_mut(&mut self) -> CoreResult<&mut Order> {
        match &mut self.state {
            SessionState::Active { order, .. } => Ok(order),
            SessionState::NoSession => Err(CoreError::NoActiveOrder),
        }
    }

    fn fresh_order(&mut self, staff: &Staff) -> Order {
        let (id, timestamp) = self.ids.next_at(Utc::now());
        Order::new(id, staff, timestamp)
    }
}

// =============================================================================
// Addon Resolution
// =============================================================================

/// Turns `(category id, option id)` pairs into addon snapshots.
///
/// Snapshots follow the product's category order, then selection order.
/// Repeating an option within a multi-select category counts it once.
fn resolve_selections(product: &Product, selections: &[AddonSelection]) -> CoreResult<Vec<SelectedAddon>> {
    if let Some(unknown) = selections
        .iter()
        .find(|s| product.addon_category(&s.category_id).is_none())
    {
        return Err(CoreError::UnknownAddonCategory {
            product_id: product.id.clone(),
            category_id: unknown.category_id.clone(),
        });
    }

    let mut resolved = Vec::new();

    for category in &product.addon_categories {
        let mut chosen: Vec<&str> = Vec::new();
        for selection in selections.iter().filter(|s| s.category_id == category.id) {
            if !chosen.contains(&selection.option_id.as_str()) {
                chosen.push(&selection.option_id);
            }
        }

        if category.is_single_select && chosen.len() != 1 {
            return Err(CoreError::SingleSelectViolation {
                category: category.name.clone(),
                selected: chosen.len(),
            });
        }

        for option_id in chosen {
            let option = category
                .option(option_id)
                .ok_or_else(|| CoreError::UnknownAddonOption {
                    category: category.name.clone(),
                    option_id: option_id.to_string(),
                })?;

            resolved.push(SelectedAddon {
                category_name: category.name.clone(),
                option_name: option.name.clone(),
                price_adjustment: option.price_adjustment,
            });
        }
    }

    Ok(resolved)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{AddonCategory, AddonOption, StaffRole};

    fn staff(id: &str, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            name: name.to_string(),
            access_code: "1111".to_string(),
            role: StaffRole::Staff,
        }
    }

    fn espresso() -> Product {
        Product::new("p1", "Espresso", Money::from_major(15))
    }

    fn option(id: &str, name: &str, major: i64) -> AddonOption {
        AddonOption {
            id: id.to_string(),
            name: name.to_string(),
            price_adjustment: Money::from_major(major),
        }
    }

    fn latte() -> Product {
        Product::new("p2", "Latte", Money::from_major(22))
            .with_addon_category(AddonCategory {
                id: "size".to_string(),
                name: "Size".to_string(),
                is_single_select: true,
                options: vec![option("small", "Small", 0), option("large", "Large", 5)],
            })
            .with_addon_category(AddonCategory {
                id: "extras".to_string(),
                name: "Extras".to_string(),
                is_single_select: false,
                options: vec![option("shot", "Extra shot", 3), option("oat", "Oat milk", 2)],
            })
    }

    fn logged_in() -> OrderSession {
        let mut session = OrderSession::new();
        session.login(staff("w1", "Ahmed")).unwrap();
        session
    }

    fn total(session: &OrderSession) -> Money {
        session.current_order().unwrap().total_amount
    }

    #[test]
    fn test_phases() {
        let mut session = OrderSession::new();
        assert_eq!(session.phase(), SessionPhase::NoSession);

        session.login(staff("w1", "Ahmed")).unwrap();
        assert_eq!(session.phase(), SessionPhase::ActiveEmpty);

        session.add_item(&espresso(), &[]).unwrap();
        assert_eq!(session.phase(), SessionPhase::ActiveNonEmpty);

        session.remove_item(0).unwrap();
        assert_eq!(session.phase(), SessionPhase::ActiveEmpty);

        session.logout();
        assert_eq!(session.phase(), SessionPhase::NoSession);
    }

    #[test]
    fn test_login_opens_fresh_unprinted_order() {
        let mut session = OrderSession::new();
        let order = session.login(staff("w1", "Ahmed")).unwrap();

        assert!(order.id.starts_with("ORD-"));
        assert_eq!(order.staff_id, "w1");
        assert_eq!(order.staff_name, "Ahmed");
        assert!(order.is_empty());
        assert!(!order.is_printed);
    }

    #[test]
    fn test_login_while_active_is_rejected() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();

        let err = session.login(staff("w2", "Fatima")).unwrap_err();
        assert_eq!(
            err,
            CoreError::AlreadyLoggedIn {
                staff_name: "Ahmed".to_string()
            }
        );
        assert_eq!(session.current_staff().unwrap().name, "Ahmed");
        assert_eq!(session.current_order().unwrap().item_count(), 1);
    }

    #[test]
    fn test_mutations_without_session_fail() {
        let mut session = OrderSession::new();
        assert_eq!(session.add_item(&espresso(), &[]), Err(CoreError::NoActiveOrder));
        assert_eq!(session.update_quantity(0, 1), Err(CoreError::NoActiveOrder));
        assert_eq!(session.remove_item(0), Err(CoreError::NoActiveOrder));
        assert_eq!(session.checkout(), Err(CoreError::NoActiveOrder));
        assert_eq!(session.logout(), 0);
    }

    #[test]
    fn test_ahmed_espresso_scenario() {
        let mut session = logged_in();

        session.add_item(&espresso(), &[]).unwrap();
        assert_eq!(total(&session), Money::from_major(15));

        session.add_item(&espresso(), &[]).unwrap();
        assert_eq!(session.current_order().unwrap().item_count(), 1);
        assert_eq!(session.current_order().unwrap().items[0].quantity, 2);
        assert_eq!(total(&session), Money::from_major(30));

        session.update_quantity(0, 3).unwrap();
        assert_eq!(total(&session), Money::from_major(45));

        session.remove_item(0).unwrap();
        assert_eq!(total(&session), Money::zero());
        assert_eq!(session.phase(), SessionPhase::ActiveEmpty);
    }

    #[test]
    fn test_latte_large_twice_is_54() {
        let mut session = logged_in();
        let index = session
            .add_item(&latte(), &[AddonSelection::new("size", "large")])
            .unwrap();
        session.update_quantity(index, 2).unwrap();

        let order = session.current_order().unwrap();
        assert_eq!(order.items[0].selected_addons.len(), 1);
        assert_eq!(order.items[0].selected_addons[0].option_name, "Large");
        assert_eq!(order.items[0].total_price, Money::from_major(54));
        assert_eq!(order.total_amount, Money::from_major(54));
    }

    #[test]
    fn test_products_with_addons_never_collapse() {
        let mut session = logged_in();
        let small = [AddonSelection::new("size", "small")];

        assert_eq!(session.add_item(&latte(), &small).unwrap(), 0);
        assert_eq!(session.add_item(&latte(), &small).unwrap(), 1);

        let order = session.current_order().unwrap();
        assert_eq!(order.item_count(), 2);
        assert!(order.items.iter().all(|i| i.quantity == 1));
        assert_eq!(order.total_amount, Money::from_major(44));
    }

    #[test]
    fn test_multi_select_allows_any_subset() {
        let mut session = logged_in();
        let selections = [
            AddonSelection::new("extras", "oat"),
            AddonSelection::new("size", "small"),
            AddonSelection::new("extras", "shot"),
            AddonSelection::new("extras", "oat"),
        ];
        session.add_item(&latte(), &selections).unwrap();

        let item = &session.current_order().unwrap().items[0];
        let names: Vec<&str> = item.selected_addons.iter().map(|a| a.option_name.as_str()).collect();
        assert_eq!(names, ["Small", "Oat milk", "Extra shot"]);
        assert_eq!(item.total_price, Money::from_major(27));
    }

    #[test]
    fn test_single_select_needs_exactly_one() {
        let mut session = logged_in();

        let none = session.add_item(&latte(), &[]);
        assert_eq!(
            none,
            Err(CoreError::SingleSelectViolation {
                category: "Size".to_string(),
                selected: 0
            })
        );

        let two = session.add_item(
            &latte(),
            &[AddonSelection::new("size", "small"), AddonSelection::new("size", "large")],
        );
        assert!(matches!(two, Err(CoreError::SingleSelectViolation { selected: 2, .. })));
        assert_eq!(session.phase(), SessionPhase::ActiveEmpty);
    }

    #[test]
    fn test_unknown_selection_ids_are_rejected() {
        let mut session = logged_in();

        let bad_category = session.add_item(&espresso(), &[AddonSelection::new("size", "large")]);
        assert!(matches!(bad_category, Err(CoreError::UnknownAddonCategory { .. })));

        let bad_option = session.add_item(&latte(), &[AddonSelection::new("size", "huge")]);
        assert!(matches!(bad_option, Err(CoreError::UnknownAddonOption { .. })));
        assert!(session.current_order().unwrap().is_empty());
    }

    #[test]
    fn test_update_quantity_errors_leave_order_untouched() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();

        assert_eq!(session.update_quantity(0, 0), Err(CoreError::InvalidQuantity(0)));
        assert_eq!(session.update_quantity(0, -2), Err(CoreError::InvalidQuantity(-2)));
        assert_eq!(
            session.update_quantity(5, 2),
            Err(CoreError::InvalidIndex { index: 5, len: 1 })
        );
        assert_eq!(total(&session), Money::from_major(15));
    }

    #[test]
    fn test_overflowing_quantity_is_rejected_without_change() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();
        let before = session.current_order().unwrap().clone();

        let err = session.update_quantity(0, i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));

        let err = session.update_quantity(0, 100_000_000_000_000_000).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));

        assert_eq!(session.current_order().unwrap(), &before);
        assert_eq!(total(&session), Money::from_major(15));
    }

    #[test]
    fn test_order_total_overflow_rolls_back_the_edit() {
        let mut session = logged_in();
        let bar = Product::new("p9", "Gold Bar", Money::from_cents(i64::MAX / 2));
        session.add_item(&bar, &[]).unwrap();
        session.add_item(&espresso(), &[]).unwrap();
        let before = session.current_order().unwrap().clone();

        // The line fits, the order total does not.
        let err = session.update_quantity(1, i64::MAX / 1500).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
        assert_eq!(session.current_order().unwrap(), &before);

        let err = session.add_item(&bar, &[]).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
        assert_eq!(session.current_order().unwrap(), &before);
    }

    #[test]
    fn test_sequential_remove_semantics() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();
        session
            .add_item(&latte(), &[AddonSelection::new("size", "small")])
            .unwrap();
        session
            .add_item(&Product::new("p4", "Chocolate Cake", Money::from_major(30)), &[])
            .unwrap();

        // Removing 0 twice removes the first two rows in turn.
        assert_eq!(session.remove_item(0).unwrap().product_id, "p1");
        assert_eq!(session.remove_item(0).unwrap().product_id, "p2");

        let order = session.current_order().unwrap();
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.items[0].product_id, "p4");
        assert_eq!(order.total_amount, Money::from_major(30));

        assert_eq!(
            session.remove_item(1),
            Err(CoreError::InvalidIndex { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_quantity_update_ignores_catalog_edits() {
        let mut session = logged_in();
        let mut product = espresso();
        session.add_item(&product, &[]).unwrap();

        product.price = Money::from_major(99);
        session.update_quantity(0, 2).unwrap();

        assert_eq!(total(&session), Money::from_major(30));
    }

    #[test]
    fn test_empty_checkout_fails_without_change() {
        let mut session = logged_in();
        let before = session.current_order().unwrap().clone();

        assert_eq!(session.submit(), Err(CoreError::EmptyOrder));
        assert_eq!(session.current_order().unwrap(), &before);
    }

    #[test]
    fn test_submit_returns_flagged_snapshot_and_fresh_order() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();
        let submitted_id = session.current_order().unwrap().id.clone();

        let snapshot = session.submit().unwrap();
        assert_eq!(snapshot.id, submitted_id);
        assert!(snapshot.is_printed);
        assert_eq!(snapshot.total_amount, Money::from_major(15));

        let fresh = session.current_order().unwrap();
        assert_ne!(fresh.id, submitted_id);
        assert!(fresh.is_empty());
        assert!(!fresh.is_printed);
        assert_eq!(fresh.staff_id, "w1");
        assert_eq!(session.phase(), SessionPhase::ActiveEmpty);
    }

    #[test]
    fn test_logout_discards_order() {
        let mut session = logged_in();
        session.add_item(&espresso(), &[]).unwrap();
        session
            .add_item(&latte(), &[AddonSelection::new("size", "large")])
            .unwrap();

        assert_eq!(session.logout(), 2);
        assert!(session.current_order().is_none());

        session.login(staff("w2", "Fatima")).unwrap();
        assert!(session.current_order().unwrap().is_empty());
    }

    #[test]
    fn test_order_ids_are_monotonic_within_same_millisecond() {
        let mut ids = OrderIdGenerator::new();
        let now = Utc.timestamp_millis_opt(1_718_000_000_000).unwrap();

        let (first, _) = ids.next_at(now);
        let (second, second_ts) = ids.next_at(now);
        let (third, _) = ids.next_at(now - chrono::Duration::seconds(5));

        assert_eq!(first, "ORD-1718000000000");
        assert_eq!(second, "ORD-1718000000001");
        assert_eq!(second_ts.timestamp_millis(), 1_718_000_000_001);
        assert_eq!(third, "ORD-1718000000002");
    }
}
