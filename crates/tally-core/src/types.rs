//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ AddonCategory   │   │  AddonOption    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id, name       │──►│  id, name       │       │
//! │  │  name, price    │   │  single_select  │   │  adjustment     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │          │ snapshot on add                                              │
//! │          ▼                                                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │──►│   OrderItem     │──►│ SelectedAddon   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ORD-<ms>    │   │  name/base snap │   │  category name  │       │
//! │  │  staff snapshot │   │  quantity       │   │  option name    │       │
//! │  │  total_amount   │   │  total_price    │   │  adjustment     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Staff       │   │    Settings     │                             │
//! │  │  access_code    │   │  shop, receipt  │                             │
//! │  │  role           │   │  auto_print     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order items copy the product name, base price and every chosen addon at
//! the moment they are added. Editing or deleting the product afterwards
//! never changes an order that already holds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing;

// =============================================================================
// Catalog
// =============================================================================

/// A priced choice inside an addon category (e.g. "Large", +5.00).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddonOption {
    pub id: String,
    pub name: String,
    /// Signed: negative values are discounts.
    pub price_adjustment: Money,
}

/// A customization axis of a product (e.g. "Size", "Extras").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddonCategory {
    pub id: String,
    pub name: String,
    /// Exactly one option must be chosen when true; any subset otherwise.
    pub is_single_select: bool,
    pub options: Vec<AddonOption>,
}

impl AddonCategory {
    /// Looks up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&AddonOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable identifier, referenced by order items.
    pub id: String,

    /// Display name shown on the grid and on receipts.
    pub name: String,

    /// Base price before addons.
    pub price: Money,

    /// Image reference for the product grid.
    #[serde(default)]
    pub image_url: String,

    /// Ordered customization axes; empty for plain products.
    #[serde(default)]
    pub addon_categories: Vec<AddonCategory>,
}

impl Product {
    /// Creates a plain product with no addons.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            addon_categories: Vec::new(),
        }
    }

    /// Builder-style helper to attach an addon category.
    pub fn with_addon_category(mut self, category: AddonCategory) -> Self {
        self.addon_categories.push(category);
        self
    }

    /// True when the product carries any addon category.
    #[inline]
    pub fn has_addons(&self) -> bool {
        !self.addon_categories.is_empty()
    }

    /// Looks up an addon category by id.
    pub fn addon_category(&self, category_id: &str) -> Option<&AddonCategory> {
        self.addon_categories.iter().find(|c| c.id == category_id)
    }
}

/// Placeholder image used for products created without one.
pub const DEFAULT_IMAGE_URL: &str = "/placeholder.svg";

// =============================================================================
// Staff
// =============================================================================

/// What a staff member is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Takes orders.
    #[default]
    Staff,
    /// Takes orders and manages catalog/settings.
    Admin,
}

/// A staff member who can log in at the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Staff {
    pub id: String,
    pub name: String,
    /// Fixed-length numeric access code.
    pub access_code: String,
    #[serde(default)]
    pub role: StaffRole,
}

impl Staff {
    /// Returns true for staff holding the admin role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

// =============================================================================
// Orders
// =============================================================================

/// A chosen addon, frozen at the time the item was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedAddon {
    pub category_name: String,
    pub option_name: String,
    pub price_adjustment: Money,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at time of adding (frozen).
    pub product_name: String,
    /// Product base price at time of adding (frozen).
    pub base_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub selected_addons: Vec<SelectedAddon>,
    /// `(base_price + Σ adjustments) × quantity`, maintained by the session.
    pub total_price: Money,
}

impl OrderItem {
    /// Snapshots a product and its resolved addons into a new line.
    pub fn from_product(
        product: &Product,
        selected_addons: Vec<SelectedAddon>,
        quantity: i64,
    ) -> CoreResult<Self> {
        let mut item = OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            base_price: product.price,
            quantity,
            selected_addons,
            total_price: Money::zero(),
        };
        item.recompute_total()?;
        Ok(item)
    }

    /// Recomputes `total_price` from the item's own snapshots.
    ///
    /// On overflow `total_price` keeps its previous value.
    pub fn recompute_total(&mut self) -> CoreResult<()> {
        self.total_price =
            pricing::compute_item_total(self.base_price, &self.selected_addons, self.quantity)?;
        Ok(())
    }
}

/// One customer transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// `ORD-<unix millis>`.
    pub id: String,
    pub staff_id: String,
    /// Staff name at time of creation (frozen).
    pub staff_name: String,
    pub items: Vec<OrderItem>,
    /// Σ item totals, maintained by the session.
    pub total_amount: Money,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub is_printed: bool,
}

impl Order {
    /// Creates an empty, unprinted order owned by `staff`.
    pub fn new(id: impl Into<String>, staff: &Staff, timestamp: DateTime<Utc>) -> Self {
        Order {
            id: id.into(),
            staff_id: staff.id.clone(),
            staff_name: staff.name.clone(),
            items: Vec::new(),
            total_amount: Money::zero(),
            timestamp,
            is_printed: false,
        }
    }

    /// Short order number printed on receipts: the part after `ORD-`.
    ///
    /// ## Example
    /// ```rust
    /// # use tally_core::{Order, Staff, StaffRole};
    /// # use chrono::Utc;
    /// let staff = Staff { id: "w1".into(), name: "Ahmed".into(), access_code: "1111".into(), role: StaffRole::Staff };
    /// let order = Order::new("ORD-1718000000000", &staff, Utc::now());
    /// assert_eq!(order.number(), "1718000000000");
    /// ```
    pub fn number(&self) -> &str {
        self.id
            .split_once('-')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.id)
    }

    /// Recomputes `total_amount` from the current items.
    pub fn recompute_total(&mut self) -> CoreResult<()> {
        self.total_amount = pricing::compute_order_total(&self.items)?;
        Ok(())
    }

    /// Number of lines.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// True when the order holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Settings
// =============================================================================

/// The single configuration record of the register.
///
/// Every field has a default so a partially written record (or one from an
/// older version) still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Settings {
    /// Shop name on the login screen and receipt header.
    pub shop_name: String,
    /// Unlocks the settings and catalog screens.
    pub admin_code: String,
    /// Print a receipt automatically when an order is submitted.
    pub auto_print: bool,
    /// Shown after amounts on receipts and reports.
    pub currency_symbol: String,
    pub header_message: String,
    pub footer_message: String,
    /// Guest network shown on the receipt footer when non-empty.
    pub wifi_ssid: String,
    pub wifi_password: String,
    /// Logical receipt width in pixels.
    pub receipt_width_px: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shop_name: "Dyad Cafe".to_string(),
            admin_code: "0000".to_string(),
            auto_print: true,
            currency_symbol: "SAR".to_string(),
            header_message: "Order Receipt".to_string(),
            footer_message: "Thank you for your visit!".to_string(),
            wifi_ssid: "DyadCafe_Guest".to_string(),
            wifi_password: "password123".to_string(),
            receipt_width_px: DEFAULT_RECEIPT_WIDTH_PX,
        }
    }
}

/// Logical receipt width used when settings don't say otherwise.
pub const DEFAULT_RECEIPT_WIDTH_PX: u32 = 300;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ahmed() -> Staff {
        Staff {
            id: "w1".to_string(),
            name: "Ahmed".to_string(),
            access_code: "1111".to_string(),
            role: StaffRole::Staff,
        }
    }

    #[test]
    fn test_order_number_fragment() {
        let order = Order::new("ORD-42", &ahmed(), Utc::now());
        assert_eq!(order.number(), "42");

        let odd = Order::new("legacy", &ahmed(), Utc::now());
        assert_eq!(odd.number(), "legacy");
    }

    #[test]
    fn test_new_order_is_empty_and_unprinted() {
        let order = Order::new("ORD-1", &ahmed(), Utc::now());
        assert!(order.is_empty());
        assert!(!order.is_printed);
        assert_eq!(order.total_amount, Money::zero());
        assert_eq!(order.staff_name, "Ahmed");
    }

    #[test]
    fn test_item_snapshot_is_decoupled_from_product() {
        let mut product = Product::new("p1", "Espresso", Money::from_major(15));
        let item = OrderItem::from_product(&product, Vec::new(), 2).unwrap();

        product.name = "Double Espresso".to_string();
        product.price = Money::from_major(99);

        assert_eq!(item.product_name, "Espresso");
        assert_eq!(item.base_price, Money::from_major(15));
        assert_eq!(item.total_price, Money::from_major(30));
    }

    #[test]
    fn test_staff_role_defaults_when_absent() {
        let json = r#"{"id":"w9","name":"Sam","access_code":"9999"}"#;
        let staff: Staff = serde_json::from_str(json).unwrap();
        assert_eq!(staff.role, StaffRole::Staff);
        assert!(!staff.is_admin());
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let json = r#"{"shop_name":"Corner Kiosk","auto_print":false}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.shop_name, "Corner Kiosk");
        assert!(!settings.auto_print);
        assert_eq!(settings.receipt_width_px, DEFAULT_RECEIPT_WIDTH_PX);
        assert_eq!(settings.admin_code, "0000");
    }

    #[test]
    fn test_product_without_addons_field_loads() {
        let json = r#"{"id":"p1","name":"Espresso","price":15}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Money::from_major(15));
        assert!(!product.has_addons());
        assert_eq!(product.image_url, "");
    }
}
