//! # Seed Defaults
//!
//! What every read falls back to when a record is absent or unreadable,
//! and what the `seed` binary writes into a fresh database.
//!
//! ```text
//! products   Espresso 15.00 · Latte 22.00 (Size, Extras) · Cappuccino 20.00 · Chocolate Cake 30.00
//! staff      Ahmed 1111 · Fatima 2222 · Manager 0000 (admin)
//! settings   Settings::default()
//! orders     []
//! ```

use tally_core::{AddonCategory, AddonOption, Money, Product, Settings, Staff, StaffRole};

use crate::documents::WriteOutcome;
use crate::pool::Store;

fn option(id: &str, name: &str, adjustment: Money) -> AddonOption {
    AddonOption {
        id: id.to_string(),
        name: name.to_string(),
        price_adjustment: adjustment,
    }
}

/// Default product catalog.
pub fn products() -> Vec<Product> {
    vec![
        Product::new("p1", "Espresso", Money::from_major(15)),
        Product::new("p2", "Latte", Money::from_major(22))
            .with_addon_category(AddonCategory {
                id: "size".to_string(),
                name: "Size".to_string(),
                is_single_select: true,
                options: vec![
                    option("small", "Small", Money::zero()),
                    option("large", "Large", Money::from_major(5)),
                ],
            })
            .with_addon_category(AddonCategory {
                id: "extras".to_string(),
                name: "Extras".to_string(),
                is_single_select: false,
                options: vec![
                    option("shot", "Extra shot", Money::from_major(3)),
                    option("oat", "Oat milk", Money::from_major(2)),
                ],
            }),
        Product::new("p3", "Cappuccino", Money::from_major(20)),
        Product::new("p4", "Chocolate Cake", Money::from_major(30)),
    ]
}

/// Default staff roster.
pub fn staff() -> Vec<Staff> {
    let member = |id: &str, name: &str, code: &str, role: StaffRole| Staff {
        id: id.to_string(),
        name: name.to_string(),
        access_code: code.to_string(),
        role,
    };

    vec![
        member("w1", "Ahmed", "1111", StaffRole::Staff),
        member("w2", "Fatima", "2222", StaffRole::Staff),
        member("w3", "Manager", "0000", StaffRole::Admin),
    ]
}

/// Default settings.
pub fn settings() -> Settings {
    Settings::default()
}

/// Writes the seed catalog, roster and settings, leaving the ledger alone.
pub async fn write_defaults(store: &Store) -> WriteOutcome {
    let catalog = store.catalog();

    catalog
        .set_products(&products())
        .await
        .and(catalog.set_staff(&staff()).await)
        .and(store.settings().set_settings(&settings()).await)
}
