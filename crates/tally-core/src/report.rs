//! # Sales Report
//!
//! Aggregates every order in the ledger by the staff member who took it.
//!
//! ```text
//! orders ──► group by staff_id (first appearance order)
//!               │
//!               ├── staff name: catalog lookup, else order snapshot
//!               ├── Σ total_amount, order count
//!               ▼
//!          DailyReport { staff_sales, total_amount, order_count, orders ↓newest }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, Staff};

/// Sales attributed to one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StaffSales {
    pub staff_id: String,
    pub staff_name: String,
    pub total_amount: Money,
    pub order_count: usize,
}

/// Ledger summary shown on the report screen and printed as a report slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyReport {
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub staff_sales: Vec<StaffSales>,
    pub total_amount: Money,
    pub order_count: usize,
    /// Order history, newest first.
    pub orders: Vec<Order>,
}

impl DailyReport {
    /// Builds the report from ledger orders and the current staff roster.
    ///
    /// Staff that have since been deleted keep the name frozen on their
    /// orders.
    pub fn from_orders(orders: &[Order], staff: &[Staff], generated_at: DateTime<Utc>) -> Self {
        let mut staff_sales: Vec<StaffSales> = Vec::new();

        for order in orders {
            match staff_sales.iter_mut().find(|s| s.staff_id == order.staff_id) {
                Some(entry) => {
                    entry.total_amount += order.total_amount;
                    entry.order_count += 1;
                }
                None => {
                    let staff_name = staff
                        .iter()
                        .find(|s| s.id == order.staff_id)
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| order.staff_name.clone());

                    staff_sales.push(StaffSales {
                        staff_id: order.staff_id.clone(),
                        staff_name,
                        total_amount: order.total_amount,
                        order_count: 1,
                    });
                }
            }
        }

        let mut history = orders.to_vec();
        // Stable sort keeps ledger order for equal timestamps.
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        DailyReport {
            generated_at,
            total_amount: orders.iter().map(|o| o.total_amount).sum(),
            order_count: orders.len(),
            staff_sales,
            orders: history,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StaffRole;
    use chrono::TimeZone;

    fn staff(id: &str, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            name: name.to_string(),
            access_code: "1111".to_string(),
            role: StaffRole::Staff,
        }
    }

    fn order(id_millis: i64, staff_id: &str, staff_name: &str, major: i64) -> Order {
        let ts = Utc.timestamp_millis_opt(id_millis).unwrap();
        let mut order = Order::new(format!("ORD-{}", id_millis), &staff(staff_id, staff_name), ts);
        order.total_amount = Money::from_major(major);
        order
    }

    #[test]
    fn test_groups_by_staff_in_first_appearance_order() {
        let roster = vec![staff("w1", "Ahmed"), staff("w2", "Fatima")];
        let orders = vec![
            order(1_000, "w2", "Fatima", 20),
            order(2_000, "w1", "Ahmed", 15),
            order(3_000, "w2", "Fatima", 54),
        ];

        let report = DailyReport::from_orders(&orders, &roster, Utc::now());

        assert_eq!(report.order_count, 3);
        assert_eq!(report.total_amount, Money::from_major(89));
        assert_eq!(report.staff_sales.len(), 2);
        assert_eq!(report.staff_sales[0].staff_name, "Fatima");
        assert_eq!(report.staff_sales[0].total_amount, Money::from_major(74));
        assert_eq!(report.staff_sales[0].order_count, 2);
        assert_eq!(report.staff_sales[1].staff_name, "Ahmed");
    }

    #[test]
    fn test_name_comes_from_roster_then_snapshot() {
        let roster = vec![staff("w1", "Ahmed K.")];
        let orders = vec![order(1_000, "w1", "Ahmed", 15), order(2_000, "w9", "Former", 10)];

        let report = DailyReport::from_orders(&orders, &roster, Utc::now());

        assert_eq!(report.staff_sales[0].staff_name, "Ahmed K.");
        assert_eq!(report.staff_sales[1].staff_name, "Former");
    }

    #[test]
    fn test_history_is_newest_first() {
        let orders = vec![
            order(1_000, "w1", "Ahmed", 1),
            order(3_000, "w1", "Ahmed", 3),
            order(2_000, "w1", "Ahmed", 2),
        ];

        let report = DailyReport::from_orders(&orders, &[], Utc::now());
        let ids: Vec<&str> = report.orders.iter().map(|o| o.number()).collect();
        assert_eq!(ids, ["3000", "2000", "1000"]);
    }

    #[test]
    fn test_empty_ledger() {
        let report = DailyReport::from_orders(&[], &[], Utc::now());
        assert!(report.is_empty());
        assert_eq!(report.total_amount, Money::zero());
        assert!(report.staff_sales.is_empty());
    }
}
