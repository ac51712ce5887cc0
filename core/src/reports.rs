//! Operational reports: inventory valuation and stock movement history.
//!
//! Like the dashboard, these are pure functions over snapshots; slip/PDF
//! rendering is an external collaborator and not handled here.

use crate::order::{Order, OrderStatus};
use crate::product::Product;
use crate::types::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a stock movement derived from an order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock left the warehouse to fulfill the order.
    Outbound,
    /// The order was cancelled; its stock came back.
    Cancelled,
}

/// A line within a movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementLine {
    /// Product name at order time.
    pub product: String,
    /// Units moved.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Money,
}

/// A stock movement derived from one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    /// When the order was created.
    pub date: DateTime<Utc>,
    /// The order's number.
    pub order_number: String,
    /// Movement direction.
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// Lines moved.
    pub items: Vec<MovementLine>,
}

/// Maps order history (assumed newest first) to movement records.
#[must_use]
pub fn movement_history(orders: &[Order]) -> Vec<StockMovement> {
    orders
        .iter()
        .map(|order| StockMovement {
            date: order.created_at,
            order_number: order.order_number.clone(),
            kind: if order.status == OrderStatus::Cancelled {
                MovementKind::Cancelled
            } else {
                MovementKind::Outbound
            },
            items: order
                .items
                .iter()
                .map(|line| MovementLine {
                    product: line.name.clone(),
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
        })
        .collect()
}

/// Per-category slice of the value report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    /// Sale value of on-hand stock in this category.
    pub value: Money,
    /// Cost basis of on-hand stock in this category.
    pub cost: Money,
    /// On-hand units in this category.
    pub items: u64,
}

/// Catalog-wide inventory valuation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValueReport {
    /// Total sale value of on-hand stock.
    pub total_value: Money,
    /// Total cost basis of on-hand stock.
    pub total_cost: Money,
    /// Total on-hand units.
    pub total_items: u64,
    /// Breakdown by product category.
    pub categories: BTreeMap<String, CategoryTotals>,
}

/// Computes the valuation report from a catalog snapshot.
#[must_use]
pub fn value_report(products: &[Product]) -> InventoryValueReport {
    let mut report = InventoryValueReport {
        total_value: Money::ZERO,
        total_cost: Money::ZERO,
        total_items: 0,
        categories: BTreeMap::new(),
    };

    for product in products {
        let value = product.stock_value();
        let cost = product.cost_value();
        report.total_value += value;
        report.total_cost += cost;
        report.total_items += u64::from(product.quantity);

        let slot = report
            .categories
            .entry(product.category.clone())
            .or_default();
        slot.value += value;
        slot.cost += cost;
        slot.items += u64::from(product.quantity);
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::order::{Customer, OrderLine, PaymentStatus, ShippingAddress};
    use crate::types::{OrderId, ProductId, UserId};

    fn product(category: &str, price: i64, cost: i64, quantity: u32) -> Product {
        Product {
            id: ProductId::new(),
            sku: format!("SKU-{category}-{quantity}"),
            name: "Thing".to_string(),
            category: category.to_string(),
            price: Money::from_dollars(price),
            cost: Money::from_dollars(cost),
            quantity,
            reorder_point: 5,
            location: "A-01".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn value_report_breaks_down_by_category() {
        let products = vec![
            product("bolts", 2, 1, 100),
            product("bolts", 4, 2, 50),
            product("nuts", 1, 1, 10),
        ];

        let report = value_report(&products);
        assert_eq!(report.total_value, Money::from_dollars(410));
        assert_eq!(report.total_cost, Money::from_dollars(210));
        assert_eq!(report.total_items, 160);
        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories["bolts"].value, Money::from_dollars(400));
        assert_eq!(report.categories["nuts"].items, 10);
    }

    #[test]
    fn cancelled_orders_map_to_cancelled_movements() {
        let base = Order {
            id: OrderId::new(),
            order_number: "ORD250829-0001".to_string(),
            customer: Customer {
                name: "Ada".to_string(),
                email: None,
                phone: None,
            },
            shipping_address: ShippingAddress {
                street: "1 Main St".to_string(),
                city: None,
                state: None,
                zip_code: None,
                country: None,
            },
            items: vec![OrderLine {
                product_id: ProductId::new(),
                name: "Thing".to_string(),
                quantity: 2,
                price: Money::from_dollars(3),
            }],
            total_amount: Money::from_dollars(6),
            status: OrderStatus::Cancelled,
            payment_status: PaymentStatus::Pending,
            notes: None,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut shipped = base.clone();
        shipped.status = OrderStatus::Shipped;

        let movements = movement_history(&[base, shipped]);
        assert_eq!(movements[0].kind, MovementKind::Cancelled);
        assert_eq!(movements[1].kind, MovementKind::Outbound);
        assert_eq!(movements[0].items[0].quantity, 2);
    }

    #[test]
    fn movement_serializes_kind_as_type() {
        let movements = movement_history(&[]);
        assert!(movements.is_empty());

        let movement = StockMovement {
            date: Utc::now(),
            order_number: "ORD250829-0001".to_string(),
            kind: MovementKind::Outbound,
            items: vec![],
        };
        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["type"], "outbound");
        assert!(json.get("orderNumber").is_some());
    }
}
