//! Dashboard aggregator.
//!
//! Pure read-side composition over snapshots of the catalog and order
//! history, recomputed on every invocation with no cross-request cache.
//! Cost is O(products × orders-in-window): fine for an admin dashboard,
//! not horizontally scalable without pre-aggregation.

use crate::environment::Clock;
use crate::forecast::{self, StockPrediction};
use crate::order::{Order, OrderStatus};
use crate::product::Product;
use crate::store::{Catalog, OrderStore};
use crate::types::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How many recent orders the report carries.
const RECENT_ORDER_LIMIT: usize = 30;

/// A line of a recent order, as shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrderLine {
    /// Product name (snapshotted at order time).
    pub product: String,
    /// Units ordered.
    pub quantity: u32,
}

/// A recent order summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    /// Human-readable order number.
    pub order_number: String,
    /// Order total.
    pub total_amount: Money,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Creation time.
    pub date: DateTime<Utc>,
    /// Line summaries.
    pub items: Vec<RecentOrderLine>,
}

/// The full dashboard report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Number of products in the catalog.
    pub total_products: u64,
    /// Number of orders ever created.
    pub total_orders: u64,
    /// Sale value of all on-hand stock (`Σ price × quantity`).
    pub total_inventory_value: Money,
    /// Cost basis of all on-hand stock (`Σ cost × quantity`).
    pub total_cost_basis: Money,
    /// Products at or below their reorder point.
    pub low_stock_items: u64,
    /// Products with nothing on hand.
    pub out_of_stock_items: u64,
    /// Revenue across all non-cancelled orders.
    pub total_revenue: Money,
    /// Per-product forecasts.
    pub stock_predictions: Vec<StockPrediction>,
    /// Most recent orders, newest first.
    pub recent_orders: Vec<RecentOrder>,
}

/// Builds the report from snapshots. Pure; `now` anchors the trailing
/// consumption window.
#[must_use]
pub fn build_report(products: &[Product], orders: &[Order], now: DateTime<Utc>) -> DashboardReport {
    let total_inventory_value = products.iter().map(Product::stock_value).sum();
    let total_cost_basis = products.iter().map(Product::cost_value).sum();
    let low_stock_items = products.iter().filter(|p| p.is_low_stock()).count() as u64;
    let out_of_stock_items = products.iter().filter(|p| p.quantity == 0).count() as u64;
    let total_revenue = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total_amount)
        .sum();

    let stock_predictions = products
        .iter()
        .map(|product| forecast::predict(product, orders, now))
        .collect();

    let recent_orders = orders
        .iter()
        .take(RECENT_ORDER_LIMIT)
        .map(|order| RecentOrder {
            order_number: order.order_number.clone(),
            total_amount: order.total_amount,
            status: order.status,
            date: order.created_at,
            items: order
                .items
                .iter()
                .map(|line| RecentOrderLine {
                    product: line.name.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        })
        .collect();

    DashboardReport {
        total_products: products.len() as u64,
        total_orders: orders.len() as u64,
        total_inventory_value,
        total_cost_basis,
        low_stock_items,
        out_of_stock_items,
        total_revenue,
        stock_predictions,
        recent_orders,
    }
}

/// Loads catalog and order snapshots and composes the report.
#[derive(Clone)]
pub struct DashboardAggregator {
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
}

impl DashboardAggregator {
    /// Creates the aggregator.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        orders: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            orders,
            clock,
        }
    }

    /// Computes a fresh report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Store`] if a snapshot load fails.
    pub async fn report(&self) -> Result<DashboardReport, crate::error::Error> {
        let products = self.catalog.list().await?;
        let orders = self.orders.list().await?;
        Ok(build_report(&products, &orders, self.clock.now()))
    }
}
