//! Forecast engine: trailing-window consumption, stockout prediction and
//! reorder recommendations.
//!
//! Pure functions over snapshots of the order history — no I/O, no caching,
//! deterministic given a fixed "now". Cancelled orders do not count toward
//! consumption: their stock came back, so treating them as demand would
//! inflate every downstream figure.

use crate::order::{Order, OrderStatus};
use crate::product::Product;
use crate::types::ProductId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the trailing consumption window, in days.
pub const CONSUMPTION_WINDOW_DAYS: u32 = 30;

/// Assumed days to receive a new shipment, used to size recommendations.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// Display classification of a product's stock level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Above the reorder point.
    Normal,
    /// At or below the reorder point, but not empty.
    LowStock,
    /// Nothing on hand.
    OutOfStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::LowStock => write!(f, "low_stock"),
            Self::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

/// Per-product forecast, as exposed on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPrediction {
    /// Product identifier.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// On-hand units.
    pub current_stock: u32,
    /// Reorder threshold.
    pub reorder_point: u32,
    /// Trailing-window average daily consumption, rounded to one decimal.
    pub avg_daily_consumption: f64,
    /// Whole days until projected stockout; `None` when consumption data
    /// gives no signal.
    pub days_until_stockout: Option<u32>,
    /// Suggested reorder quantity (0 when stock is above the threshold).
    pub recommended_order: u32,
    /// Display classification.
    pub status: StockStatus,
    /// When this forecast was computed.
    pub last_updated: DateTime<Utc>,
}

/// Units of `product_id` consumed by non-cancelled orders created within
/// the trailing window ending at `now`.
#[must_use]
pub fn consumed_in_window(orders: &[Order], product_id: ProductId, now: DateTime<Utc>) -> u64 {
    let window_start = now - Duration::days(i64::from(CONSUMPTION_WINDOW_DAYS));
    orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .filter(|order| order.created_at >= window_start && order.created_at <= now)
        .flat_map(|order| &order.items)
        .filter(|line| line.product_id == product_id)
        .map(|line| u64::from(line.quantity))
        .sum()
}

/// Average daily consumption over the fixed window. `0.0` with no history.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Consumption totals are far below 2^52
pub fn average_daily_consumption(total_consumed: u64) -> f64 {
    total_consumed as f64 / f64::from(CONSUMPTION_WINDOW_DAYS)
}

/// Whole days until the current stock runs out at the given consumption
/// rate.
///
/// Returns `None` when `avg_daily_consumption` is zero: the product cannot
/// be projected to run out from current data, which must not be confused
/// with "about to run out" (0) or "never" (a huge number).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped before cast
pub fn days_until_stockout(current_stock: u32, avg_daily_consumption: f64) -> Option<u32> {
    if avg_daily_consumption <= 0.0 {
        return None;
    }
    let days = (f64::from(current_stock) / avg_daily_consumption).floor();
    Some(days.clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Suggested reorder quantity.
///
/// Zero while stock sits above the reorder point; otherwise at least enough
/// to clear the deficit and at least enough to cover expected consumption
/// through the lead time, whichever is larger.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped before cast
pub fn recommended_order(
    current_stock: u32,
    reorder_point: u32,
    avg_daily_consumption: f64,
    lead_time_days: u32,
) -> u32 {
    if current_stock > reorder_point {
        return 0;
    }
    let deficit = reorder_point - current_stock;
    let lead_cover = (avg_daily_consumption * f64::from(lead_time_days))
        .ceil()
        .clamp(0.0, f64::from(u32::MAX)) as u32;
    deficit.max(lead_cover)
}

/// Classifies the stock level; the reorder-point boundary is inclusive.
#[must_use]
pub const fn stock_status(current_stock: u32, reorder_point: u32) -> StockStatus {
    if current_stock == 0 {
        StockStatus::OutOfStock
    } else if current_stock <= reorder_point {
        StockStatus::LowStock
    } else {
        StockStatus::Normal
    }
}

/// Runs the full forecast pipeline for one product.
#[must_use]
pub fn predict(product: &Product, orders: &[Order], now: DateTime<Utc>) -> StockPrediction {
    let consumed = consumed_in_window(orders, product.id, now);
    let avg = average_daily_consumption(consumed);

    StockPrediction {
        product_id: product.id,
        name: product.name.clone(),
        current_stock: product.quantity,
        reorder_point: product.reorder_point,
        avg_daily_consumption: (avg * 10.0).round() / 10.0,
        days_until_stockout: days_until_stockout(product.quantity, avg),
        recommended_order: recommended_order(
            product.quantity,
            product.reorder_point,
            avg,
            DEFAULT_LEAD_TIME_DAYS,
        ),
        status: stock_status(product.quantity, product.reorder_point),
        last_updated: now,
    }
}
