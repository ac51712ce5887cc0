//! Route table.

use crate::handlers::{dashboard, events, health, inventory, orders, products, reports};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/:id", get(orders::get))
        .route("/api/orders/:id/status", patch(orders::update_status))
        .route("/api/orders/:id/payment", patch(orders::update_payment))
        .route("/api/orders/:id/cancel", post(orders::cancel))
        .route("/api/inventory", get(inventory::list).post(inventory::create))
        .route("/api/inventory/low-stock", get(inventory::low_stock))
        .route("/api/inventory/:id", delete(inventory::delete))
        .route(
            "/api/inventory/:id/reorder-point",
            patch(inventory::set_reorder_point),
        )
        .route("/api/dashboard", get(dashboard::report))
        .route("/api/reports/inventory-value", get(reports::inventory_value))
        .route("/api/reports/stock-movement", get(reports::stock_movement))
        .route("/api/ws", get(events::handle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
