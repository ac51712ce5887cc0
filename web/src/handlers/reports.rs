//! Reporting handlers.

use crate::error::AppError;
use crate::extractors::AuthPrincipal;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use stockroom_core::reports::{self, InventoryValueReport, StockMovement};
use stockroom_core::MANAGER_ROLES;

/// Query parameters for the movement history report.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    /// Range start; defaults to 30 days before the range end.
    pub start_date: Option<DateTime<Utc>>,
    /// Range end; defaults to now.
    pub end_date: Option<DateTime<Utc>>,
}

/// `GET /api/reports/inventory-value` — manager/admin only.
pub async fn inventory_value(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<InventoryValueReport>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;
    let products = state.catalog.list().await?;
    Ok(Json(reports::value_report(&products)))
}

/// `GET /api/reports/stock-movement?startDate=&endDate=`
pub async fn stock_movement(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
    Query(query): Query<MovementQuery>,
) -> Result<Json<Vec<StockMovement>>, AppError> {
    let to = query.end_date.unwrap_or_else(|| state.clock.now());
    let from = query.start_date.unwrap_or_else(|| to - Duration::days(30));
    if from > to {
        return Err(AppError::bad_request("startDate must not be after endDate"));
    }

    let orders = state.order_store.range(from, to).await.map_err(AppError::from)?;
    Ok(Json(reports::movement_history(&orders)))
}
