//! Inventory placement handlers.
//!
//! Placements are owner-scoped: a principal only sees and removes their own.
//! Reorder-point changes are stock policy and require a manager or admin.

use crate::error::AppError;
use crate::extractors::{AuthPrincipal, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use stockroom_core::placement::Placement;
use stockroom_core::placements::{NewPlacement, PlacementView};
use stockroom_core::product::Product;
use stockroom_core::{MANAGER_ROLES, PlacementId, ProductId};

/// Request body for a reorder-point update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPointRequest {
    /// New restock threshold.
    pub reorder_point: u32,
}

/// `GET /api/inventory` — the caller's placements, oldest first.
pub async fn list(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<Vec<PlacementView>>, AppError> {
    Ok(Json(state.placements.list(principal.id).await?))
}

/// `POST /api/inventory` — record a placement and receive its stock.
pub async fn create(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Json(body): Json<NewPlacement>,
) -> Result<(StatusCode, Json<Placement>), AppError> {
    let now = state.clock.now();
    let placement = state.placements.create(principal.id, body, now).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        placement_id = %placement.id,
        product_id = %placement.product_id,
        quantity = placement.quantity,
        "placement recorded"
    );
    Ok((StatusCode::CREATED, Json(placement)))
}

/// `DELETE /api/inventory/:id` — remove a placement, withdrawing its stock.
pub async fn delete(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<PlacementId>,
) -> Result<StatusCode, AppError> {
    state.placements.delete(principal.id, id).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        placement_id = %id,
        "placement removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/inventory/low-stock` — products at or below reorder point.
pub async fn low_stock(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.placements.low_stock().await?))
}

/// `PATCH /api/inventory/:id/reorder-point` — manager/admin only. `:id` is
/// the product id.
pub async fn set_reorder_point(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<ProductId>,
    Json(body): Json<ReorderPointRequest>,
) -> Result<Json<Product>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;
    let product = state
        .placements
        .set_reorder_point(id, body.reorder_point)
        .await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        product_id = %product.id,
        reorder_point = product.reorder_point,
        "reorder point changed"
    );
    Ok(Json(product))
}
