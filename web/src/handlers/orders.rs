//! Order lifecycle handlers.
//!
//! Creation is open to any authenticated principal (staff take orders);
//! status, payment and cancellation mutations require a manager or admin.

use crate::error::AppError;
use crate::extractors::{AuthPrincipal, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use stockroom_core::order::{Customer, ShippingAddress};
use stockroom_core::{
    LineRequest, MANAGER_ROLES, NewOrder, Order, OrderId, OrderStatus, PaymentStatus,
};

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Customer details.
    pub customer: Customer,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Requested lines.
    pub items: Vec<LineRequest>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target lifecycle status.
    pub status: OrderStatus,
}

/// Request body for a payment update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    /// Target payment status.
    pub payment_status: PaymentStatus,
}

/// `POST /api/orders` — reserve stock and create the order.
pub async fn create(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state
        .orders
        .create(
            principal.id,
            NewOrder {
                customer: body.customer,
                shipping_address: body.shipping_address,
                lines: body.items,
                notes: body.notes,
            },
        )
        .await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        order_id = %order.id,
        order_number = %order.order_number,
        "order accepted"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders` — all orders, newest first.
pub async fn list(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list().await?))
}

/// `GET /api/orders/:id`
pub async fn get(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.get(id).await?))
}

/// `PATCH /api/orders/:id/status` — manager/admin only; forward moves only.
pub async fn update_status(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;
    let order = state.orders.update_status(id, body.status).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        order_id = %order.id,
        status = %order.status,
        "order status changed"
    );
    Ok(Json(order))
}

/// `PATCH /api/orders/:id/payment` — manager/admin only.
pub async fn update_payment(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<Json<Order>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;
    let order = state.orders.update_payment(id, body.payment_status).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        order_id = %order.id,
        payment_status = %order.payment_status,
        "payment status changed"
    );
    Ok(Json(order))
}

/// `POST /api/orders/:id/cancel` — manager/admin only; restores stock.
pub async fn cancel(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;
    let order = state.orders.cancel(id).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        order_id = %order.id,
        "order cancelled"
    );
    Ok(Json(order))
}
