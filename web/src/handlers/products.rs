//! Product catalog handlers.
//!
//! Reads are open to any authenticated principal; mutations require a
//! manager or admin. On-hand quantity is not editable here beyond the
//! initial stock of a new product: quantity changes flow through orders and
//! inventory placements so the ledger stays the single authority.

use crate::error::AppError;
use crate::extractors::{AuthPrincipal, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use stockroom_core::product::Product;
use stockroom_core::types::Money;
use stockroom_core::{MANAGER_ROLES, ProductId};

/// Request body for creating a product. Monetary amounts are in cents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Unique business key.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Category for the value report breakdown.
    pub category: String,
    /// Sale unit price in cents.
    pub price: Money,
    /// Unit cost in cents.
    pub cost: Money,
    /// Initial on-hand units.
    #[serde(default)]
    pub quantity: u32,
    /// Restock threshold.
    #[serde(default)]
    pub reorder_point: u32,
    /// Primary storage bin.
    #[serde(default)]
    pub location: String,
}

/// Request body for editing a product. Absent fields keep their value;
/// on-hand quantity is deliberately not part of this surface.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// New business key.
    pub sku: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New sale unit price in cents.
    pub price: Option<Money>,
    /// New unit cost in cents.
    pub cost: Option<Money>,
    /// New restock threshold.
    pub reorder_point: Option<u32>,
    /// New storage bin.
    pub location: Option<String>,
}

/// `GET /api/products` — full catalog listing.
pub async fn list(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list().await?))
}

/// `GET /api/products/:id`
pub async fn get(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", id))?;
    Ok(Json(product))
}

/// `POST /api/products` — manager/admin only.
pub async fn create(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;

    let now = state.clock.now();
    let product = Product {
        id: ProductId::new(),
        sku: body.sku,
        name: body.name,
        category: body.category,
        price: body.price,
        cost: body.cost,
        quantity: body.quantity,
        reorder_point: body.reorder_point,
        location: body.location,
        created_at: now,
        updated_at: now,
    };
    product.validate().map_err(AppError::from)?;

    let product = state.catalog.insert(product).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        product_id = %product.id,
        sku = %product.sku,
        "product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/:id` — manager/admin only.
pub async fn update(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;

    let mut product = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", id))?;

    if let Some(sku) = body.sku {
        product.sku = sku;
    }
    if let Some(name) = body.name {
        product.name = name;
    }
    if let Some(category) = body.category {
        product.category = category;
    }
    if let Some(price) = body.price {
        product.price = price;
    }
    if let Some(cost) = body.cost {
        product.cost = cost;
    }
    if let Some(reorder_point) = body.reorder_point {
        product.reorder_point = reorder_point;
    }
    if let Some(location) = body.location {
        product.location = location;
    }
    product.updated_at = state.clock.now();
    product.validate().map_err(AppError::from)?;

    let product = state.catalog.update(product).await?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        product_id = %product.id,
        "product updated"
    );
    Ok(Json(product))
}

/// `DELETE /api/products/:id` — manager/admin only.
pub async fn delete(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    principal.require(MANAGER_ROLES).map_err(AppError::from)?;

    if state.catalog.delete(id).await? {
        tracing::info!(
            correlation_id = %correlation_id.0,
            product_id = %id,
            "product deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Product", id))
    }
}
