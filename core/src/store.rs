//! Document store abstractions.
//!
//! The persistence engine is an external collaborator: these traits describe
//! exactly the per-document CRUD, conditional-update and range-query surface
//! the domain needs, and nothing about storage or indexing internals.
//!
//! # Dyn compatibility
//!
//! The traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so they can be used as trait objects (`Arc<dyn Catalog>`)
//! shared across services and handlers.
//!
//! # The conditional quantity primitive
//!
//! [`Catalog::adjust_quantity`] is the one operation with semantics beyond
//! plain CRUD: it must apply the delta against the *currently stored*
//! quantity and fail (without writing) when the result would be negative,
//! as a single atomic operation. The stock ledger is built entirely on this
//! primitive; a backend that checks and writes in two separately visible
//! steps would reintroduce the lost-update/overselling hazard.

use crate::order::Order;
use crate::placement::Placement;
use crate::product::Product;
use crate::types::{OrderId, PlacementId, ProductId, UserId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by store trait methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors that can occur during store operations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Conditional quantity adjustment rejected: the delta would take the
    /// stored quantity below zero. Nothing was written.
    #[error("quantity conflict for product {product_id}: on hand {available}, delta {delta}")]
    QuantityConflict {
        /// Product whose adjustment was rejected.
        product_id: ProductId,
        /// Quantity on hand at the time of the attempt.
        available: u32,
        /// The rejected delta.
        delta: i64,
    },

    /// A uniqueness constraint was violated.
    #[error("duplicate {field}: {value}")]
    DuplicateKey {
        /// The constrained field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// The referenced document does not exist.
    #[error("document not found: {0}")]
    Missing(String),

    /// Backend failure (connection, I/O, serialization).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Product catalog store.
///
/// `quantity` is the critical shared mutable field; everything else is plain
/// per-document CRUD.
pub trait Catalog: Send + Sync {
    /// Inserts a new product.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the SKU is already taken.
    fn insert(&self, product: Product) -> StoreFuture<'_, Product>;

    /// Fetches a product by id.
    fn get(&self, id: ProductId) -> StoreFuture<'_, Option<Product>>;

    /// Lists all products.
    fn list(&self) -> StoreFuture<'_, Vec<Product>>;

    /// Replaces a product document.
    ///
    /// Fails with [`StoreError::Missing`] if the product does not exist.
    fn update(&self, product: Product) -> StoreFuture<'_, Product>;

    /// Deletes a product. Returns `false` if it did not exist.
    fn delete(&self, id: ProductId) -> StoreFuture<'_, bool>;

    /// Atomically applies `delta` to the stored quantity.
    ///
    /// Must evaluate against the current stored value and fail with
    /// [`StoreError::QuantityConflict`] (writing nothing) when the result
    /// would be negative. Returns the updated product.
    fn adjust_quantity(&self, id: ProductId, delta: i64) -> StoreFuture<'_, Product>;

    /// Updates a product's reorder point.
    fn set_reorder_point(&self, id: ProductId, reorder_point: u32) -> StoreFuture<'_, Product>;
}

/// Order history store: append-mostly, with a date range query feeding the
/// forecast pipeline.
pub trait OrderStore: Send + Sync {
    /// Persists a new order.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the order number is taken.
    fn insert(&self, order: Order) -> StoreFuture<'_, Order>;

    /// Fetches an order by id.
    fn get(&self, id: OrderId) -> StoreFuture<'_, Option<Order>>;

    /// Lists all orders, newest first.
    fn list(&self) -> StoreFuture<'_, Vec<Order>>;

    /// Replaces an order document.
    fn update(&self, order: Order) -> StoreFuture<'_, Order>;

    /// Orders created within `[from, to]`, newest first.
    fn range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> StoreFuture<'_, Vec<Order>>;

    /// Total number of orders ever created.
    fn count(&self) -> StoreFuture<'_, u64>;
}

/// Inventory placement store (location-level breakdown records).
pub trait PlacementStore: Send + Sync {
    /// Persists a new placement.
    fn insert(&self, placement: Placement) -> StoreFuture<'_, Placement>;

    /// Fetches a placement by id.
    fn get(&self, id: PlacementId) -> StoreFuture<'_, Option<Placement>>;

    /// Lists placements owned by a user.
    fn list_for_owner(&self, owner: UserId) -> StoreFuture<'_, Vec<Placement>>;

    /// Deletes a placement. Returns `false` if it did not exist.
    fn delete(&self, id: PlacementId) -> StoreFuture<'_, bool>;
}
