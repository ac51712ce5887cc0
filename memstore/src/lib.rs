//! # Stockroom Memstore
//!
//! In-memory implementation of the Stockroom store traits, used by the
//! server by default and by the integration test suite.
//!
//! Each store keeps its documents in a `tokio::sync::RwLock<HashMap>`.
//! The write lock serializes every mutation, which is what makes
//! [`Catalog::adjust_quantity`] a genuinely conditional, atomic operation:
//! the quantity check and the write happen under one critical section, so
//! two concurrent reservations for the same product cannot both pass a
//! stale check.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use stockroom_core::order::Order;
use stockroom_core::placement::Placement;
use stockroom_core::product::Product;
use stockroom_core::store::{
    Catalog, OrderStore, PlacementStore, StoreError, StoreFuture,
};
use stockroom_core::types::{OrderId, PlacementId, ProductId, UserId};
use tokio::sync::RwLock;

/// In-memory product catalog.
#[derive(Default)]
pub struct MemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with products (test/seed helper).
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }
}

impl Catalog for MemoryCatalog {
    fn insert(&self, product: Product) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let mut products = self.products.write().await;
            if products.values().any(|p| p.sku == product.sku) {
                return Err(StoreError::DuplicateKey {
                    field: "sku",
                    value: product.sku,
                });
            }
            products.insert(product.id, product.clone());
            Ok(product)
        })
    }

    fn get(&self, id: ProductId) -> StoreFuture<'_, Option<Product>> {
        Box::pin(async move { Ok(self.products.read().await.get(&id).cloned()) })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
            products.sort_by(|a, b| a.sku.cmp(&b.sku));
            Ok(products)
        })
    }

    fn update(&self, product: Product) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let mut products = self.products.write().await;
            if !products.contains_key(&product.id) {
                return Err(StoreError::Missing(product.id.to_string()));
            }
            if products
                .values()
                .any(|p| p.id != product.id && p.sku == product.sku)
            {
                return Err(StoreError::DuplicateKey {
                    field: "sku",
                    value: product.sku,
                });
            }
            products.insert(product.id, product.clone());
            Ok(product)
        })
    }

    fn delete(&self, id: ProductId) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.products.write().await.remove(&id).is_some()) })
    }

    fn adjust_quantity(&self, id: ProductId, delta: i64) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let mut products = self.products.write().await;
            let product = products
                .get_mut(&id)
                .ok_or_else(|| StoreError::Missing(id.to_string()))?;

            let next = i64::from(product.quantity) + delta;
            if next < 0 {
                tracing::debug!(
                    product_id = %id,
                    available = product.quantity,
                    delta,
                    "quantity adjustment rejected"
                );
                return Err(StoreError::QuantityConflict {
                    product_id: id,
                    available: product.quantity,
                    delta,
                });
            }
            product.quantity = u32::try_from(next).map_err(|_| StoreError::QuantityConflict {
                product_id: id,
                available: product.quantity,
                delta,
            })?;
            Ok(product.clone())
        })
    }

    fn set_reorder_point(&self, id: ProductId, reorder_point: u32) -> StoreFuture<'_, Product> {
        Box::pin(async move {
            let mut products = self.products.write().await;
            let product = products
                .get_mut(&id)
                .ok_or_else(|| StoreError::Missing(id.to_string()))?;
            product.reorder_point = reorder_point;
            Ok(product.clone())
        })
    }
}

/// In-memory order history store.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl MemoryOrderStore {
    /// Creates an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.order_number.cmp(&a.order_number))
    });
}

impl OrderStore for MemoryOrderStore {
    fn insert(&self, order: Order) -> StoreFuture<'_, Order> {
        Box::pin(async move {
            let mut orders = self.orders.write().await;
            if orders.values().any(|o| o.order_number == order.order_number) {
                return Err(StoreError::DuplicateKey {
                    field: "orderNumber",
                    value: order.order_number,
                });
            }
            orders.insert(order.id, order.clone());
            Ok(order)
        })
    }

    fn get(&self, id: OrderId) -> StoreFuture<'_, Option<Order>> {
        Box::pin(async move { Ok(self.orders.read().await.get(&id).cloned()) })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
            newest_first(&mut orders);
            Ok(orders)
        })
    }

    fn update(&self, order: Order) -> StoreFuture<'_, Order> {
        Box::pin(async move {
            let mut orders = self.orders.write().await;
            if !orders.contains_key(&order.id) {
                return Err(StoreError::Missing(order.id.to_string()));
            }
            orders.insert(order.id, order.clone());
            Ok(order)
        })
    }

    fn range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> StoreFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let mut orders: Vec<Order> = self
                .orders
                .read()
                .await
                .values()
                .filter(|o| o.created_at >= from && o.created_at <= to)
                .cloned()
                .collect();
            newest_first(&mut orders);
            Ok(orders)
        })
    }

    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move { Ok(self.orders.read().await.len() as u64) })
    }
}

/// In-memory placement store.
#[derive(Default)]
pub struct MemoryPlacementStore {
    placements: Arc<RwLock<HashMap<PlacementId, Placement>>>,
}

impl MemoryPlacementStore {
    /// Creates an empty placement store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlacementStore for MemoryPlacementStore {
    fn insert(&self, placement: Placement) -> StoreFuture<'_, Placement> {
        Box::pin(async move {
            self.placements
                .write()
                .await
                .insert(placement.id, placement.clone());
            Ok(placement)
        })
    }

    fn get(&self, id: PlacementId) -> StoreFuture<'_, Option<Placement>> {
        Box::pin(async move { Ok(self.placements.read().await.get(&id).cloned()) })
    }

    fn list_for_owner(&self, owner: UserId) -> StoreFuture<'_, Vec<Placement>> {
        Box::pin(async move {
            let mut placements: Vec<Placement> = self
                .placements
                .read()
                .await
                .values()
                .filter(|p| p.owner == owner)
                .cloned()
                .collect();
            placements.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(placements)
        })
    }

    fn delete(&self, id: PlacementId) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.placements.write().await.remove(&id).is_some()) })
    }
}
