//! Stock ledger: the single authority for quantity changes.
//!
//! Every durable change to a product's on-hand quantity flows through this
//! type — order reservations and their compensating releases, and receipt/
//! withdrawal from inventory placements. All of them bottom out in the
//! catalog's conditional [`adjust_quantity`] primitive, so a quantity can
//! never be observed negative and concurrent reservations cannot both pass
//! a stale stock check.
//!
//! A multi-line reservation is all-or-nothing: lines are committed one at a
//! time, and the first failure triggers a compensating release of every
//! line committed earlier in the same attempt before the error is returned.
//! There is no cross-product ordering or global lock; atomicity per product
//! comes from the store primitive, and atomicity across the line set from
//! the compensation.
//!
//! [`adjust_quantity`]: crate::store::Catalog::adjust_quantity

use crate::error::Error;
use crate::order::OrderLine;
use crate::product::Product;
use crate::store::{Catalog, StoreError};
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A requested line: how many units of which product.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    /// Product to reserve from.
    pub product_id: ProductId,
    /// Units requested (≥ 1).
    pub quantity: u32,
}

/// The stock ledger.
#[derive(Clone)]
pub struct StockLedger {
    catalog: Arc<dyn Catalog>,
}

impl StockLedger {
    /// Creates a ledger over the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Reserves stock for a set of lines, all-or-nothing.
    ///
    /// For each line, in the given order, the product is looked up (for the
    /// price and name snapshot) and its quantity is decremented through the
    /// conditional store primitive. On the first failure every previously
    /// committed line is released again, so a returned error means zero net
    /// change.
    ///
    /// Returns the committed lines with their price snapshots.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a zero-quantity line (checked before any
    ///   decrement).
    /// - [`Error::NotFound`] if a referenced product does not exist.
    /// - [`Error::InsufficientStock`] if any line exceeds the on-hand
    ///   quantity at commit time.
    /// - [`Error::Store`] for backend failures.
    pub async fn reserve(&self, requests: &[LineRequest]) -> Result<Vec<OrderLine>, Error> {
        for request in requests {
            if request.quantity == 0 {
                return Err(Error::validation("Line quantity must be at least 1"));
            }
        }

        let mut committed: Vec<OrderLine> = Vec::with_capacity(requests.len());
        for request in requests {
            match self.commit_line(*request).await {
                Ok(line) => committed.push(line),
                Err(err) => {
                    self.rollback(&committed).await;
                    return Err(err);
                },
            }
        }
        Ok(committed)
    }

    /// Releases previously reserved stock, e.g. on order cancellation.
    ///
    /// The lifecycle manager guarantees this runs at most once per order by
    /// checking the order status before transitioning to `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if an increment fails; lines released
    /// before the failure stay released.
    pub async fn release(&self, lines: &[OrderLine]) -> Result<(), Error> {
        for line in lines {
            self.catalog
                .adjust_quantity(line.product_id, i64::from(line.quantity))
                .await?;
            tracing::debug!(
                product_id = %line.product_id,
                quantity = line.quantity,
                "stock released"
            );
        }
        Ok(())
    }

    /// Receives units into stock (inventory receipt).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product does not exist, or
    /// [`Error::Store`] on backend failure.
    pub async fn receive(&self, product_id: ProductId, quantity: u32) -> Result<Product, Error> {
        match self
            .catalog
            .adjust_quantity(product_id, i64::from(quantity))
            .await
        {
            Ok(product) => Ok(product),
            Err(StoreError::Missing(_)) => Err(Error::not_found("Product", product_id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Withdraws units from stock (e.g. when a placement is removed).
    ///
    /// Conditional: fails without writing when the withdrawal would take
    /// the aggregate below zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::InsufficientStock`], or
    /// [`Error::Store`].
    pub async fn withdraw(&self, product_id: ProductId, quantity: u32) -> Result<Product, Error> {
        let delta = -i64::from(quantity);
        match self.catalog.adjust_quantity(product_id, delta).await {
            Ok(product) => Ok(product),
            Err(StoreError::Missing(_)) => Err(Error::not_found("Product", product_id)),
            Err(StoreError::QuantityConflict { available, .. }) => {
                let product = self.product_name(product_id).await;
                Err(Error::InsufficientStock {
                    product,
                    requested: quantity,
                    available,
                })
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Commits a single line: snapshot, then conditional decrement.
    async fn commit_line(&self, request: LineRequest) -> Result<OrderLine, Error> {
        let product = self
            .catalog
            .get(request.product_id)
            .await?
            .ok_or_else(|| Error::not_found("Product", request.product_id))?;

        let delta = -i64::from(request.quantity);
        match self.catalog.adjust_quantity(request.product_id, delta).await {
            Ok(_) => Ok(OrderLine {
                product_id: product.id,
                name: product.name,
                quantity: request.quantity,
                price: product.price,
            }),
            Err(StoreError::QuantityConflict { available, .. }) => {
                Err(Error::InsufficientStock {
                    product: product.name,
                    requested: request.quantity,
                    available,
                })
            },
            Err(StoreError::Missing(_)) => Err(Error::not_found("Product", request.product_id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Compensating release for lines committed earlier in a failed
    /// reservation. Best effort: a failure here is logged, not propagated,
    /// because the original error is what the caller must see.
    async fn rollback(&self, committed: &[OrderLine]) {
        for line in committed {
            if let Err(err) = self
                .catalog
                .adjust_quantity(line.product_id, i64::from(line.quantity))
                .await
            {
                tracing::error!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %err,
                    "failed to roll back committed reservation line"
                );
            }
        }
    }

    async fn product_name(&self, product_id: ProductId) -> String {
        match self.catalog.get(product_id).await {
            Ok(Some(product)) => product.name,
            _ => product_id.to_string(),
        }
    }
}
