//! Inventory placement management.
//!
//! Placements break the product aggregate down by physical location.
//! Their quantity changes go through the ledger's receive/withdraw paths so
//! `Product.quantity` stays the single system of record and can never go
//! negative when a placement is removed.

use crate::error::Error;
use crate::ledger::StockLedger;
use crate::placement::Placement;
use crate::product::Product;
use crate::store::{Catalog, PlacementStore};
use crate::types::{PlacementId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input for creating a placement.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlacement {
    /// Product being placed.
    pub product_id: ProductId,
    /// Storage location.
    pub location: String,
    /// Units received into this location.
    pub quantity: u32,
    /// Minimum desired units.
    #[serde(default)]
    pub minimum_quantity: u32,
    /// Maximum capacity, if bounded.
    #[serde(default)]
    pub maximum_quantity: Option<u32>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A placement joined with its product's identity for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    /// Placement identifier.
    pub id: PlacementId,
    /// Product identifier.
    pub product_id: ProductId,
    /// Product name, or a fallback when the product was deleted.
    pub name: String,
    /// Product SKU, empty when the product was deleted.
    pub sku: String,
    /// Units at this location.
    pub quantity: u32,
    /// Storage location.
    pub location: String,
    /// Minimum desired units.
    pub minimum_quantity: u32,
    /// Maximum capacity, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_quantity: Option<u32>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Placement management service.
#[derive(Clone)]
pub struct PlacementService {
    placements: Arc<dyn PlacementStore>,
    catalog: Arc<dyn Catalog>,
    ledger: StockLedger,
}

impl PlacementService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        placements: Arc<dyn PlacementStore>,
        catalog: Arc<dyn Catalog>,
        ledger: StockLedger,
    ) -> Self {
        Self {
            placements,
            catalog,
            ledger,
        }
    }

    /// Records a placement and receives its units into the product
    /// aggregate.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a blank location or zero quantity,
    /// [`Error::NotFound`] for a missing product, [`Error::Store`] on
    /// backend failure.
    pub async fn create(
        &self,
        owner: UserId,
        new: NewPlacement,
        now: DateTime<Utc>,
    ) -> Result<Placement, Error> {
        if new.location.trim().is_empty() {
            return Err(Error::validation("Placement location is required"));
        }
        if new.quantity == 0 {
            return Err(Error::validation("Placement quantity must be at least 1"));
        }

        // Receipt first: it is the call that can fail on a missing product.
        self.ledger.receive(new.product_id, new.quantity).await?;

        let placement = Placement {
            id: PlacementId::new(),
            product_id: new.product_id,
            location: new.location,
            quantity: new.quantity,
            minimum_quantity: new.minimum_quantity,
            maximum_quantity: new.maximum_quantity,
            notes: new.notes,
            owner,
            created_at: now,
        };

        match self.placements.insert(placement).await {
            Ok(placement) => Ok(placement),
            Err(err) => {
                // Compensate the receipt so the aggregate stays consistent
                // with the recorded placements.
                if let Err(withdraw_err) =
                    self.ledger.withdraw(new.product_id, new.quantity).await
                {
                    tracing::error!(
                        product_id = %new.product_id,
                        error = %withdraw_err,
                        "failed to compensate placement receipt"
                    );
                }
                Err(err.into())
            },
        }
    }

    /// Deletes a placement, withdrawing its units from the product
    /// aggregate first.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the placement does not exist or belongs to a
    /// different owner; [`Error::InsufficientStock`] if the aggregate no
    /// longer holds the placement's units (the placement is kept in that
    /// case).
    pub async fn delete(&self, owner: UserId, id: PlacementId) -> Result<(), Error> {
        let placement = self
            .placements
            .get(id)
            .await?
            .filter(|p| p.owner == owner)
            .ok_or_else(|| Error::not_found("Inventory item", id))?;

        self.ledger
            .withdraw(placement.product_id, placement.quantity)
            .await?;
        self.placements.delete(id).await?;
        Ok(())
    }

    /// Lists a user's placements joined with product identity.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on backend failure.
    pub async fn list(&self, owner: UserId) -> Result<Vec<PlacementView>, Error> {
        let placements = self.placements.list_for_owner(owner).await?;
        let mut views = Vec::with_capacity(placements.len());
        for placement in placements {
            let product = self.catalog.get(placement.product_id).await?;
            let (name, sku) = match product {
                Some(p) => (p.name, p.sku),
                None => ("Unknown Product".to_string(), String::new()),
            };
            views.push(PlacementView {
                id: placement.id,
                product_id: placement.product_id,
                name,
                sku,
                quantity: placement.quantity,
                location: placement.location,
                minimum_quantity: placement.minimum_quantity,
                maximum_quantity: placement.maximum_quantity,
                notes: placement.notes,
            });
        }
        Ok(views)
    }

    /// Products at or below their reorder point.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on backend failure.
    pub async fn low_stock(&self) -> Result<Vec<Product>, Error> {
        let products = self.catalog.list().await?;
        Ok(products.into_iter().filter(Product::is_low_stock).collect())
    }

    /// Updates a product's reorder point.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for a missing product.
    pub async fn set_reorder_point(
        &self,
        product_id: ProductId,
        reorder_point: u32,
    ) -> Result<Product, Error> {
        match self.catalog.set_reorder_point(product_id, reorder_point).await {
            Ok(product) => Ok(product),
            Err(crate::store::StoreError::Missing(_)) => {
                Err(Error::not_found("Product", product_id))
            },
            Err(err) => Err(err.into()),
        }
    }
}
