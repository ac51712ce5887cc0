//! Product catalog documents.

use crate::error::Error;
use crate::types::{Money, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stocked item.
///
/// `quantity` is the on-hand running total and the system of record for
/// stock; it is mutated only through the ledger's conditional adjustment
/// path, never by replacing the whole document. Location-level placements
/// are a breakdown of this aggregate, not a second authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Unique business key.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Category used by the value report breakdown.
    pub category: String,
    /// Sale unit price.
    pub price: Money,
    /// Unit cost.
    pub cost: Money,
    /// On-hand units. Core invariant: never negative.
    pub quantity: u32,
    /// Threshold at or below which restock is recommended.
    pub reorder_point: u32,
    /// Primary storage bin.
    pub location: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Sale value of the on-hand stock.
    #[must_use]
    pub const fn stock_value(&self) -> Money {
        self.price.times(self.quantity)
    }

    /// Cost basis of the on-hand stock.
    #[must_use]
    pub const fn cost_value(&self) -> Money {
        self.cost.times(self.quantity)
    }

    /// True when on-hand quantity is at or below the reorder point.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    /// Validates catalog invariants on a new or edited product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty SKU or name, or a
    /// negative price or cost.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sku.trim().is_empty() {
            return Err(Error::validation("Product SKU is required"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::validation("Product name is required"));
        }
        if self.price.is_negative() {
            return Err(Error::validation("Product price must not be negative"));
        }
        if self.cost.is_negative() {
            return Err(Error::validation("Product cost must not be negative"));
        }
        Ok(())
    }
}
