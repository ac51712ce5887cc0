//! Inventory placement documents.
//!
//! A placement records where units of a product physically sit. It is a
//! breakdown of the product's aggregate quantity, not a second authority:
//! creating one receives stock into the aggregate and deleting one
//! withdraws it, both through the ledger.

use crate::types::{PlacementId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A location-level stock record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Unique identifier.
    pub id: PlacementId,
    /// Product held at this location.
    pub product_id: ProductId,
    /// Storage location (bin, shelf, zone).
    pub location: String,
    /// Units at this location.
    pub quantity: u32,
    /// Minimum desired units at this location.
    pub minimum_quantity: u32,
    /// Maximum capacity at this location, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_quantity: Option<u32>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User who owns the record.
    pub owner: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
