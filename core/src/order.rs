//! Order documents and the lifecycle state machine.
//!
//! Orders progress `pending → processing → shipped → delivered`; `cancelled`
//! is terminal and reachable from every non-terminal state. Cancellation is
//! the only transition with a side effect outside the order itself (stock
//! restoration), which is why it has its own operation on the lifecycle
//! manager rather than going through the plain status update.

use crate::types::{Money, OrderId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an order in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, stock reserved, awaiting fulfillment.
    Pending,
    /// Being picked and packed.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer (terminal).
    Delivered,
    /// Cancelled, stock restored (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Position in the forward fulfillment sequence.
    const fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Processing => Some(1),
            Self::Shipped => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// True for states that admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the order can still be cancelled from this state.
    ///
    /// Delivered orders cannot be cancelled: the goods have physically
    /// left, so restoring their stock would double-count them.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Processing | Self::Shipped)
    }

    /// Whether a direct status update to `next` is permitted.
    ///
    /// Only forward moves along the fulfillment sequence are allowed;
    /// `cancelled` is never reachable this way because skipping the
    /// cancel operation would skip the stock release.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Payment status of an order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Payment captured.
    Paid,
    /// Payment attempt failed.
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Customer contact details on an order. Only the name is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer name (required).
    pub name: String,
    /// Optional email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Shipping destination. Only the street is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street line (required).
    pub street: String,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A single line item on an order.
///
/// `price` and `name` are snapshotted from the catalog at order time and
/// must not follow later catalog edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product reference.
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Units ordered (≥ 1).
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Money,
}

impl OrderLine {
    /// Line total: quantity × snapshotted unit price.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// An order document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Human-readable order number, unique.
    pub order_number: String,
    /// Customer details.
    pub customer: Customer,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Ordered line items.
    pub items: Vec<OrderLine>,
    /// Derived total: `Σ line.quantity * line.price`.
    pub total_amount: Money,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User who created the order.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Computes the total amount of a set of lines.
    #[must_use]
    pub fn total_of(lines: &[OrderLine]) -> Money {
        lines.iter().map(OrderLine::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        use OrderStatus::{Cancelled, Delivered, Pending, Processing, Shipped};

        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        // Skipping intermediate states is a forward move.
        assert!(Pending.can_transition_to(Delivered));

        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Shipped));
        assert!(!Cancelled.can_transition_to(Pending));
        // Cancellation must go through the cancel operation.
        assert!(!Pending.can_transition_to(Cancelled));
    }

    #[test]
    fn cancellable_states() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn total_of_sums_line_totals() {
        let lines = vec![
            OrderLine {
                product_id: ProductId::new(),
                name: "Widget A".to_string(),
                quantity: 2,
                price: Money::from_dollars(10),
            },
            OrderLine {
                product_id: ProductId::new(),
                name: "Widget B".to_string(),
                quantity: 1,
                price: Money::from_dollars(15),
            },
        ];
        assert_eq!(Order::total_of(&lines), Money::from_dollars(35));
    }

    #[test]
    fn status_serializes_lowercase() {
        #[allow(clippy::unwrap_used)] // Test code
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
