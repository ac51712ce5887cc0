//! Real-time order-status feed.
//!
//! Every successful status change is published to all connected listeners.
//! Delivery is fire-and-forget: there is no acknowledgement and no
//! backpressure, and a subscriber that falls behind the channel capacity
//! observes a lag error and misses events rather than stalling publishers.

use crate::order::OrderStatus;
use crate::types::OrderId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default channel capacity before slow subscribers start lagging.
const DEFAULT_CAPACITY: usize = 256;

/// A status-change notification as broadcast to listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    /// The order whose status changed.
    pub order_id: OrderId,
    /// The new status.
    pub status: OrderStatus,
}

/// Broadcast feed of order-status changes.
#[derive(Clone, Debug)]
pub struct StatusFeed {
    tx: broadcast::Sender<OrderStatusEvent>,
}

impl StatusFeed {
    /// Creates a feed with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a feed with an explicit channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes a status change to all current subscribers.
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: OrderStatusEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(
                    order_id = %event.order_id,
                    status = %event.status,
                    receivers,
                    "order status published"
                );
            },
            Err(_) => {
                tracing::debug!(
                    order_id = %event.order_id,
                    status = %event.status,
                    "order status published with no listeners"
                );
            },
        }
    }

    /// Subscribes to future status changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrderStatusEvent> {
        self.tx.subscribe()
    }
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new()
    }
}
