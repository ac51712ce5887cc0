//! Order lifecycle manager.
//!
//! Drives order creation, status transitions, payment updates and
//! cancellation, delegating every stock effect to the [`StockLedger`].
//! Validation is checked eagerly, before any stock mutation, so validation
//! failures never require rollback.

use crate::environment::Clock;
use crate::error::Error;
use crate::events::{OrderStatusEvent, StatusFeed};
use crate::ledger::{LineRequest, StockLedger};
use crate::order::{Customer, Order, OrderStatus, PaymentStatus, ShippingAddress};
use crate::store::OrderStore;
use crate::types::{OrderId, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Input for order creation.
#[derive(Clone, Debug)]
pub struct NewOrder {
    /// Customer details; name is required.
    pub customer: Customer,
    /// Shipping destination; street is required.
    pub shipping_address: ShippingAddress,
    /// Requested line items.
    pub lines: Vec<LineRequest>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Generates unique, human-readable order numbers.
///
/// Date-prefixed monotonic sequence (`ORD250829-0001`). A shared atomic
/// counter makes numbers unique by construction under concurrent creation;
/// no retry-on-conflict is needed.
#[derive(Debug, Default)]
pub struct OrderNumberGenerator {
    counter: AtomicU64,
}

impl OrderNumberGenerator {
    /// Starts the sequence at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Starts the sequence after `already_issued` numbers, so a restarted
    /// process seeded with the store's order count keeps issuing fresh
    /// numbers.
    #[must_use]
    pub const fn starting_after(already_issued: u64) -> Self {
        Self {
            counter: AtomicU64::new(already_issued),
        }
    }

    /// Issues the next order number.
    #[must_use]
    pub fn next(&self, now: DateTime<Utc>) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("ORD{}-{seq:04}", now.format("%y%m%d"))
    }
}

/// The order lifecycle manager.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    ledger: StockLedger,
    clock: Arc<dyn Clock>,
    numbers: Arc<OrderNumberGenerator>,
    feed: StatusFeed,
}

impl OrderService {
    /// Creates the lifecycle manager.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderStore>,
        ledger: StockLedger,
        clock: Arc<dyn Clock>,
        numbers: Arc<OrderNumberGenerator>,
        feed: StatusFeed,
    ) -> Self {
        Self {
            orders,
            ledger,
            clock,
            numbers,
            feed,
        }
    }

    /// Creates an order: validate, reserve stock, persist.
    ///
    /// The order is only persisted after the whole reservation has
    /// committed; if persisting fails, the reservation is compensated
    /// before the error propagates, so a failed create leaves zero net
    /// stock change and no order document.
    ///
    /// # Errors
    ///
    /// Validation, not-found, insufficient-stock and store errors per the
    /// taxonomy in [`Error`].
    pub async fn create(&self, created_by: UserId, new: NewOrder) -> Result<Order, Error> {
        Self::validate(&new)?;

        let lines = self.ledger.reserve(&new.lines).await?;
        // Kept aside so a failed persist can compensate the reservation.
        let reserved = lines.clone();
        let now = self.clock.now();
        let order = Order {
            id: OrderId::new(),
            order_number: self.numbers.next(now),
            customer: new.customer,
            shipping_address: new.shipping_address,
            total_amount: Order::total_of(&lines),
            items: lines,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            notes: new.notes,
            created_by,
            created_at: now,
            updated_at: now,
        };

        match self.orders.insert(order).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    order_number = %order.order_number,
                    total = %order.total_amount,
                    "order created"
                );
                Ok(order)
            },
            Err(err) => {
                // The reservation is durable but the order is not; release
                // it so the failed create is observed as if nothing
                // happened.
                tracing::warn!(error = %err, "order persist failed, releasing reservation");
                if let Err(release_err) = self.ledger.release(&reserved).await {
                    tracing::error!(error = %release_err, "compensating release failed");
                }
                Err(err.into())
            },
        }
    }

    /// Fetches an order.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, Error> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found("Order", id))
    }

    /// Lists all orders, newest first.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on backend failure.
    pub async fn list(&self) -> Result<Vec<Order>, Error> {
        Ok(self.orders.list().await?)
    }

    /// Applies a direct status update along the forward transition graph
    /// and publishes the change to the status feed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] when the state machine rejects the
    /// move (including any attempt to reach `cancelled` this way).
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, Error> {
        let mut order = self.get(id).await?;
        if !order.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        order.updated_at = self.clock.now();
        let order = self.orders.update(order).await?;

        self.feed.publish(OrderStatusEvent {
            order_id: order.id,
            status: order.status,
        });
        tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
        Ok(order)
    }

    /// Updates the payment status. No stock effects.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] or [`Error::Store`].
    pub async fn update_payment(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order, Error> {
        let mut order = self.get(id).await?;
        order.payment_status = payment_status;
        order.updated_at = self.clock.now();
        Ok(self.orders.update(order).await?)
    }

    /// Cancels an order, restoring every line's stock.
    ///
    /// The status check makes cancellation single-shot: a second attempt
    /// finds `cancelled` and is rejected, so the release can never be
    /// applied twice. The release runs before the status write — an order
    /// is never recorded `cancelled` unless all of its stock came back.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] for already-cancelled or delivered
    /// orders; [`Error::NotFound`] or [`Error::Store`] otherwise.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, Error> {
        let mut order = self.get(id).await?;
        if !order.status.can_cancel() {
            return Err(Error::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        self.ledger.release(&order.items).await?;

        order.status = OrderStatus::Cancelled;
        order.updated_at = self.clock.now();
        let order = self.orders.update(order).await?;

        self.feed.publish(OrderStatusEvent {
            order_id: order.id,
            status: order.status,
        });
        tracing::info!(order_id = %order.id, "order cancelled, stock restored");
        Ok(order)
    }

    fn validate(new: &NewOrder) -> Result<(), Error> {
        if new.lines.is_empty() {
            return Err(Error::validation("Order must contain at least one item"));
        }
        if new.customer.name.trim().is_empty() {
            return Err(Error::validation("Customer name is required"));
        }
        if new.shipping_address.street.trim().is_empty() {
            return Err(Error::validation("Shipping address is required"));
        }
        if new.lines.iter().any(|line| line.quantity == 0) {
            return Err(Error::validation("Line quantity must be at least 1"));
        }
        Ok(())
    }
}
