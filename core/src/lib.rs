//! # Stockroom Core
//!
//! Domain model, stock ledger and forecast engine for the Stockroom
//! warehouse-management backend.
//!
//! The crate follows "Functional Core, Imperative Shell": everything that
//! can be a pure function over snapshots (forecasting, dashboard and report
//! composition, the lifecycle state machine) is one, and everything with a
//! side effect goes through an explicit seam — the store traits in
//! [`store`] and the [`Clock`](environment::Clock) abstraction.
//!
//! ## Core invariants
//!
//! - `Product.quantity` never goes negative, and every durable change to it
//!   flows through the [`StockLedger`](ledger::StockLedger) on top of the
//!   store's conditional [`adjust_quantity`](store::Catalog::adjust_quantity)
//!   primitive.
//! - Multi-line reservations are all-or-nothing: any failure rolls back the
//!   lines already committed in the same attempt.
//! - `Order.totalAmount == Σ line.quantity × line.price`, with prices
//!   snapshotted at order time.
//! - Cancellation releases stock exactly once, and an order is never
//!   recorded `cancelled` before its stock came back.

pub mod auth;
pub mod dashboard;
pub mod environment;
pub mod error;
pub mod events;
pub mod forecast;
pub mod ledger;
pub mod order;
pub mod orders;
pub mod placement;
pub mod placements;
pub mod product;
pub mod reports;
pub mod store;
pub mod types;

pub use auth::{MANAGER_ROLES, Principal, Role};
pub use error::Error;
pub use events::{OrderStatusEvent, StatusFeed};
pub use ledger::{LineRequest, StockLedger};
pub use order::{Order, OrderLine, OrderStatus, PaymentStatus};
pub use orders::{NewOrder, OrderNumberGenerator, OrderService};
pub use product::Product;
pub use types::{Money, OrderId, PlacementId, ProductId, UserId};
