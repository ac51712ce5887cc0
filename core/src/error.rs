//! Domain error taxonomy.
//!
//! Validation and authorization errors are raised before any mutation, so
//! they never require rollback. Stock-level failures are produced by the
//! ledger only after it has restored any partially-committed lines, so a
//! caller observing [`Error::InsufficientStock`] can assume nothing changed.

use crate::auth::Role;
use crate::order::OrderStatus;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the domain services.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid input, rejected before any mutation.
    #[error("{0}")]
    Validation(String),

    /// A referenced document does not exist.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of document that was looked up.
        resource: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A requested quantity exceeds the on-hand quantity for a product.
    /// The whole reservation has been rolled back.
    #[error("insufficient stock for {product}: requested {requested}, on hand {available}")]
    InsufficientStock {
        /// Product name, for operator-facing messages.
        product: String,
        /// Units requested by the failing line.
        requested: u32,
        /// Units actually on hand at commit time.
        available: u32,
    },

    /// An order status change that the lifecycle state machine does not
    /// permit (including a second cancellation attempt).
    #[error("cannot transition order from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current order status.
        from: OrderStatus,
        /// Requested order status.
        to: OrderStatus,
    },

    /// The principal lacks the role required for this operation.
    #[error("operation requires one of roles: {required:?}")]
    Forbidden {
        /// Roles that would be accepted.
        required: &'static [Role],
    },

    /// Persistence failure; no partial state is assumed committed beyond
    /// what the store's own guarantees provide.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a not-found failure.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
