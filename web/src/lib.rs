//! # Stockroom Web
//!
//! Axum REST and WebSocket layer over the Stockroom domain services:
//! handlers, route table, request extractors, and the domain-to-HTTP error
//! mapping. The server binary lives in `main.rs`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use extractors::{AuthPrincipal, CorrelationId};
pub use router::router;
pub use state::AppState;
