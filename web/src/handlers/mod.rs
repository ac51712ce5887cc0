//! HTTP and WebSocket handlers.

pub mod dashboard;
pub mod events;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;
