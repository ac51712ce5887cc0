//! Stockroom server binary.
//!
//! Wires the in-memory store backend into the domain services and serves
//! the REST/WebSocket API. Listen address comes from `STOCKROOM_ADDR`
//! (default `0.0.0.0:3000`); log filtering from `RUST_LOG`.

use anyhow::Result;
use std::sync::Arc;
use stockroom_core::OrderNumberGenerator;
use stockroom_core::environment::SystemClock;
use stockroom_core::store::OrderStore;
use stockroom_memstore::{MemoryCatalog, MemoryOrderStore, MemoryPlacementStore};
use stockroom_web::{AppState, router};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = Arc::new(MemoryCatalog::new());
    let order_store = Arc::new(MemoryOrderStore::new());
    let placement_store = Arc::new(MemoryPlacementStore::new());

    // Seed the order-number sequence past everything already issued, so a
    // restart against a persistent backend keeps numbers unique.
    let issued = order_store.count().await?;
    let numbers = Arc::new(OrderNumberGenerator::starting_after(issued));

    let state = AppState::new(
        catalog,
        order_store,
        placement_store,
        Arc::new(SystemClock),
        numbers,
    );

    let addr = std::env::var("STOCKROOM_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "stockroom server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
