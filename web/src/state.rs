//! Application state for Axum handlers.

use std::sync::Arc;
use stockroom_core::dashboard::DashboardAggregator;
use stockroom_core::environment::Clock;
use stockroom_core::placements::PlacementService;
use stockroom_core::store::{Catalog, OrderStore, PlacementStore};
use stockroom_core::{OrderNumberGenerator, OrderService, StatusFeed, StockLedger};

/// Application state shared across all HTTP handlers.
///
/// Holds the domain services wired over one set of stores. Cloning is cheap:
/// every field is an `Arc` or a handle over one.
#[derive(Clone)]
pub struct AppState {
    /// Product catalog store, used directly by the catalog CRUD handlers.
    pub catalog: Arc<dyn Catalog>,
    /// Order history store, used by the report handlers for range queries.
    pub order_store: Arc<dyn OrderStore>,
    /// Order lifecycle manager.
    pub orders: OrderService,
    /// Inventory placement service.
    pub placements: PlacementService,
    /// Dashboard read side.
    pub dashboard: DashboardAggregator,
    /// Order-status broadcast feed (WebSocket source).
    pub feed: StatusFeed,
    /// Clock used for document timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the domain services over the given stores and clock.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        order_store: Arc<dyn OrderStore>,
        placement_store: Arc<dyn PlacementStore>,
        clock: Arc<dyn Clock>,
        numbers: Arc<OrderNumberGenerator>,
    ) -> Self {
        let ledger = StockLedger::new(catalog.clone());
        let feed = StatusFeed::new();
        let orders = OrderService::new(
            order_store.clone(),
            ledger.clone(),
            clock.clone(),
            numbers,
            feed.clone(),
        );
        let placements = PlacementService::new(placement_store, catalog.clone(), ledger);
        let dashboard = DashboardAggregator::new(catalog.clone(), order_store.clone(), clock.clone());

        Self {
            catalog,
            order_store,
            orders,
            placements,
            dashboard,
            feed,
            clock,
        }
    }
}
