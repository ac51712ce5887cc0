//! Placement flows against the in-memory stores.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use std::sync::Arc;
use stockroom_core::environment::Clock;
use stockroom_core::placements::{NewPlacement, PlacementService};
use stockroom_core::store::Catalog;
use stockroom_core::{Error, StockLedger, UserId};
use stockroom_memstore::{MemoryCatalog, MemoryPlacementStore};
use stockroom_testing::{product_fixture, test_clock};

fn service(catalog: Arc<MemoryCatalog>) -> PlacementService {
    PlacementService::new(
        Arc::new(MemoryPlacementStore::new()),
        catalog.clone(),
        StockLedger::new(catalog),
    )
}

fn placement_of(product_id: stockroom_core::ProductId, quantity: u32) -> NewPlacement {
    NewPlacement {
        product_id,
        location: "B-12".to_string(),
        quantity,
        minimum_quantity: 2,
        maximum_quantity: Some(50),
        notes: None,
    }
}

#[tokio::test]
async fn creating_a_placement_receives_stock() {
    let product = product_fixture("SKU-1", 10, 2);
    let catalog = Arc::new(MemoryCatalog::with_products([product.clone()]));
    let service = service(catalog.clone());
    let owner = UserId::new();

    let placement = service
        .create(owner, placement_of(product.id, 8), test_clock().now())
        .await
        .unwrap();
    assert_eq!(placement.quantity, 8);

    let stored = catalog.get(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 18);

    let views = service.list(owner).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, product.name);
    assert_eq!(views[0].sku, product.sku);
    assert_eq!(views[0].quantity, 8);
}

#[tokio::test]
async fn placement_for_unknown_product_is_rejected() {
    let catalog = Arc::new(MemoryCatalog::new());
    let service = service(catalog);

    let err = service
        .create(
            UserId::new(),
            placement_of(stockroom_core::ProductId::new(), 5),
            test_clock().now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn deleting_a_placement_withdraws_its_units() {
    let product = product_fixture("SKU-1", 10, 2);
    let catalog = Arc::new(MemoryCatalog::with_products([product.clone()]));
    let service = service(catalog.clone());
    let owner = UserId::new();

    let placement = service
        .create(owner, placement_of(product.id, 5), test_clock().now())
        .await
        .unwrap();
    assert_eq!(catalog.get(product.id).await.unwrap().unwrap().quantity, 15);

    service.delete(owner, placement.id).await.unwrap();
    assert_eq!(catalog.get(product.id).await.unwrap().unwrap().quantity, 10);
    assert!(service.list(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn placements_are_owner_scoped() {
    let product = product_fixture("SKU-1", 10, 2);
    let catalog = Arc::new(MemoryCatalog::with_products([product.clone()]));
    let service = service(catalog.clone());
    let owner = UserId::new();
    let stranger = UserId::new();

    let placement = service
        .create(owner, placement_of(product.id, 5), test_clock().now())
        .await
        .unwrap();

    assert!(service.list(stranger).await.unwrap().is_empty());
    let err = service.delete(stranger, placement.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    // The failed delete must not have withdrawn anything.
    assert_eq!(catalog.get(product.id).await.unwrap().unwrap().quantity, 15);
}

#[tokio::test]
async fn low_stock_reports_products_at_or_below_reorder_point() {
    let low = product_fixture("SKU-1", 2, 5);
    let boundary = product_fixture("SKU-2", 5, 5);
    let healthy = product_fixture("SKU-3", 50, 5);
    let catalog = Arc::new(MemoryCatalog::with_products([
        low.clone(),
        boundary.clone(),
        healthy,
    ]));
    let service = service(catalog);

    let flagged = service.low_stock().await.unwrap();
    let skus: Vec<&str> = flagged.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, ["SKU-1", "SKU-2"]);
}

#[tokio::test]
async fn reorder_point_updates_apply_to_the_catalog() {
    let product = product_fixture("SKU-1", 10, 2);
    let catalog = Arc::new(MemoryCatalog::with_products([product.clone()]));
    let service = service(catalog.clone());

    let updated = service.set_reorder_point(product.id, 9).await.unwrap();
    assert_eq!(updated.reorder_point, 9);
    assert!(updated.is_low_stock());

    let err = service
        .set_reorder_point(stockroom_core::ProductId::new(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
