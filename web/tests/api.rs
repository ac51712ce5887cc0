//! HTTP-level tests over the full router with in-memory stores.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use axum_test::{TestRequest, TestServer};
use http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use stockroom_core::{OrderNumberGenerator, UserId};
use stockroom_memstore::{MemoryCatalog, MemoryOrderStore, MemoryPlacementStore};
use stockroom_testing::test_clock;
use stockroom_web::{AppState, router};

fn server() -> TestServer {
    let state = AppState::new(
        Arc::new(MemoryCatalog::new()),
        Arc::new(MemoryOrderStore::new()),
        Arc::new(MemoryPlacementStore::new()),
        Arc::new(test_clock()),
        Arc::new(OrderNumberGenerator::new()),
    );
    TestServer::new(router(state)).unwrap()
}

fn with_identity(request: TestRequest, user: UserId, role: &str) -> TestRequest {
    request
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&user.to_string()).unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_str(role).unwrap(),
        )
}

async fn create_product(server: &TestServer, manager: UserId, sku: &str, quantity: u32) -> Value {
    let response = with_identity(server.post("/api/products"), manager, "manager")
        .json(&json!({
            "sku": sku,
            "name": format!("Product {sku}"),
            "category": "general",
            "price": 1000,
            "cost": 400,
            "quantity": quantity,
            "reorderPoint": 2,
            "location": "A-01",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

fn order_body(product_id: &Value, quantity: u32) -> Value {
    json!({
        "customer": { "name": "Ada Lovelace" },
        "shippingAddress": { "street": "1 Analytical Way" },
        "items": [{ "productId": product_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn health_is_open() {
    let server = server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let server = server();
    let response = server.get("/api/products").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn staff_cannot_mutate_the_catalog() {
    let server = server();
    let staff = UserId::new();

    let response = with_identity(server.post("/api/products"), staff, "staff")
        .json(&json!({
            "sku": "SKU-1",
            "name": "Widget",
            "category": "general",
            "price": 1000,
            "cost": 400,
        }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn product_crud_roundtrip() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 5).await;
    let id = product["id"].as_str().unwrap().to_string();

    // Staff can read.
    let response = with_identity(server.get("/api/products"), staff, "staff").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);

    // Partial update keeps untouched fields.
    let response = with_identity(
        server.put(&format!("/api/products/{id}")),
        manager,
        "manager",
    )
    .json(&json!({ "price": 1500 }))
    .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["price"], 1500);
    assert_eq!(updated["sku"], "SKU-1");

    let response = with_identity(
        server.delete(&format!("/api/products/{id}")),
        manager,
        "manager",
    )
    .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response =
        with_identity(server.get(&format!("/api/products/{id}")), staff, "staff").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() {
    let server = server();
    let manager = UserId::new();
    create_product(&server, manager, "SKU-1", 5).await;

    let response = with_identity(server.post("/api/products"), manager, "manager")
        .json(&json!({
            "sku": "SKU-1",
            "name": "Other",
            "category": "general",
            "price": 100,
            "cost": 50,
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    let product_id = product["id"].clone();

    let response = with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product_id, 3))
        .await;
    response.assert_status(StatusCode::CREATED);
    let order = response.json::<Value>();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["orderNumber"], "ORD250829-0001");
    // 3 × $10.00, snapshotted from the catalog.
    assert_eq!(order["totalAmount"], 3000);
    let order_id = order["id"].as_str().unwrap().to_string();

    // Stock was decremented.
    let response = with_identity(
        server.get(&format!("/api/products/{}", product_id.as_str().unwrap())),
        staff,
        "staff",
    )
    .await;
    assert_eq!(response.json::<Value>()["quantity"], 7);

    // Staff cannot cancel; a manager can, restoring stock.
    let cancel_path = format!("/api/orders/{order_id}/cancel");
    let response = with_identity(server.post(&cancel_path), staff, "staff").await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = with_identity(server.post(&cancel_path), manager, "manager").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelled");

    let response = with_identity(
        server.get(&format!("/api/products/{}", product_id.as_str().unwrap())),
        staff,
        "staff",
    )
    .await;
    assert_eq!(response.json::<Value>()["quantity"], 10);

    // Second cancellation is rejected.
    let response = with_identity(server.post(&cancel_path), manager, "manager").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn overselling_is_a_conflict_with_no_side_effects() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 2).await;
    let product_id = product["id"].clone();

    let response = with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product_id, 5))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "INSUFFICIENT_STOCK");

    let response = with_identity(server.get("/api/orders"), staff, "staff").await;
    assert!(response.json::<Value>().as_array().unwrap().is_empty());

    let response = with_identity(
        server.get(&format!("/api/products/{}", product_id.as_str().unwrap())),
        staff,
        "staff",
    )
    .await;
    assert_eq!(response.json::<Value>()["quantity"], 2);
}

#[tokio::test]
async fn status_updates_are_gated_and_forward_only() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    let response = with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product["id"], 1))
        .await;
    let order_id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    let status_path = format!("/api/orders/{order_id}/status");

    let response = with_identity(server.patch(&status_path), staff, "staff")
        .json(&json!({ "status": "processing" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = with_identity(server.patch(&status_path), manager, "manager")
        .json(&json!({ "status": "shipped" }))
        .await;
    response.assert_status_ok();

    let response = with_identity(server.patch(&status_path), manager, "manager")
        .json(&json!({ "status": "processing" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Cancellation only via the cancel endpoint, which releases stock.
    let response = with_identity(server.patch(&status_path), manager, "manager")
        .json(&json!({ "status": "cancelled" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn payment_updates_are_gated_and_applied() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    let response = with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product["id"], 1))
        .await;
    let order = response.json::<Value>();
    assert_eq!(order["paymentStatus"], "pending");
    let payment_path = format!("/api/orders/{}/payment", order["id"].as_str().unwrap());

    let response = with_identity(server.patch(&payment_path), staff, "staff")
        .json(&json!({ "paymentStatus": "paid" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = with_identity(server.patch(&payment_path), manager, "manager")
        .json(&json!({ "paymentStatus": "paid" }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["paymentStatus"], "paid");
    // Payment is orthogonal to the lifecycle status.
    assert_eq!(updated["status"], "pending");
}

#[tokio::test]
async fn mutations_accept_a_correlation_header() {
    let server = server();
    let manager = UserId::new();

    let response = with_identity(server.post("/api/products"), manager, "manager")
        .add_header(
            HeaderName::from_static("x-correlation-id"),
            HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).unwrap(),
        )
        .json(&json!({
            "sku": "SKU-1",
            "name": "Widget",
            "category": "general",
            "price": 1000,
            "cost": 400,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn dashboard_aggregates_catalog_and_orders() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product["id"], 2))
        .await
        .assert_status(StatusCode::CREATED);

    let response = with_identity(server.get("/api/dashboard"), staff, "staff").await;
    response.assert_status_ok();
    let report = response.json::<Value>();
    assert_eq!(report["totalProducts"], 1);
    assert_eq!(report["totalOrders"], 1);
    assert_eq!(report["totalRevenue"], 2000);
    // 8 left on hand at $10.00.
    assert_eq!(report["totalInventoryValue"], 8000);
    assert_eq!(report["stockPredictions"].as_array().unwrap().len(), 1);
    assert_eq!(report["recentOrders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn placements_receive_and_withdraw_stock() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    let product_id = product["id"].clone();

    let response = with_identity(server.post("/api/inventory"), staff, "staff")
        .json(&json!({
            "productId": product_id,
            "location": "B-12",
            "quantity": 5,
            "minimumQuantity": 1,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let placement_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let response = with_identity(
        server.get(&format!("/api/products/{}", product_id.as_str().unwrap())),
        staff,
        "staff",
    )
    .await;
    assert_eq!(response.json::<Value>()["quantity"], 15);

    // Owner-scoped listing.
    let response = with_identity(server.get("/api/inventory"), staff, "staff").await;
    let views = response.json::<Value>();
    assert_eq!(views.as_array().unwrap().len(), 1);
    assert_eq!(views[0]["sku"], "SKU-1");

    let response = with_identity(server.get("/api/inventory"), manager, "manager").await;
    assert!(response.json::<Value>().as_array().unwrap().is_empty());

    let response = with_identity(
        server.delete(&format!("/api/inventory/{placement_id}")),
        staff,
        "staff",
    )
    .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = with_identity(
        server.get(&format!("/api/products/{}", product_id.as_str().unwrap())),
        staff,
        "staff",
    )
    .await;
    assert_eq!(response.json::<Value>()["quantity"], 10);
}

#[tokio::test]
async fn low_stock_and_reorder_point_policy() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 5).await;
    let id = product["id"].as_str().unwrap().to_string();

    // quantity 5 > reorder point 2: not low stock yet.
    let response = with_identity(server.get("/api/inventory/low-stock"), staff, "staff").await;
    assert!(response.json::<Value>().as_array().unwrap().is_empty());

    let reorder_path = format!("/api/inventory/{id}/reorder-point");
    let response = with_identity(server.patch(&reorder_path), staff, "staff")
        .json(&json!({ "reorderPoint": 5 }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = with_identity(server.patch(&reorder_path), manager, "manager")
        .json(&json!({ "reorderPoint": 5 }))
        .await;
    response.assert_status_ok();

    // Boundary is inclusive: quantity == reorder point is low stock.
    let response = with_identity(server.get("/api/inventory/low-stock"), staff, "staff").await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn value_report_requires_manager() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();
    create_product(&server, manager, "SKU-1", 10).await;

    let response = with_identity(server.get("/api/reports/inventory-value"), staff, "staff").await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = with_identity(
        server.get("/api/reports/inventory-value"),
        manager,
        "manager",
    )
    .await;
    response.assert_status_ok();
    let report = response.json::<Value>();
    assert_eq!(report["totalValue"], 10_000);
    assert_eq!(report["totalItems"], 10);
    assert_eq!(report["categories"]["general"]["items"], 10);
}

#[tokio::test]
async fn stock_movement_covers_cancelled_orders() {
    let server = server();
    let manager = UserId::new();
    let staff = UserId::new();

    let product = create_product(&server, manager, "SKU-1", 10).await;
    let response = with_identity(server.post("/api/orders"), staff, "staff")
        .json(&order_body(&product["id"], 2))
        .await;
    let order_id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    with_identity(
        server.post(&format!("/api/orders/{order_id}/cancel")),
        manager,
        "manager",
    )
    .await
    .assert_status_ok();

    let response = with_identity(server.get("/api/reports/stock-movement"), staff, "staff").await;
    response.assert_status_ok();
    let movements = response.json::<Value>();
    assert_eq!(movements.as_array().unwrap().len(), 1);
    assert_eq!(movements[0]["type"], "cancelled");
    assert_eq!(movements[0]["items"][0]["quantity"], 2);
}
