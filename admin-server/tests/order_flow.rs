//! End-to-end order flow over the HTTP surface
//!
//! Drives the assembled router against the in-memory store: provision a
//! product, create an order, watch stock move, cancel, watch it come back.

use std::sync::Arc;

use admin_server::{Config, MemoryStore, ServerState, build_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_router() -> Router {
    let state = ServerState::with_store(Config::from_env(), Arc::new(MemoryStore::new()));
    build_router(state)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Size quantities for the 12 rows (34-45) with stock only on 40 and 41
fn seed_sizes() -> Value {
    let mut sizes = vec![0; 12];
    sizes[6] = 5; // size 40
    sizes[7] = 3; // size 41
    json!(sizes)
}

async fn create_product(router: &Router) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/api/products",
        Some(json!({
            "name": "Trail Runner",
            "price": 79.0,
            "sizes": seed_sizes(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_quantity"], 8);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn order_round_trip_over_http() {
    let router = test_router();
    let product = create_product(&router).await;

    // Stock check reports availability without mutating
    let (status, body) = send(
        &router,
        "POST",
        "/api/orders/check-inventory",
        Some(json!({
            "orderItems": [{ "productId": product, "size": 40, "quantity": 2 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderItems"][0]["available"], 5);

    // Create the order
    let (status, body) = send(
        &router,
        "POST",
        "/api/orders",
        Some(json!({
            "orderItems": [
                { "productId": product, "size": 40, "quantity": 2 },
                { "productId": product, "size": 41, "quantity": 1 },
            ],
            "totalPrice": 100.0,
            "userId": "user-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["orderId"].as_str().unwrap().to_string();

    // Stock and aggregate moved
    let (_, product_body) = send(&router, "GET", &format!("/api/products/{product}"), None).await;
    assert_eq!(product_body["max_quantity"], 5);

    let (status, detail) = send(&router, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "pending");
    assert_eq!(detail["items"].as_array().unwrap().len(), 2);

    // Cancel restores everything
    let (status, body) = send(
        &router,
        "POST",
        "/api/orders/cancel",
        Some(json!({ "orderId": order_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, product_body) = send(&router, "GET", &format!("/api/products/{product}"), None).await;
    assert_eq!(product_body["max_quantity"], 8);

    let (_, detail) = send(&router, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(detail["status"], "cancelled");
}

#[tokio::test]
async fn oversell_is_rejected_with_422() {
    let router = test_router();
    let product = create_product(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/orders",
        Some(json!({
            "orderItems": [{ "productId": product, "size": 40, "quantity": 6 }],
            "totalPrice": 300.0,
            "userId": "user-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // No order was persisted
    let (_, orders) = send(&router, "GET", "/api/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mixed_case_status_literal_is_accepted() {
    let router = test_router();
    let product = create_product(&router).await;

    let (_, body) = send(
        &router,
        "POST",
        "/api/orders",
        Some(json!({
            "orderItems": [{ "productId": product, "size": 40, "quantity": 1 }],
            "totalPrice": 79.0,
            "userId": "user-1",
        })),
    )
    .await;
    let order_id = body["orderId"].as_str().unwrap().to_string();

    // Upstream clients sent mixed-case literals; the boundary normalizes
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({ "status": "Processing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&router, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(detail["status"], "processing");
}

#[tokio::test]
async fn cancelling_a_completed_order_is_refused() {
    let router = test_router();
    let product = create_product(&router).await;

    let (_, body) = send(
        &router,
        "POST",
        "/api/orders",
        Some(json!({
            "orderItems": [{ "productId": product, "size": 40, "quantity": 1 }],
            "totalPrice": 79.0,
            "userId": "user-1",
        })),
    )
    .await;
    let order_id = body["orderId"].as_str().unwrap().to_string();

    send(
        &router,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({ "status": "completed" })),
    )
    .await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/orders/cancel",
        Some(json!({ "orderId": order_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn product_creation_rejects_wrong_size_count() {
    let router = test_router();

    let (status, body) = send(
        &router,
        "POST",
        "/api/products",
        Some(json!({
            "name": "Bad Product",
            "price": 10.0,
            "sizes": [1, 2, 3],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}
