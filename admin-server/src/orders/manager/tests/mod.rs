//! OrderManager test suite
//!
//! Shared fixtures: a memory store seeded with one product carrying size
//! rows {40: 5, 41: 3} and the matching aggregate of 8.


use std::sync::Arc;

use crate::models::{Product, ProductSize};
use crate::orders::{OrderItemRequest, OrderManager, OrderRequest};
use crate::store::{MemoryStore, Store};

async fn seed_product(store: &MemoryStore, name: &str, sizes: &[(i32, i32)]) -> String {
    let total: i32 = sizes.iter().map(|(_, q)| q).sum();
    let product = store
        .insert_product(Product {
            id: None,
            name: name.into(),
            category: None,
            price: 79.0,
            description: None,
            image: String::new(),
            max_quantity: total,
        })
        .await
        .unwrap();
    let id = product.id.unwrap();
    let rows = sizes
        .iter()
        .map(|&(size, quantity)| ProductSize {
            product: id.clone(),
            size,
            quantity,
        })
        .collect();
    store.insert_size_rows(rows).await.unwrap();
    id
}

async fn create_test_manager() -> (OrderManager, Arc<MemoryStore>, String) {
    let store = Arc::new(MemoryStore::new());
    let product = seed_product(&store, "Trail Runner", &[(40, 5), (41, 3)]).await;
    let manager = OrderManager::new(store.clone());
    (manager, store, product)
}

fn item(product: &str, size: i32, quantity: i32) -> OrderItemRequest {
    OrderItemRequest {
        product_id: product.to_string(),
        size,
        quantity,
    }
}

fn request(items: Vec<OrderItemRequest>, total_price: f64) -> OrderRequest {
    OrderRequest {
        order_items: items,
        total_price,
        user_id: "user-1".into(),
    }
}
