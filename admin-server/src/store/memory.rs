//! In-memory Gateway
//!
//! HashMap-backed [`Store`] used by the test suites and the `memory`
//! backend. Sequential integer keys keep test assertions readable.
//!
//! Two fail points are exposed so the lifecycle tests can force the
//! compensation paths that never trigger against a healthy backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::{Order, OrderItem, OrderStatus, Product, ProductSize, ProductUpdate};

#[derive(Default)]
struct Inner {
    products: HashMap<String, Product>,
    /// (product, size) -> quantity
    sizes: HashMap<(String, i32), i32>,
    orders: HashMap<String, Order>,
    items: Vec<OrderItem>,
    next_id: u64,
}

impl Inner {
    fn next_key(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
    fail_insert_items: AtomicBool,
    /// Remaining size writes before an injected failure; negative = unlimited
    size_write_budget: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            fail_insert_items: AtomicBool::new(false),
            size_write_budget: AtomicI64::new(-1),
        }
    }

    /// Make the next `insert_order_items` call fail once
    pub fn fail_next_insert_order_items(&self) {
        self.fail_insert_items.store(true, Ordering::SeqCst);
    }

    /// Allow `n` more size-quantity writes, fail the one after, then recover
    pub fn fail_size_writes_after(&self, n: i64) {
        self.size_write_budget.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ========== product ==========

    async fn insert_product(&self, mut product: Product) -> StoreResult<Product> {
        let mut inner = self.inner.write();
        let key = inner.next_key();
        product.id = Some(key.clone());
        inner.products.insert(key, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().products.get(id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let mut products: Vec<Product> = self.inner.read().products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn update_product(&self, id: &str, update: ProductUpdate) -> StoreResult<Product> {
        let mut inner = self.inner.write();
        let product = inner
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        if let Some(v) = update.name {
            product.name = v;
        }
        if let Some(v) = update.category {
            product.category = Some(v);
        }
        if let Some(v) = update.price {
            product.price = v;
        }
        if let Some(v) = update.description {
            product.description = Some(v);
        }
        if let Some(v) = update.image {
            product.image = v;
        }
        Ok(product.clone())
    }

    async fn set_product_max_quantity(&self, id: &str, max_quantity: i32) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let product = inner
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        product.max_quantity = max_quantity;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner
            .products
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        Ok(())
    }

    // ========== product_size ==========

    async fn insert_size_rows(&self, rows: Vec<ProductSize>) -> StoreResult<()> {
        let mut inner = self.inner.write();
        for row in rows {
            inner.sizes.insert((row.product, row.size), row.quantity);
        }
        Ok(())
    }

    async fn get_size(&self, product: &str, size: i32) -> StoreResult<Option<ProductSize>> {
        let inner = self.inner.read();
        Ok(inner
            .sizes
            .get(&(product.to_string(), size))
            .map(|&quantity| ProductSize {
                product: product.to_string(),
                size,
                quantity,
            }))
    }

    async fn sizes_for_product(&self, product: &str) -> StoreResult<Vec<ProductSize>> {
        let inner = self.inner.read();
        let mut rows: Vec<ProductSize> = inner
            .sizes
            .iter()
            .filter(|((p, _), _)| p == product)
            .map(|((p, size), &quantity)| ProductSize {
                product: p.clone(),
                size: *size,
                quantity,
            })
            .collect();
        rows.sort_by_key(|r| r.size);
        Ok(rows)
    }

    async fn set_size_quantity(&self, product: &str, size: i32, quantity: i32) -> StoreResult<()> {
        let budget = self.size_write_budget.load(Ordering::SeqCst);
        if budget >= 0 {
            // Fail exactly once, then behave again
            self.size_write_budget.store(budget - 1, Ordering::SeqCst);
            if budget == 0 {
                return Err(StoreError::Database(
                    "size write refused (fault injection)".into(),
                ));
            }
        }

        let mut inner = self.inner.write();
        let slot = inner
            .sizes
            .get_mut(&(product.to_string(), size))
            .ok_or_else(|| StoreError::NotFound(format!("product_size {}/{}", product, size)))?;
        *slot = quantity;
        Ok(())
    }

    async fn delete_size_rows(&self, product: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.sizes.retain(|(p, _), _| p != product);
        Ok(())
    }

    // ========== order ==========

    async fn insert_order(&self, mut order: Order) -> StoreResult<Order> {
        let mut inner = self.inner.write();
        let key = inner.next_key();
        order.id = Some(key.clone());
        inner.orders.insert(key, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().orders.get(id).cloned())
    }

    async fn get_order_by_slug(&self, slug: &str) -> StoreResult<Option<Order>> {
        let inner = self.inner.read();
        Ok(inner.orders.values().find(|o| o.slug == slug).cloned())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.inner.read().orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn set_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let order = inner
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        order.status = status;
        Ok(())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        self.inner.write().orders.remove(id);
        Ok(())
    }

    // ========== order_item ==========

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()> {
        if self.fail_insert_items.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(
                "order_item insert refused (fault injection)".into(),
            ));
        }
        self.inner.write().items.extend(items);
        Ok(())
    }

    async fn items_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        let inner = self.inner.read();
        Ok(inner
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn delete_order_items(&self, order_id: &str) -> StoreResult<()> {
        self.inner.write().items.retain(|i| i.order_id != order_id);
        Ok(())
    }
}
