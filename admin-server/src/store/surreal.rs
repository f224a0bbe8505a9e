//! SurrealDB Gateway
//!
//! Embedded SurrealDB backend. Record keys are generated v4 UUIDs so the
//! rest of the system only ever sees plain string ids; queries project
//! `record::id(id) AS id` to strip the table prefix on the way out.
//!
//! The `order` table name collides with the ORDER keyword in raw SurrealQL,
//! so every raw query addresses it through `type::thing` / `type::table`.

use async_trait::async_trait;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use super::{Store, StoreError, StoreResult};
use crate::models::{Order, OrderItem, OrderStatus, Product, ProductSize, ProductUpdate};

const NAMESPACE: &str = "backoffice";
const DATABASE: &str = "shop";

/// Minimal record shape for writes where only existence matters
#[derive(Debug, serde::Deserialize)]
struct Record {
    #[allow(dead_code)]
    id: RecordId,
}

#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

impl SurrealStore {
    /// Open the on-disk store (RocksDB) under the given directory
    pub async fn open(path: &str) -> StoreResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        tracing::info!(path = %path, "SurrealDB store opened");
        Ok(Self { db })
    }

    /// Open an ephemeral in-memory store (dev runs)
    pub async fn open_memory() -> StoreResult<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        Ok(Self { db })
    }

    fn new_key() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl Store for SurrealStore {
    // ========== product ==========

    async fn insert_product(&self, mut product: Product) -> StoreResult<Product> {
        let key = Self::new_key();
        product.id = None;
        let created: Option<Record> = self
            .db
            .create(("product", key.as_str()))
            .content(product.clone())
            .await?;
        created.ok_or_else(|| StoreError::Database("failed to create product".into()))?;
        product.id = Some(key);
        Ok(product)
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let products: Vec<Product> = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('product', $id)")
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(products.into_iter().next())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let products: Vec<Product> = self
            .db
            .query("SELECT *, record::id(id) AS id FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    async fn update_product(&self, id: &str, update: ProductUpdate) -> StoreResult<Product> {
        // Build dynamic SET clauses, binding only the supplied fields
        let mut set_parts: Vec<&str> = Vec::new();
        if update.name.is_some() {
            set_parts.push("name = $name");
        }
        if update.category.is_some() {
            set_parts.push("category = $category");
        }
        if update.price.is_some() {
            set_parts.push("price = $price");
        }
        if update.description.is_some() {
            set_parts.push("description = $description");
        }
        if update.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            return self
                .get_product(id)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("product {}", id)));
        }

        let query_str = format!(
            "UPDATE type::thing('product', $id) SET {} RETURN AFTER",
            set_parts.join(", ")
        );
        let mut query = self.db.query(query_str).bind(("id", id.to_string()));
        if let Some(v) = update.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = update.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = update.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = update.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = update.image {
            query = query.bind(("image", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        let mut product = products
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        product.id = Some(id.to_string());
        Ok(product)
    }

    async fn set_product_max_quantity(&self, id: &str, max_quantity: i32) -> StoreResult<()> {
        let updated: Vec<Record> = self
            .db
            .query("UPDATE type::thing('product', $id) SET max_quantity = $qty RETURN AFTER")
            .bind(("id", id.to_string()))
            .bind(("qty", max_quantity))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(format!("product {}", id)));
        }
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<()> {
        let deleted: Option<Record> = self.db.delete(("product", id)).await?;
        if deleted.is_none() {
            return Err(StoreError::NotFound(format!("product {}", id)));
        }
        Ok(())
    }

    // ========== product_size ==========

    async fn insert_size_rows(&self, rows: Vec<ProductSize>) -> StoreResult<()> {
        let _: Vec<Record> = self.db.insert("product_size").content(rows).await?;
        Ok(())
    }

    async fn get_size(&self, product: &str, size: i32) -> StoreResult<Option<ProductSize>> {
        let rows: Vec<ProductSize> = self
            .db
            .query("SELECT * FROM product_size WHERE product = $product AND size = $size")
            .bind(("product", product.to_string()))
            .bind(("size", size))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    async fn sizes_for_product(&self, product: &str) -> StoreResult<Vec<ProductSize>> {
        let rows: Vec<ProductSize> = self
            .db
            .query("SELECT * FROM product_size WHERE product = $product ORDER BY size")
            .bind(("product", product.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    async fn set_size_quantity(&self, product: &str, size: i32, quantity: i32) -> StoreResult<()> {
        let updated: Vec<Record> = self
            .db
            .query(
                "UPDATE product_size SET quantity = $qty \
                 WHERE product = $product AND size = $size RETURN AFTER",
            )
            .bind(("product", product.to_string()))
            .bind(("size", size))
            .bind(("qty", quantity))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(format!(
                "product_size {}/{}",
                product, size
            )));
        }
        Ok(())
    }

    async fn delete_size_rows(&self, product: &str) -> StoreResult<()> {
        self.db
            .query("DELETE product_size WHERE product = $product")
            .bind(("product", product.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    // ========== order ==========

    async fn insert_order(&self, mut order: Order) -> StoreResult<Order> {
        let key = Self::new_key();
        order.id = None;
        let created: Option<Record> = self
            .db
            .create(("order", key.as_str()))
            .content(order.clone())
            .await?;
        created.ok_or_else(|| StoreError::Database("failed to create order".into()))?;
        order.id = Some(key);
        Ok(order)
    }

    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let orders: Vec<Order> = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('order', $id)")
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    async fn get_order_by_slug(&self, slug: &str) -> StoreResult<Option<Order>> {
        let orders: Vec<Order> = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::table('order') WHERE slug = $slug")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .db
            .query(
                "SELECT *, record::id(id) AS id FROM type::table('order') \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(orders)
    }

    async fn set_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()> {
        let updated: Vec<Record> = self
            .db
            .query("UPDATE type::thing('order', $id) SET status = $status RETURN AFTER")
            .bind(("id", id.to_string()))
            .bind(("status", status.as_str()))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(format!("order {}", id)));
        }
        Ok(())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        // No-op when already gone: rollback paths re-issue deletes
        let _: Option<Record> = self.db.delete(("order", id)).await?;
        Ok(())
    }

    // ========== order_item ==========

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()> {
        let _: Vec<Record> = self.db.insert("order_item").content(items).await?;
        Ok(())
    }

    async fn items_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .db
            .query("SELECT * FROM order_item WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    async fn delete_order_items(&self, order_id: &str) -> StoreResult<()> {
        self.db
            .query("DELETE order_item WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
