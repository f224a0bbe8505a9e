//! Inventory Ledger
//!
//! Owns per-size stock and the denormalized aggregate. Two primitives plus
//! a recompute:
//!
//! - [`InventoryLedger::reserve`] — decrement a (product, size) row,
//!   refusing to go below zero
//! - [`InventoryLedger::release`] — increment it back
//! - [`InventoryLedger::recompute_aggregate`] — rewrite `max_quantity` as
//!   the sum of the size rows
//!
//! Every call re-reads current state from the gateway; nothing is cached.
//! That protects against lost updates within one request at the cost of
//! extra round trips, and offers no protection across concurrent requests
//! (see the manager docs).

use std::sync::Arc;

use thiserror::Error;

use crate::store::{Store, StoreError};

/// Ledger error types
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient stock for product {product} size {size}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        size: i32,
        requested: i32,
        available: i32,
    },

    #[error("No size row for product {product} size {size}")]
    SizeNotFound { product: String, size: i32 },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Stock bookkeeping over the store gateway
#[derive(Clone)]
pub struct InventoryLedger {
    store: Arc<dyn Store>,
}

impl InventoryLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Decrement available stock for a (product, size) pair.
    ///
    /// Reads the current quantity first; fails with `InsufficientStock`
    /// before writing anything if the row cannot cover the request.
    pub async fn reserve(&self, product: &str, size: i32, quantity: i32) -> LedgerResult<()> {
        let row = self
            .store
            .get_size(product, size)
            .await?
            .ok_or_else(|| LedgerError::SizeNotFound {
                product: product.to_string(),
                size,
            })?;

        if row.quantity < quantity {
            return Err(LedgerError::InsufficientStock {
                product: product.to_string(),
                size,
                requested: quantity,
                available: row.quantity,
            });
        }

        self.store
            .set_size_quantity(product, size, row.quantity - quantity)
            .await?;
        tracing::debug!(product = %product, size, reserved = quantity, remaining = row.quantity - quantity, "Stock reserved");
        Ok(())
    }

    /// Increment available stock for a (product, size) pair.
    ///
    /// No upper bound is enforced: releasing more than was ever in stock
    /// goes through, matching the upstream behavior.
    pub async fn release(&self, product: &str, size: i32, quantity: i32) -> LedgerResult<()> {
        let row = self
            .store
            .get_size(product, size)
            .await?
            .ok_or_else(|| LedgerError::SizeNotFound {
                product: product.to_string(),
                size,
            })?;

        self.store
            .set_size_quantity(product, size, row.quantity + quantity)
            .await?;
        tracing::debug!(product = %product, size, released = quantity, available = row.quantity + quantity, "Stock released");
        Ok(())
    }

    /// Re-derive `max_quantity` from the size rows and persist it.
    ///
    /// Called once per distinct product after a batch of reserve/release
    /// calls, not once per item, to avoid redundant writes on multi-item
    /// orders. Returns the new total.
    pub async fn recompute_aggregate(&self, product: &str) -> LedgerResult<i32> {
        let rows = self.store.sizes_for_product(product).await?;
        let total: i32 = rows.iter().map(|r| r.quantity).sum();

        match self.store.set_product_max_quantity(product, total).await {
            Ok(()) => Ok(total),
            Err(StoreError::NotFound(_)) => Err(LedgerError::ProductNotFound(product.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, ProductSize};
    use crate::store::MemoryStore;

    async fn seed_store() -> (Arc<MemoryStore>, String) {
        let store = Arc::new(MemoryStore::new());
        let product = store
            .insert_product(Product {
                id: None,
                name: "Runner".into(),
                category: None,
                price: 59.0,
                description: None,
                image: String::new(),
                max_quantity: 8,
            })
            .await
            .unwrap();
        let id = product.id.unwrap();
        store
            .insert_size_rows(vec![
                ProductSize {
                    product: id.clone(),
                    size: 40,
                    quantity: 5,
                },
                ProductSize {
                    product: id.clone(),
                    size: 41,
                    quantity: 3,
                },
            ])
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn reserve_decrements_stock() {
        let (store, id) = seed_store().await;
        let ledger = InventoryLedger::new(store.clone());

        ledger.reserve(&id, 40, 2).await.unwrap();
        let row = store.get_size(&id, 40).await.unwrap().unwrap();
        assert_eq!(row.quantity, 3);
    }

    #[tokio::test]
    async fn reserve_refuses_oversell_without_writing() {
        let (store, id) = seed_store().await;
        let ledger = InventoryLedger::new(store.clone());

        let err = ledger.reserve(&id, 40, 6).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { available: 5, requested: 6, .. }
        ));
        // Stock untouched
        let row = store.get_size(&id, 40).await.unwrap().unwrap();
        assert_eq!(row.quantity, 5);
    }

    #[tokio::test]
    async fn reserve_unknown_size_is_not_found() {
        let (store, id) = seed_store().await;
        let ledger = InventoryLedger::new(store);

        let err = ledger.reserve(&id, 44, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::SizeNotFound { size: 44, .. }));
    }

    #[tokio::test]
    async fn release_is_not_clamped() {
        let (store, id) = seed_store().await;
        let ledger = InventoryLedger::new(store.clone());

        // Releasing beyond the original stock level is allowed
        ledger.release(&id, 41, 10).await.unwrap();
        let row = store.get_size(&id, 41).await.unwrap().unwrap();
        assert_eq!(row.quantity, 13);
    }

    #[tokio::test]
    async fn recompute_sums_size_rows() {
        let (store, id) = seed_store().await;
        let ledger = InventoryLedger::new(store.clone());

        ledger.reserve(&id, 40, 2).await.unwrap();
        let total = ledger.recompute_aggregate(&id).await.unwrap();
        assert_eq!(total, 6);
        let product = store.get_product(&id).await.unwrap().unwrap();
        assert_eq!(product.max_quantity, 6);
    }

    #[tokio::test]
    async fn recompute_unknown_product() {
        let (store, _) = seed_store().await;
        let ledger = InventoryLedger::new(store);

        let err = ledger.recompute_aggregate("nope").await.unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(_)));
    }
}
