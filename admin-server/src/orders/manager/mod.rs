//! OrderManager - order creation, cancellation and status transitions
//!
//! # Creation flow
//!
//! ```text
//! create_order(req)
//!     ├─ 1. Validate stock for every item (no mutation yet)
//!     ├─ 2. Insert order row (status = pending, time-based slug)
//!     ├─ 3. Insert order_item rows      → on failure: delete order
//!     ├─ 4. Reserve stock per item      → on failure: release the
//!     │      reservations already applied, then delete items + order
//!     ├─ 5. Recompute aggregate once per distinct product
//!     └─ 6. Return the order
//! ```
//!
//! Step 4 tracks exactly which reservations succeeded and compensates by
//! releasing precisely those, so a failed creation leaves stock where it
//! started. Deleting the order rows alone would not restore it.
//!
//! # Consistency
//!
//! One request is one linear sequence of gateway calls; there is no locking
//! and no cross-call transaction. Two concurrent creations can both pass
//! validation on the same size row and oversell it. Known limitation,
//! inherited deliberately.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{OrderError, OrderResult};
use crate::inventory::InventoryLedger;
use crate::models::{Order, OrderItem, OrderStatus};
use crate::store::Store;

#[cfg(test)]
mod tests;

/// Requested line item for order creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub size: i32,
    pub quantity: i32,
}

/// Order creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<OrderItemRequest>,
    pub total_price: f64,
    pub user_id: String,
}

/// Current availability for a requested item, as reported by `check_stock`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub size: i32,
    pub requested: i32,
    pub available: i32,
}

/// Order lifecycle orchestrator
#[derive(Clone)]
pub struct OrderManager {
    store: Arc<dyn Store>,
    ledger: InventoryLedger,
}

impl OrderManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let ledger = InventoryLedger::new(store.clone());
        Self { store, ledger }
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Time-based, never reused
    fn generate_slug() -> String {
        format!("order-{}", Utc::now().timestamp_millis())
    }

    fn distinct_products(items: &[OrderItem]) -> Vec<String> {
        let mut products: Vec<String> = Vec::new();
        for item in items {
            if !products.contains(&item.product) {
                products.push(item.product.clone());
            }
        }
        products
    }

    // =========================================================================
    // Stock check
    // =========================================================================

    /// Validate every requested item against current stock without mutating.
    ///
    /// Fails with `SizeNotFound` on a missing row and `InsufficientStock` on
    /// the first item the stock cannot cover; otherwise reports current
    /// availability per item.
    pub async fn check_stock(&self, items: &[OrderItemRequest]) -> OrderResult<Vec<StockLevel>> {
        if items.is_empty() {
            return Err(OrderError::Validation("order has no items".into()));
        }

        let mut levels = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::Validation(format!(
                    "quantity must be positive for product {} size {}",
                    item.product_id, item.size
                )));
            }
            let row = self
                .store
                .get_size(&item.product_id, item.size)
                .await?
                .ok_or_else(|| OrderError::SizeNotFound {
                    product: item.product_id.clone(),
                    size: item.size,
                })?;
            if row.quantity < item.quantity {
                return Err(OrderError::InsufficientStock {
                    product: item.product_id.clone(),
                    size: item.size,
                    requested: item.quantity,
                    available: row.quantity,
                });
            }
            levels.push(StockLevel {
                product_id: item.product_id.clone(),
                size: item.size,
                requested: item.quantity,
                available: row.quantity,
            });
        }
        Ok(levels)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create an order, reserving stock for every item.
    pub async fn create_order(&self, req: OrderRequest) -> OrderResult<Order> {
        // 1. Validate stock before any mutation
        self.check_stock(&req.order_items).await?;

        // 2. Insert the order row
        let created_at = Utc::now().to_rfc3339();
        let order = self
            .store
            .insert_order(Order {
                id: None,
                user: req.user_id.clone(),
                status: OrderStatus::Pending,
                total_price: req.total_price,
                slug: Self::generate_slug(),
                description: Some(format!("Order created at {}", created_at)),
                created_at,
            })
            .await?;
        let order_id = order.id.clone().unwrap_or_default();

        // 3. Insert order_item rows; compensate by deleting the order
        let items: Vec<OrderItem> = req
            .order_items
            .iter()
            .map(|item| OrderItem {
                order_id: order_id.clone(),
                product: item.product_id.clone(),
                size: item.size,
                quantity: item.quantity,
            })
            .collect();
        if let Err(e) = self.store.insert_order_items(items.clone()).await {
            tracing::error!(order_id = %order_id, error = %e, "Order item insert failed, rolling back order");
            if let Err(del) = self.store.delete_order(&order_id).await {
                tracing::error!(order_id = %order_id, error = %del, "Rollback delete of order failed");
            }
            return Err(e.into());
        }

        // 4. Reserve stock per item. On failure, release exactly the
        //    reservations that succeeded, then delete items and order.
        let mut reserved: Vec<&OrderItem> = Vec::new();
        for item in &items {
            match self.ledger.reserve(&item.product, item.size, item.quantity).await {
                Ok(()) => reserved.push(item),
                Err(e) => {
                    tracing::error!(order_id = %order_id, product = %item.product, size = item.size, error = %e, "Reservation failed, rolling back order");
                    for done in &reserved {
                        if let Err(rel) = self
                            .ledger
                            .release(&done.product, done.size, done.quantity)
                            .await
                        {
                            tracing::error!(order_id = %order_id, product = %done.product, size = done.size, error = %rel, "Compensating release failed");
                        }
                    }
                    if let Err(del) = self.store.delete_order_items(&order_id).await {
                        tracing::error!(order_id = %order_id, error = %del, "Rollback delete of order items failed");
                    }
                    if let Err(del) = self.store.delete_order(&order_id).await {
                        tracing::error!(order_id = %order_id, error = %del, "Rollback delete of order failed");
                    }
                    return Err(e.into());
                }
            }
        }

        // 5. Recompute the aggregate once per distinct product
        for product in Self::distinct_products(&items) {
            self.ledger.recompute_aggregate(&product).await?;
        }

        tracing::info!(order_id = %order_id, slug = %order.slug, items = items.len(), total = req.total_price, "Order created");
        Ok(order)
    }

    // =========================================================================
    // Cancellation (soft)
    // =========================================================================

    /// Cancel an order, restoring its reserved stock exactly once.
    ///
    /// Idempotent: an unknown id and an already-cancelled order both return
    /// success without touching stock. Completed orders refuse with
    /// `InvalidTransition`.
    pub async fn cancel_order(&self, order_id: &str) -> OrderResult<()> {
        // 1. Missing order counts as already cancelled
        let order = match self.store.get_order(order_id).await? {
            Some(order) => order,
            None => {
                tracing::warn!(order_id = %order_id, "Cancel requested for unknown order, treating as already cancelled");
                return Ok(());
            }
        };

        // 2. Terminal-state guards
        match order.status {
            OrderStatus::Completed => {
                return Err(OrderError::InvalidTransition(format!(
                    "order {} is completed and cannot be cancelled",
                    order_id
                )));
            }
            OrderStatus::Cancelled => {
                // Stock was already restored once; never twice
                tracing::warn!(order_id = %order_id, "Order already cancelled, skipping restock");
                return Ok(());
            }
            _ => {}
        }

        // 3-4. Release every reserved item, then recompute per product.
        //      A failure here surfaces with the status unchanged; earlier
        //      releases in the loop are not undone.
        let items = self.store.items_for_order(order_id).await?;
        for item in &items {
            self.ledger
                .release(&item.product, item.size, item.quantity)
                .await?;
        }
        for product in Self::distinct_products(&items) {
            self.ledger.recompute_aggregate(&product).await?;
        }

        // 5. Soft-cancel: keep order and items for history
        self.store
            .set_order_status(order_id, OrderStatus::Cancelled)
            .await?;

        tracing::info!(order_id = %order_id, items = items.len(), "Order cancelled, stock restored");
        Ok(())
    }

    // =========================================================================
    // Purge (hard delete)
    // =========================================================================

    /// Physically remove an order and its line items.
    ///
    /// Separate administrative action, not the normal cancellation path.
    /// Releases stock first unless the order was already cancelled (its
    /// stock went back then). Completed orders refuse.
    pub async fn purge_order(&self, id: Option<&str>, slug: Option<&str>) -> OrderResult<()> {
        let order = match (id, slug) {
            (Some(id), _) => self.store.get_order(id).await?,
            (None, Some(slug)) => self.store.get_order_by_slug(slug).await?,
            (None, None) => {
                return Err(OrderError::Validation(
                    "provide an order id or slug".into(),
                ));
            }
        };

        let order = match order {
            Some(order) => order,
            None => {
                tracing::warn!(id = ?id, slug = ?slug, "Purge requested for unknown order, nothing to do");
                return Ok(());
            }
        };
        let order_id = order.id.clone().unwrap_or_default();

        if order.status == OrderStatus::Completed {
            return Err(OrderError::InvalidTransition(format!(
                "order {} is completed and cannot be purged",
                order_id
            )));
        }

        // Restock unless cancellation already did
        if order.status != OrderStatus::Cancelled {
            let items = self.store.items_for_order(&order_id).await?;
            for item in &items {
                self.ledger
                    .release(&item.product, item.size, item.quantity)
                    .await?;
            }
            for product in Self::distinct_products(&items) {
                self.ledger.recompute_aggregate(&product).await?;
            }
        }

        self.store.delete_order_items(&order_id).await?;
        self.store.delete_order(&order_id).await?;

        tracing::info!(order_id = %order_id, "Order purged");
        Ok(())
    }

    // =========================================================================
    // Status transitions
    // =========================================================================

    /// Apply an admin-selected status change.
    ///
    /// The one hard rule: nothing transitions away from `cancelled`.
    /// Setting `cancelled` routes through [`Self::cancel_order`] so the
    /// status dropdown can never skip the restock.
    pub async fn update_status(&self, order_id: &str, new_status: OrderStatus) -> OrderResult<()> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if order.status == OrderStatus::Cancelled {
            if new_status == OrderStatus::Cancelled {
                return Ok(());
            }
            return Err(OrderError::InvalidTransition(format!(
                "order {} is cancelled; no further transitions",
                order_id
            )));
        }

        if new_status == OrderStatus::Cancelled {
            return self.cancel_order(order_id).await;
        }

        self.store.set_order_status(order_id, new_status).await?;
        tracing::info!(order_id = %order_id, from = %order.status, to = %new_status, "Order status updated");
        Ok(())
    }

    /// Resolve a pending customer cancellation request.
    ///
    /// Confirm runs the cancellation protocol; reject reverts to `pending`.
    pub async fn resolve_cancel_request(&self, order_id: &str, approve: bool) -> OrderResult<()> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if order.status != OrderStatus::CancelRequested {
            return Err(OrderError::InvalidTransition(format!(
                "order {} has no pending cancellation request (status: {})",
                order_id, order.status
            )));
        }

        if approve {
            self.cancel_order(order_id).await
        } else {
            self.store
                .set_order_status(order_id, OrderStatus::Pending)
                .await?;
            tracing::info!(order_id = %order_id, "Cancellation request rejected, order back to pending");
            Ok(())
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn get_order(&self, order_id: &str) -> OrderResult<Option<Order>> {
        Ok(self.store.get_order(order_id).await?)
    }

    pub async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.list_orders().await?)
    }

    pub async fn items_for_order(&self, order_id: &str) -> OrderResult<Vec<OrderItem>> {
        Ok(self.store.items_for_order(order_id).await?)
    }
}
