//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::models::{Product, ProductCreate, ProductSize, ProductUpdate, SIZE_RANGE};
use crate::orders::OrderError;
use crate::utils::{AppError, AppResult};

fn validate_sizes(quantities: &[i32]) -> AppResult<()> {
    let expected = SIZE_RANGE.count();
    if quantities.len() != expected {
        return Err(AppError::validation(format!(
            "expected {} size quantities, got {}",
            expected,
            quantities.len()
        )));
    }
    if quantities.iter().any(|&q| q < 0) {
        return Err(AppError::validation("size quantities cannot be negative"));
    }
    Ok(())
}

fn size_rows(product: &str, quantities: &[i32]) -> Vec<ProductSize> {
    SIZE_RANGE
        .zip(quantities.iter())
        .map(|(size, &quantity)| ProductSize {
            product: product.to_string(),
            size,
            quantity,
        })
        .collect()
}

// =============================================================================
// Product Handlers
// =============================================================================

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.list_products().await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// GET /api/products/:id/sizes - 获取商品的 12 个尺码行
pub async fn list_sizes(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ProductSize>>> {
    let rows = state.store.sizes_for_product(&id).await?;
    Ok(Json(rows))
}

/// POST /api/products - 创建商品及其尺码行
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_sizes(&payload.sizes)?;

    // The aggregate starts as the sum of the initial size quantities
    let max_quantity: i32 = payload.sizes.iter().sum();

    let product = state
        .store
        .insert_product(Product {
            id: None,
            name: payload.name,
            category: payload.category,
            price: payload.price,
            description: payload.description,
            image: payload.image.unwrap_or_default(),
            max_quantity,
        })
        .await?;
    let id = product.id.clone().unwrap_or_default();

    state
        .store
        .insert_size_rows(size_rows(&id, &payload.sizes))
        .await?;

    tracing::info!(product = %id, max_quantity, "Product created with size rows");
    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品；`sizes` 会整体替换尺码行
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let sizes = payload.sizes.clone();
    if let Some(ref quantities) = sizes {
        validate_sizes(quantities)?;
    }
    let mut product = state
        .store
        .update_product(
            &id,
            ProductUpdate {
                sizes: None,
                ..payload
            },
        )
        .await?;

    // Replace size rows wholesale and re-denormalize the aggregate
    if let Some(quantities) = sizes {
        state.store.delete_size_rows(&id).await?;
        state
            .store
            .insert_size_rows(size_rows(&id, &quantities))
            .await?;

        let total = state
            .manager
            .ledger()
            .recompute_aggregate(&id)
            .await
            .map_err(OrderError::from)?;
        product.max_quantity = total;
    }

    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品及其尺码行
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.store.delete_size_rows(&id).await?;
    state.store.delete_product(&id).await?;
    Ok(Json(true))
}
