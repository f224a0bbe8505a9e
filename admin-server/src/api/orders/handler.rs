//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::models::{Order, OrderItem, OrderStatus};
use crate::orders::{OrderItemRequest, OrderRequest, StockLevel};
use crate::utils::{AppError, AppResult};

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryRequest {
    pub order_items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryResponse {
    pub order_items: Vec<StockLevel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PurgeRequest {
    pub id: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveCancelRequest {
    pub approve: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Order Handlers
// =============================================================================

/// GET /api/orders - 获取所有订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.manager.list_orders().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单及行项目
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let order = state
        .manager
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    let items = state.manager.items_for_order(&id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// POST /api/orders - 创建订单 (校验库存 → 预留 → 重算聚合)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let order = state.manager.create_order(payload).await?;
    Ok(Json(CreatedResponse {
        order_id: order.id.unwrap_or_default(),
    }))
}

/// POST /api/orders/check-inventory - 库存校验（只读）
pub async fn check_inventory(
    State(state): State<ServerState>,
    Json(payload): Json<CheckInventoryRequest>,
) -> AppResult<Json<CheckInventoryResponse>> {
    let levels = state.manager.check_stock(&payload.order_items).await?;
    Ok(Json(CheckInventoryResponse { order_items: levels }))
}

/// POST /api/orders/cancel - 软取消并回补库存
pub async fn cancel(
    State(state): State<ServerState>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<SuccessResponse>> {
    state.manager.cancel_order(&payload.order_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/orders/purge - 物理删除订单（独立管理操作）
pub async fn purge(
    State(state): State<ServerState>,
    Json(payload): Json<PurgeRequest>,
) -> AppResult<Json<SuccessResponse>> {
    state
        .manager
        .purge_order(payload.id.as_deref(), payload.slug.as_deref())
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/orders/:id/status - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(AppError::validation)?;
    state.manager.update_status(&id, status).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/orders/:id/cancel-request - 处理客户取消请求
pub async fn resolve_cancel_request(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ResolveCancelRequest>,
) -> AppResult<Json<SuccessResponse>> {
    state
        .manager
        .resolve_cancel_request(&id, payload.approve)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
