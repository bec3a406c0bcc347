//! Order API Handlers
//!
//! 所有变更委托给 [`OrderService`]；handler 只做请求形状和权限关注点。

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shared::order::{OrderStatus, OrderView, PaymentStatus};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::orders::OrderService;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// POST /api/order/place — checkout from the caller's cart
pub async fn place(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = OrderService::from_state(&state);
    let order = service.place_order(&user.id, payload).await?;
    Ok(ok_with_message(order, "Order placed successfully"))
}

/// GET /api/order/my-orders
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let service = OrderService::from_state(&state);
    let orders = service.user_orders(&user.id).await?;
    Ok(ok(orders))
}

/// GET /api/order/table/{tableNumber} — public guest lookup (48h window)
pub async fn by_table(
    State(state): State<ServerState>,
    Path(table_number): Path<u32>,
) -> AppResult<Json<AppResponse<Vec<OrderView>>>> {
    let service = OrderService::from_state(&state);
    let orders = service.orders_by_table(table_number).await?;
    Ok(ok(orders))
}

/// PUT /api/order/claim/{tableNumber} — guest→registered reconciliation
pub async fn claim_by_table(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(table_number): Path<u32>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    // Claiming moves orders INTO a real account; an anonymous session
    // cannot be a claim target
    if user.is_guest() {
        return Err(AppError::forbidden("Guests cannot claim orders"));
    }

    let service = OrderService::from_state(&state);
    let claimed = service.claim_orders_by_table(table_number, &user.id).await?;
    let message = format!("{} orders claimed", claimed.len());
    Ok(ok_with_message(claimed, message))
}

/// GET /api/order/orders (admin) — all orders, resolved
pub async fn all_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<OrderView>>>> {
    let service = OrderService::from_state(&state);
    let orders = service.all_orders().await?;
    Ok(ok(orders))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/order/update-status/{orderId} (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = OrderService::from_state(&state);
    let order = service.update_status(&order_id, payload.status).await?;
    Ok(ok_with_message(order, "Order status updated"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// PUT /api/order/update-payment/{orderId} (admin)
pub async fn update_payment_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<PaymentStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = OrderService::from_state(&state);
    let order = service
        .update_payment_status(&order_id, payload.payment_status)
        .await?;
    Ok(ok_with_message(order, "Payment status updated"))
}

#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub discount: f64,
}

/// PUT /api/order/update-discount/{orderId} (admin)
pub async fn update_discount(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<DiscountRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = OrderService::from_state(&state);
    let order = service.update_discount(&order_id, payload.discount).await?;
    Ok(ok_with_message(order, "Discount updated"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedTimeRequest {
    pub estimated_time: u32,
}

/// PUT /api/order/update-estimated-time/{orderId} (admin)
pub async fn update_estimated_time(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<EstimatedTimeRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = OrderService::from_state(&state);
    let order = service
        .update_estimated_time(&order_id, payload.estimated_time)
        .await?;
    Ok(ok_with_message(order, "Estimated time updated"))
}
