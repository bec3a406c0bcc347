//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// 公开路由（guest 查单）
pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/order/table/{table_number}", get(handler::by_table))
}

/// 需要登录的路由
pub fn user_router() -> Router<ServerState> {
    Router::new()
        .route("/api/order/place", post(handler::place))
        .route("/api/order/my-orders", get(handler::my_orders))
        .route("/api/order/claim/{table_number}", put(handler::claim_by_table))
}

/// 管理路由
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/order/orders", get(handler::all_orders))
        .route("/api/order/update-status/{order_id}", put(handler::update_status))
        .route(
            "/api/order/update-payment/{order_id}",
            put(handler::update_payment_status),
        )
        .route(
            "/api/order/update-discount/{order_id}",
            put(handler::update_discount),
        )
        .route(
            "/api/order/update-estimated-time/{order_id}",
            put(handler::update_estimated_time),
        )
}
