//! Notification API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// 设备令牌注册（需要登录）
pub fn user_router() -> Router<ServerState> {
    Router::new()
        .route("/api/notification/register-token", post(handler::register_token))
        .route(
            "/api/notification/unregister-token",
            post(handler::unregister_token),
        )
}

/// 管理路由（自定义推送）
pub fn admin_router() -> Router<ServerState> {
    Router::new().route(
        "/api/notification/send/order/{order_id}",
        post(handler::send_to_order),
    )
}
