//! Live API 模块 - WebSocket 接入路由

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::live::ws;

/// 客户 socket（订阅订单房间，无需登录）
pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/live/ws", get(ws::customer_ws))
}

/// staff 广播 socket（admin）
pub fn admin_router() -> Router<ServerState> {
    Router::new().route("/api/live/admin/ws", get(ws::admin_ws))
}
