//! Analytics API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// 管理路由（营收报表）
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/analytics/revenue/today", get(handler::revenue_today))
        .route("/api/analytics/revenue/month", get(handler::revenue_month))
        .route("/api/analytics/revenue/range", get(handler::revenue_range))
}
