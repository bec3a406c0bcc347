//! Category API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

/// 公开路由（菜单浏览）
pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/category/all", get(handler::list))
}

/// 管理路由
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/category/add", post(handler::create))
        .route("/api/category/update/{id}", put(handler::update))
        .route("/api/category/delete/{id}", delete(handler::delete))
}
