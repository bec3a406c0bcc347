//! Auth API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// 公开路由（注册 / 登录 / guest 会话）
pub fn public_router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/guest", post(handler::guest_login))
        .route("/api/auth/admin/login", post(handler::admin_login))
        .route("/api/auth/logout", post(handler::logout))
}

/// 需要登录的路由
pub fn user_router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/profile", get(handler::profile))
        .route("/api/auth/is-auth", get(handler::is_auth))
}
