//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

/// 需要登录的购物车路由
pub fn user_router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart", get(handler::get_cart))
        .route("/api/cart/add", post(handler::add_item))
        .route("/api/cart/update/{menu_id}", put(handler::update_quantity))
        .route("/api/cart/remove/{menu_id}", delete(handler::remove_item))
}
