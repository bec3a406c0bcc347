//! Booking API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// 需要登录的路由
pub fn user_router() -> Router<ServerState> {
    Router::new()
        .route("/api/booking/create", post(handler::create))
        .route("/api/booking/my-bookings", get(handler::my_bookings))
}

/// 管理路由
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/booking/bookings", get(handler::all_bookings))
        .route(
            "/api/booking/update-status/{booking_id}",
            put(handler::update_status),
        )
}
