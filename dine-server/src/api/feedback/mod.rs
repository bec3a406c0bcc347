//! Feedback API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn user_router() -> Router<ServerState> {
    Router::new().route("/api/feedback/create", post(handler::create))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new().route("/api/feedback/all", get(handler::list))
}
