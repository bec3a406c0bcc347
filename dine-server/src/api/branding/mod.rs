//! Branding API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/config/branding", get(handler::get_branding))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new().route("/api/config/branding/update", put(handler::update_branding))
}
