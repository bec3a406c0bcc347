//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口（注册 / 登录 / guest 会话 / 管理员）
//! - [`categories`] - 分类管理接口
//! - [`menus`] - 菜单管理接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口（下单 / 变更 / 桌号查询 / 归集）
//! - [`bookings`] - 订座接口
//! - [`feedback`] - 反馈接口
//! - [`analytics`] - 营收报表接口
//! - [`notifications`] - 推送令牌与自定义通知接口
//! - [`branding`] - 品牌配置接口
//! - [`live`] - WebSocket 实时接入
//!
//! 路由按访问级别分三组装配：public / user（require_auth）/
//! admin（require_auth + require_admin）。

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod branding;
pub mod cart;
pub mod categories;
pub mod feedback;
pub mod health;
pub mod live;
pub mod menus;
pub mod notifications;
pub mod orders;

use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_auth};
use crate::core::ServerState;

/// 装配整棵路由树
pub fn router(state: ServerState) -> Router {
    let public_routes = Router::new()
        .merge(health::router())
        .merge(auth::public_router())
        .merge(categories::public_router())
        .merge(menus::public_router())
        .merge(orders::public_router())
        .merge(branding::public_router())
        .merge(live::public_router());

    let user_routes = Router::new()
        .merge(auth::user_router())
        .merge(cart::user_router())
        .merge(orders::user_router())
        .merge(bookings::user_router())
        .merge(feedback::user_router())
        .merge(notifications::user_router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .merge(categories::admin_router())
        .merge(menus::admin_router())
        .merge(orders::admin_router())
        .merge(bookings::admin_router())
        .merge(feedback::admin_router())
        .merge(analytics::admin_router())
        .merge(notifications::admin_router())
        .merge(branding::admin_router())
        .merge(live::admin_router())
        // require_auth 先跑（外层），再做角色检查
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Bearer 令牌 + 无 cookie，跨域策略可以放开
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
