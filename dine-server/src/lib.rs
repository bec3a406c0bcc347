//! Dine Server - 扫码点餐平台服务端
//!
//! # 架构概述
//!
//! 本模块是服务端主入口，提供以下核心功能：
//!
//! - **订单聚合** (`orders`): 下单冻结计价、状态机、guest 归集
//! - **实时分发** (`live`): staff 广播 + 订单房间的 WebSocket hub
//! - **推送分发** (`services`): 设备令牌注册表与 multicast 投递
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dine-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单聚合
//! ├── live/          # 实时事件 hub + WebSocket
//! ├── services/      # 推送分发
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod live;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use live::LiveHub;
pub use orders::OrderService;
pub use services::{DispatchOutcome, NotificationService};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
