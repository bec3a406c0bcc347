use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::live::LiveHub;
use crate::services::{HttpPushProvider, NotificationService, PushProvider};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是进程的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc / Clone 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | live | LiveHub | 实时事件分发 |
/// | notifications | NotificationService | 推送分发服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 实时事件 hub (staff 广播 + 订单房间)
    pub live: LiveHub,
    /// 推送分发服务
    pub notifications: NotificationService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/dine.db)
    /// 3. 各服务 (JWT, LiveHub, Notification)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("dine.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config.clone(), db_service.db)
    }

    /// 内存数据库状态（测试、临时运行）
    pub async fn initialize_in_memory(config: &Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::with_db(config.clone(), db_service.db)
    }

    fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let live = LiveHub::new();
        let provider = build_push_provider(&config);
        let notifications = NotificationService::new(db.clone(), provider);

        Self {
            config,
            db,
            jwt_service,
            live,
            notifications,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}

/// 从配置装配推送 provider；缺少配置时禁用推送（分发服务报告 NotConfigured）
fn build_push_provider(config: &Config) -> Option<Arc<dyn PushProvider>> {
    match (&config.push_endpoint, &config.push_server_key) {
        (Some(endpoint), Some(key)) => {
            tracing::info!(endpoint = %endpoint, "Push provider configured");
            Some(Arc::new(HttpPushProvider::new(
                endpoint.clone(),
                key.clone(),
            )))
        }
        _ => {
            tracing::warn!("PUSH_ENDPOINT / PUSH_SERVER_KEY not set, push delivery disabled");
            None
        }
    }
}
