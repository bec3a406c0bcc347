use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dine | 工作目录 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | - | 管理员账号 |
/// | SUPER_ADMIN_EMAIL / SUPER_ADMIN_PASSWORD | - | 超级管理员账号 |
/// | PUSH_ENDPOINT / PUSH_SERVER_KEY | - | 推送 provider（缺省禁用） |
/// | TABLE_LOOKBACK_HOURS | 48 | 桌号查询回溯窗口 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dine HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 管理员账号（环境配置，不入库） ===
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub super_admin_email: Option<String>,
    pub super_admin_password: Option<String>,

    // === 推送 provider ===
    /// multicast HTTP 接口地址（缺省时推送子系统降级为 NotConfigured）
    pub push_endpoint: Option<String>,
    pub push_server_key: Option<String>,

    // === 业务参数 ===
    /// 桌号查询（guest 查单）回溯窗口，小时
    pub table_lookback_hours: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dine".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            super_admin_email: std::env::var("SUPER_ADMIN_EMAIL").ok(),
            super_admin_password: std::env::var("SUPER_ADMIN_PASSWORD").ok(),

            push_endpoint: std::env::var("PUSH_ENDPOINT").ok(),
            push_server_key: std::env::var("PUSH_SERVER_KEY").ok(),

            table_lookback_hours: std::env::var("TABLE_LOOKBACK_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(48),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录: work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
