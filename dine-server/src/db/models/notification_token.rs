//! Notification Token Model
//!
//! 设备推送令牌注册表。token 全局唯一，同一 token 在任意时刻只属于
//! 一个用户；重复注册按 token 做 upsert 并转移所有权。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Registered push-delivery token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationToken {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub token: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    pub last_seen_at: i64,
    pub created_at: i64,
}

fn default_platform() -> String {
    "web".to_string()
}

/// Register-token payload
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRegister {
    pub token: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

/// Unregister-token payload
#[derive(Debug, Clone, Deserialize)]
pub struct TokenUnregister {
    pub token: String,
}
