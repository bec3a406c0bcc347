//! User Model
//!
//! 注册用户、匿名会话 (guest) 与管理员共用一张表。
//! email 全局唯一；guest 会话生成合成邮箱以满足唯一约束。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::AdminLevel;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_guest: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_admin: bool,
    #[serde(default)]
    pub admin_level: AdminLevel,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// Record id as "user:key" string (panics only on unsaved entities)
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

/// Public projection - never exposes the credential hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub is_admin: bool,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_guest: user.is_guest,
            is_admin: user.is_admin,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct UserCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}
