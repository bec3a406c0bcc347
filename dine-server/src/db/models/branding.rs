//! Branding Model
//!
//! 单例配置记录：餐厅对外展示信息。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Restaurant branding config (singleton)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub restaurant_name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub tagline: String,
    pub updated_at: i64,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            id: None,
            restaurant_name: "Restaurant".to_string(),
            logo: String::new(),
            tagline: String::new(),
            updated_at: 0,
        }
    }
}

/// Branding update payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingUpdate {
    pub restaurant_name: Option<String>,
    pub logo: Option<String>,
    pub tagline: Option<String>,
}
