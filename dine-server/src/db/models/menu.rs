//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Image URL
    pub image: String,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

/// Menu item with its category name resolved (public listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category_id: String,
    pub category_name: String,
    pub is_available: bool,
}

/// Create menu item payload
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    /// Category record id ("category:xxx")
    pub category: String,
}

/// Update menu item payload
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}
