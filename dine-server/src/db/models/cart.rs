//! Cart Model
//!
//! 每个用户一个购物车。下单时整体读取、计价并原子清空。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A single cart line: menu item reference + quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub quantity: u32,
}

/// Cart entity (one per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub items: Vec<CartLine>,
    pub updated_at: i64,
}

/// Cart line with menu item details resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub is_available: bool,
    pub quantity: u32,
}

/// Resolved cart view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: f64,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddItem {
    /// Menu item record id ("menu_item:xxx")
    pub menu_id: String,
    pub quantity: u32,
}

/// Set-quantity payload
#[derive(Debug, Clone, Deserialize)]
pub struct CartSetQuantity {
    pub quantity: i64,
}
