//! Order Model
//!
//! 订单持久化记录。`total_amount` 是下单时刻按当时菜单价格冻结的
//! 快照，后续菜单调价不影响既有订单。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{OrderStatus, PaymentMethod, PaymentStatus};
use surrealdb::RecordId;

/// A single order line: menu item reference + quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub quantity: u32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub table_number: u32,
    pub items: Vec<OrderLine>,
    /// Frozen price snapshot, never recomputed from the live catalog
    pub total_amount: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub discount: f64,
    /// Estimated time in minutes
    #[serde(default)]
    pub estimated_time: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Amount due: `total_amount - discount`, floored at zero
    pub fn payable(&self) -> f64 {
        (self.total_amount - self.discount).max(0.0)
    }
}

/// Checkout payload (items/total come from the caller's cart, not the body)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub table_number: u32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: String,
}
