//! 实时事件载荷定义
//!
//! 每个事件名对应一个显式的载荷类型（封闭和类型），而不是开放字典。
//! 字段名保持 camelCase，与前端订阅的 JSON 帧一致。

use serde::{Deserialize, Serialize};

use crate::order::{OrderStatus, OrderView, PaymentStatus};

/// `order:new` — 新订单（含完整展开的订单）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderPayload {
    pub order: OrderView,
}

/// `order:status` — 状态变更
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub order_id: String,
    pub status: OrderStatus,
}

/// In-app toast kind (`order:notification`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// The order is ready at the counter
    Ready,
}

/// `order:notification` — 房间内即时提示
///
/// 仅投递给当前连接的房间订阅者，不落库、不重试。
/// 与推送通知子系统（设备令牌）无关。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToastPayload {
    pub order_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

/// `order:paymentStatus` — 支付状态变更
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusPayload {
    pub order_id: String,
    pub payment_status: PaymentStatus,
}

/// `order:discount` — 折扣变更
///
/// `total_amount` 是重新计算后的应付金额（原始总额 - 折扣）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPayload {
    pub order_id: String,
    pub discount: f64,
    pub total_amount: f64,
}

/// `order:estimatedTime` — 预计出餐时间变更（分钟）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedTimePayload {
    pub order_id: String,
    pub estimated_time: u32,
}
