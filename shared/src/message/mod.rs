//! 实时事件协议定义
//!
//! 这些类型在 dine-server 和 clients 之间共享。服务器把订单变更
//! 封装为 [`OrderEvent`]，按事件自身声明的受众路由：
//!
//! - **Staff broadcast** — 所有已连接的管理端都会收到
//! - **Order room** — 只有加入了 `order:<id>` 房间的客户端会收到
//!
//! 投递是 fire-and-forget：无确认、无持久化、无重放。发布时不在线的
//! 客户端通过重新拉取订单状态来补齐，而不是依赖该通道。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod payload;
pub use payload::*;

/// 事件受众
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// 仅 staff 广播
    Staff,
    /// staff 广播 + 订单房间
    StaffAndRoom,
    /// 仅订单房间
    Room,
}

/// 订单房间名：`order:<id>`
///
/// 订单记录 ID 本身已是 `order:<id>` 形式（"table:key"），直接作为
/// 房间名使用；裸 key 则补上前缀。
pub fn order_room(order_id: &str) -> String {
    if order_id.starts_with("order:") {
        order_id.to_string()
    } else {
        format!("order:{order_id}")
    }
}

/// 订单实时事件（封闭和类型）
///
/// 每个变体绑定一个事件名和一个显式载荷类型，见 [`payload`]。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum OrderEvent {
    #[serde(rename = "order:new")]
    New(NewOrderPayload),
    #[serde(rename = "order:status")]
    Status(StatusPayload),
    #[serde(rename = "order:notification")]
    Notification(ToastPayload),
    #[serde(rename = "order:paymentStatus")]
    PaymentStatus(PaymentStatusPayload),
    #[serde(rename = "order:discount")]
    Discount(DiscountPayload),
    #[serde(rename = "order:estimatedTime")]
    EstimatedTime(EstimatedTimePayload),
}

impl OrderEvent {
    /// 事件名（与 serde tag 一致）
    pub fn name(&self) -> &'static str {
        match self {
            Self::New(_) => "order:new",
            Self::Status(_) => "order:status",
            Self::Notification(_) => "order:notification",
            Self::PaymentStatus(_) => "order:paymentStatus",
            Self::Discount(_) => "order:discount",
            Self::EstimatedTime(_) => "order:estimatedTime",
        }
    }

    /// 事件所属订单 ID
    pub fn order_id(&self) -> &str {
        match self {
            Self::New(p) => &p.order.id,
            Self::Status(p) => &p.order_id,
            Self::Notification(p) => &p.order_id,
            Self::PaymentStatus(p) => &p.order_id,
            Self::Discount(p) => &p.order_id,
            Self::EstimatedTime(p) => &p.order_id,
        }
    }

    /// 事件受众（路由规则）
    ///
    /// - `order:new` 仅广播（客户不需要看到别人的新订单）
    /// - `order:notification` 仅房间（即时提示只发给下单客户）
    /// - 其余变更：广播 + 房间
    pub fn audience(&self) -> Audience {
        match self {
            Self::New(_) => Audience::Staff,
            Self::Notification(_) => Audience::Room,
            Self::Status(_) | Self::PaymentStatus(_) | Self::Discount(_) | Self::EstimatedTime(_) => {
                Audience::StaffAndRoom
            }
        }
    }

    /// 序列化为 WebSocket 帧
    pub fn to_frame(&self) -> EventFrame {
        EventFrame {
            event: self.name().to_string(),
            data: self.payload_value(),
        }
    }

    fn payload_value(&self) -> serde_json::Value {
        match self {
            Self::New(p) => serde_json::to_value(p),
            Self::Status(p) => serde_json::to_value(p),
            Self::Notification(p) => serde_json::to_value(p),
            Self::PaymentStatus(p) => serde_json::to_value(p),
            Self::Discount(p) => serde_json::to_value(p),
            Self::EstimatedTime(p) => serde_json::to_value(p),
        }
        .expect("Failed to serialize event payload")
    }
}

/// WebSocket 下行帧
///
/// ```json
/// { "event": "order:status", "data": { "orderId": "...", "status": "Served" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventFrame {
    pub event: String,
    pub data: serde_json::Value,
}

impl EventFrame {
    /// 序列化为 JSON 文本（ws Text 帧）
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 解析载荷为指定类型
    pub fn parse_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// 客户端上行消息
///
/// 协议里没有 unsubscribe：房间成员关系随连接断开隐式清理。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// 加入订单房间，接收该订单的定向更新
    #[serde(rename_all = "camelCase")]
    Subscribe { order_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderStatus;

    #[test]
    fn status_event_routes_to_both_audiences() {
        let event = OrderEvent::Status(StatusPayload {
            order_id: "order:abc".into(),
            status: OrderStatus::Served,
        });
        assert_eq!(event.audience(), Audience::StaffAndRoom);
        assert_eq!(event.name(), "order:status");
        assert_eq!(event.order_id(), "order:abc");
    }

    #[test]
    fn notification_event_is_room_only() {
        let event = OrderEvent::Notification(ToastPayload {
            order_id: "order:abc".into(),
            message: "Your order is ready to serve!".into(),
            kind: ToastKind::Ready,
        });
        assert_eq!(event.audience(), Audience::Room);

        let frame = event.to_frame();
        assert_eq!(frame.event, "order:notification");
        assert_eq!(frame.data["type"], "ready");
    }

    #[test]
    fn frame_uses_camel_case_wire_fields() {
        let event = OrderEvent::Discount(DiscountPayload {
            order_id: "order:abc".into(),
            discount: 5.0,
            total_amount: 20.0,
        });
        let frame = event.to_frame();
        assert_eq!(frame.data["orderId"], "order:abc");
        assert_eq!(frame.data["totalAmount"], 20.0);
    }

    #[test]
    fn subscribe_message_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"subscribe","orderId":"order:xyz"}"#).unwrap();
        let ClientMessage::Subscribe { order_id } = msg;
        assert_eq!(order_id, "order:xyz");
    }

    #[test]
    fn room_naming() {
        assert_eq!(order_room("order:abc"), "order:abc");
        assert_eq!(order_room("abc"), "order:abc");
    }
}
