//! LiveHub — 订单事件实时分发
//!
//! 管理两种投递域：
//!
//! ```text
//! OrderService
//!       │ OrderEvent (name + payload + audience)
//!       ▼
//! LiveHub
//!   ├── staff_tx: broadcast::Sender<OrderEvent>
//!   │     所有管理端 socket 都订阅，收到全部订单事件
//!   └── rooms: room_id → broadcast::Sender<OrderEvent>
//!         客户 socket 发送 subscribe 后加入 `order:<id>` 房间，
//!         只收到该订单的定向副本
//! ```
//!
//! 投递是 at-most-once、best-effort：无订阅者时 send 返回 Err，
//! 安全忽略；持久化状态的正确性从不依赖事件送达。

use dashmap::DashMap;
use shared::message::{Audience, OrderEvent, order_room};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel 容量 — 足以缓冲连接时突发
const BROADCAST_CAPACITY: usize = 256;

/// 全局实时事件 hub
#[derive(Clone)]
pub struct LiveHub {
    /// staff 广播通道
    staff_tx: broadcast::Sender<OrderEvent>,
    /// room_id → 房间广播通道
    rooms: Arc<DashMap<String, broadcast::Sender<OrderEvent>>>,
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveHub {
    pub fn new() -> Self {
        let (staff_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            staff_tx,
            rooms: Arc::new(DashMap::new()),
        }
    }

    /// 按事件声明的受众路由投递
    pub fn publish(&self, event: OrderEvent) {
        match event.audience() {
            Audience::Staff => self.broadcast(event),
            Audience::Room => {
                let room = order_room(event.order_id());
                self.publish_to_room(&room, event);
            }
            Audience::StaffAndRoom => {
                let room = order_room(event.order_id());
                self.publish_to_room(&room, event.clone());
                self.broadcast(event);
            }
        }
    }

    /// 广播到所有 staff 订阅者
    ///
    /// 无订阅者时 send 返回 Err，安全忽略。
    pub fn broadcast(&self, event: OrderEvent) {
        let _ = self.staff_tx.send(event);
    }

    /// 投递到指定房间
    ///
    /// 房间不存在（从未有人订阅）时静默丢弃；最后一个订阅者掉线后
    /// 顺手清理房间条目。
    pub fn publish_to_room(&self, room_id: &str, event: OrderEvent) {
        let stale = match self.rooms.get(room_id) {
            Some(tx) => tx.send(event).is_err(),
            None => false,
        };
        if stale {
            self.rooms
                .remove_if(room_id, |_, tx| tx.receiver_count() == 0);
        }
    }

    /// 订阅 staff 广播
    pub fn subscribe_staff(&self) -> broadcast::Receiver<OrderEvent> {
        self.staff_tx.subscribe()
    }

    /// 加入房间（按需创建）
    ///
    /// 房间成员关系由返回的 Receiver 的生命周期决定：连接断开、
    /// Receiver 被丢弃，成员资格随之消失。协议里没有 unsubscribe。
    pub fn subscribe_room(&self, room_id: &str) -> broadcast::Receiver<OrderEvent> {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// 当前有订阅者的房间数（诊断用）
    pub fn active_rooms(&self) -> usize {
        self.rooms
            .iter()
            .filter(|e| e.value().receiver_count() > 0)
            .count()
    }

    /// 当前 staff 订阅者数（诊断用）
    pub fn staff_subscribers(&self) -> usize {
        self.staff_tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{StatusPayload, ToastKind, ToastPayload};
    use shared::order::OrderStatus;

    fn status_event(order_id: &str, status: OrderStatus) -> OrderEvent {
        OrderEvent::Status(StatusPayload {
            order_id: order_id.to_string(),
            status,
        })
    }

    #[tokio::test]
    async fn staff_broadcast_reaches_all_staff_receivers() {
        let hub = LiveHub::new();
        let mut rx1 = hub.subscribe_staff();
        let mut rx2 = hub.subscribe_staff();

        hub.publish(status_event("order:a", OrderStatus::Served));

        assert_eq!(rx1.recv().await.unwrap().order_id(), "order:a");
        assert_eq!(rx2.recv().await.unwrap().order_id(), "order:a");
    }

    #[tokio::test]
    async fn room_delivery_is_isolated_per_order() {
        let hub = LiveHub::new();
        let mut room_a = hub.subscribe_room("order:a");
        let mut room_b = hub.subscribe_room("order:b");

        hub.publish(status_event("order:a", OrderStatus::ReadyToServe));

        let got = room_a.recv().await.unwrap();
        assert_eq!(got.order_id(), "order:a");
        // Room b saw nothing
        assert!(matches!(
            room_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn status_event_goes_to_both_staff_and_room() {
        let hub = LiveHub::new();
        let mut staff = hub.subscribe_staff();
        let mut room = hub.subscribe_room("order:a");

        hub.publish(status_event("order:a", OrderStatus::ProcessingInKitchen));

        assert_eq!(staff.recv().await.unwrap().order_id(), "order:a");
        assert_eq!(room.recv().await.unwrap().order_id(), "order:a");
    }

    #[tokio::test]
    async fn notification_event_skips_staff_broadcast() {
        let hub = LiveHub::new();
        let mut staff = hub.subscribe_staff();
        let mut room = hub.subscribe_room("order:a");

        hub.publish(OrderEvent::Notification(ToastPayload {
            order_id: "order:a".into(),
            message: "Your order is ready to serve!".into(),
            kind: ToastKind::Ready,
        }));

        assert_eq!(room.recv().await.unwrap().name(), "order:notification");
        assert!(matches!(
            staff.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let hub = LiveHub::new();
        // No staff, no rooms — must not panic or error
        hub.publish(status_event("order:ghost", OrderStatus::Approved));
    }

    #[tokio::test]
    async fn room_entry_cleaned_after_last_receiver_drops() {
        let hub = LiveHub::new();
        {
            let _rx = hub.subscribe_room("order:a");
            assert_eq!(hub.active_rooms(), 1);
        }
        // Receiver dropped; next publish notices and cleans the entry
        hub.publish(status_event("order:a", OrderStatus::Served));
        assert_eq!(hub.active_rooms(), 0);
        assert!(hub.rooms.is_empty());
    }
}
