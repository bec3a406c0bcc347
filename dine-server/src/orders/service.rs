//! Order service — the order aggregate and its operations
//!
//! 所有订单变更从这里走：校验 → 原子持久化 → 事件发布（隔离的旁路）。
//! 事件发布和推送分发失败只记日志，绝不让已持久化的主变更报告失败。

use std::collections::HashMap;

use shared::message::{
    DiscountPayload, EstimatedTimePayload, NewOrderPayload, OrderEvent, PaymentStatusPayload,
    StatusPayload, ToastKind, ToastPayload,
};
use shared::order::{OrderLineView, OrderStatus, OrderView, OwnerView, PaymentStatus};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::db::models::{MenuItem, Order, OrderCreate, OrderLine};
use crate::db::repository::{
    CartRepository, MenuRepository, OrderRepository, UserRepository, parse_record_id,
};
use crate::live::LiveHub;
use crate::services::{DispatchOutcome, NotificationService};
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_amount, validate_table_number};
use crate::utils::{AppError, AppResult};

/// In-app toast shown to the customer when the order is ready
const READY_MESSAGE: &str = "Your order is ready to serve! Please come to the counter.";

/// Upper bound for the estimated-time field (minutes)
const MAX_ESTIMATED_MINUTES: u32 = 24 * 60;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    carts: CartRepository,
    menu: MenuRepository,
    users: UserRepository,
    live: LiveHub,
    notifications: NotificationService,
    table_lookback_hours: i64,
}

impl OrderService {
    pub fn from_state(state: &ServerState) -> Self {
        let db = state.get_db();
        Self {
            orders: OrderRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            menu: MenuRepository::new(db.clone()),
            users: UserRepository::new(db),
            live: state.live.clone(),
            notifications: state.notifications.clone(),
            table_lookback_hours: state.config.table_lookback_hours,
        }
    }

    // ========================================================================
    // Checkout
    // ========================================================================

    /// Create an order from the caller's cart
    ///
    /// 总额按此刻的菜单价格求和并冻结；购物车在同一逻辑操作里清空。
    /// 成功持久化后向 staff 广播 `order:new`（失败隔离）。
    pub async fn place_order(&self, user_id: &str, req: OrderCreate) -> AppResult<Order> {
        validate_table_number(req.table_number)?;
        if req.address.len() > MAX_ADDRESS_LEN {
            return Err(AppError::validation("address is too long"));
        }

        let user = parse_record_id("user", user_id)?;

        let cart_lines = self
            .carts
            .find_by_user(user_id)
            .await?
            .map(|c| c.items)
            .unwrap_or_default();
        if cart_lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        // Price snapshot: sum against the live catalog NOW, then freeze
        let ids: Vec<String> = cart_lines.iter().map(|l| l.menu_item.to_string()).collect();
        let catalog = self.menu.find_by_ids(&ids).await?;

        let mut total_amount = 0.0;
        let mut items = Vec::with_capacity(cart_lines.len());
        for line in &cart_lines {
            if line.quantity == 0 {
                return Err(AppError::validation("Line quantity must be at least 1"));
            }
            let item = catalog.get(&line.menu_item.to_string()).ok_or_else(|| {
                AppError::not_found(format!("Menu item {} not found", line.menu_item))
            })?;
            total_amount += item.price * f64::from(line.quantity);
            items.push(OrderLine {
                menu_item: line.menu_item.clone(),
                quantity: line.quantity,
            });
        }

        let now = now_millis();
        let order = self
            .orders
            .create(Order {
                id: None,
                user,
                table_number: req.table_number,
                items,
                total_amount,
                address: req.address,
                status: OrderStatus::Approved,
                payment_method: req.payment_method,
                payment_status: req.payment_status,
                transaction_id: req.transaction_id,
                discount: 0.0,
                estimated_time: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;

        // Same logical operation: the source cart is emptied on success
        self.carts.clear(user_id).await?;

        tracing::info!(
            order = %order.id_string(),
            table = order.table_number,
            items = order.items.len(),
            total = order.total_amount,
            "Order placed"
        );

        // Side effect, isolated: staff see the fully resolved order
        match self.resolve(&order).await {
            Ok(view) => self
                .live
                .publish(OrderEvent::New(NewOrderPayload { order: view })),
            Err(e) => tracing::warn!("Failed to resolve order for broadcast: {e}"),
        }

        Ok(order)
    }

    // ========================================================================
    // Staff-facing mutations
    // ========================================================================

    /// Overwrite the order status (any member of the closed set is accepted)
    ///
    /// Ready to Serve 额外触发：房间内 toast + 推送分发（都是旁路）。
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        let order = self.orders.set_status(order_id, status).await?;
        let id = order.id_string();

        self.live.publish(OrderEvent::Status(StatusPayload {
            order_id: id.clone(),
            status,
        }));

        if status == OrderStatus::ReadyToServe {
            self.live.publish(OrderEvent::Notification(ToastPayload {
                order_id: id.clone(),
                message: READY_MESSAGE.to_string(),
                kind: ToastKind::Ready,
            }));

            let mut data = HashMap::new();
            data.insert("orderId".to_string(), serde_json::json!(id));
            data.insert("status".to_string(), serde_json::json!(status.to_string()));
            if let Err(e) = self
                .notifications
                .send_to_user(&order.user.to_string(), "Order update", READY_MESSAGE, &data)
                .await
            {
                tracing::warn!(order = %id, "Push dispatch failed: {e}");
            }
        }

        Ok(order)
    }

    /// Overwrite the payment flag
    pub async fn update_payment_status(
        &self,
        order_id: &str,
        payment_status: PaymentStatus,
    ) -> AppResult<Order> {
        let order = self.orders.set_payment_status(order_id, payment_status).await?;

        self.live
            .publish(OrderEvent::PaymentStatus(PaymentStatusPayload {
                order_id: order.id_string(),
                payment_status,
            }));

        Ok(order)
    }

    /// Overwrite the discount (scalar, not a delta)
    ///
    /// 折扣不能为负，也不能超过冻结总额：应付金额绝不为负。
    pub async fn update_discount(&self, order_id: &str, discount: f64) -> AppResult<Order> {
        validate_amount(discount, "discount")?;

        let existing = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
        if discount > existing.total_amount {
            return Err(AppError::validation(format!(
                "Discount {discount} exceeds order total {}",
                existing.total_amount
            )));
        }

        let order = self.orders.set_discount(order_id, discount).await?;

        self.live.publish(OrderEvent::Discount(DiscountPayload {
            order_id: order.id_string(),
            discount,
            total_amount: order.payable(),
        }));

        Ok(order)
    }

    /// Overwrite the estimated time (minutes)
    pub async fn update_estimated_time(
        &self,
        order_id: &str,
        estimated_time: u32,
    ) -> AppResult<Order> {
        if estimated_time > MAX_ESTIMATED_MINUTES {
            return Err(AppError::validation("Invalid estimated time"));
        }

        let order = self.orders.set_estimated_time(order_id, estimated_time).await?;

        self.live
            .publish(OrderEvent::EstimatedTime(EstimatedTimePayload {
                order_id: order.id_string(),
                estimated_time,
            }));

        Ok(order)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Recent orders for a table (guest lookup, trailing window)
    pub async fn orders_by_table(&self, table_number: u32) -> AppResult<Vec<OrderView>> {
        validate_table_number(table_number)?;
        let since = crate::utils::time::hours_ago_millis(self.table_lookback_hours);
        let orders = self.orders.find_by_table_since(table_number, since).await?;
        self.resolve_all(orders).await
    }

    /// Orders owned by the calling identity, newest first
    pub async fn user_orders(&self, user_id: &str) -> AppResult<Vec<Order>> {
        Ok(self.orders.find_by_user(user_id).await?)
    }

    /// All orders, resolved for the staff dashboard
    pub async fn all_orders(&self) -> AppResult<Vec<OrderView>> {
        let orders = self.orders.find_all().await?;
        self.resolve_all(orders).await
    }

    /// Single order, raw
    pub async fn get(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    // ========================================================================
    // Guest-claim reconciliation
    // ========================================================================

    /// Reassign every guest-owned order of a table to `user_id`
    ///
    /// 幂等：第二次调用找不到 guest 属主，归集 0 单。已属于注册用户的
    /// 订单永不转移。单笔失败不终止批次，继续处理剩余并报告成功集合。
    pub async fn claim_orders_by_table(
        &self,
        table_number: u32,
        user_id: &str,
    ) -> AppResult<Vec<Order>> {
        validate_table_number(table_number)?;
        parse_record_id("user", user_id)?;

        let candidates = self.orders.find_by_table(table_number).await?;
        let mut claimed = Vec::new();

        for order in candidates {
            let owner_id = order.user.to_string();
            if owner_id == user_id {
                continue;
            }

            let owner = match self.users.find_by_id(&owner_id).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(order = %order.id_string(), "Claim: owner lookup failed: {e}");
                    continue;
                }
            };
            // Only guest-owned orders are claimable; a registered owner's
            // order is never reassigned by someone else's claim
            let Some(owner) = owner else { continue };
            if !owner.is_guest {
                continue;
            }

            match self.orders.reassign_owner(&order.id_string(), user_id).await {
                Ok(updated) => claimed.push(updated),
                Err(e) => {
                    tracing::warn!(order = %order.id_string(), "Claim: reassign failed: {e}");
                }
            }
        }

        tracing::info!(table = table_number, count = claimed.len(), "Orders claimed");
        Ok(claimed)
    }

    // ========================================================================
    // Notifications (admin-triggered)
    // ========================================================================

    /// Push a custom notification to the owner of an order
    pub async fn notify_order_owner(
        &self,
        order_id: &str,
        title: &str,
        message: &str,
    ) -> AppResult<DispatchOutcome> {
        let order = self.get(order_id).await?;

        let mut data = HashMap::new();
        data.insert("orderId".to_string(), serde_json::json!(order.id_string()));
        data.insert(
            "status".to_string(),
            serde_json::json!(order.status.to_string()),
        );

        self.notifications
            .send_to_user(&order.user.to_string(), title, message, &data)
            .await
    }

    // ========================================================================
    // Resolution (owner + line items expanded for display)
    // ========================================================================

    /// Expand one order for display
    ///
    /// 行项价格展示用当前菜单价；`total_amount` 始终是冻结快照。
    /// 已下架/删除的菜品渲染为占位行，不影响冻结总额。
    pub async fn resolve(&self, order: &Order) -> AppResult<OrderView> {
        let owner = self
            .users
            .find_by_id(&order.user.to_string())
            .await?
            .map(|u| OwnerView {
                id: u.id_string(),
                name: u.name.clone(),
                email: u.email.clone(),
                is_guest: u.is_guest,
            })
            .unwrap_or_else(|| OwnerView {
                id: order.user.to_string(),
                name: "Guest".to_string(),
                email: String::new(),
                is_guest: true,
            });

        let ids: Vec<String> = order.items.iter().map(|l| l.menu_item.to_string()).collect();
        let catalog = self.menu.find_by_ids(&ids).await?;
        let items = order
            .items
            .iter()
            .map(|line| resolve_line(line, &catalog))
            .collect();

        Ok(OrderView {
            id: order.id_string(),
            table_number: order.table_number,
            owner,
            items,
            total_amount: order.total_amount,
            address: order.address.clone(),
            status: order.status,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            transaction_id: order.transaction_id.clone(),
            discount: order.discount,
            estimated_time: order.estimated_time,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    async fn resolve_all(&self, orders: Vec<Order>) -> AppResult<Vec<OrderView>> {
        let mut views = Vec::with_capacity(orders.len());
        for order in &orders {
            views.push(self.resolve(order).await?);
        }
        Ok(views)
    }
}

fn resolve_line(line: &OrderLine, catalog: &HashMap<String, MenuItem>) -> OrderLineView {
    let id = line.menu_item.to_string();
    match catalog.get(&id) {
        Some(item) => OrderLineView {
            menu_item_id: id,
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: line.quantity,
            line_total: item.price * f64::from(line.quantity),
        },
        None => OrderLineView {
            menu_item_id: id,
            name: "Unavailable item".to_string(),
            image: String::new(),
            price: 0.0,
            quantity: line.quantity,
            line_total: 0.0,
        },
    }
}
