//! End-to-end guest dining flow against an in-memory database
//!
//! 覆盖完整旅程：guest 会话下单 → staff 看到 order:new →
//! 客户房间收到状态与预计时间更新 → 注册账号归集订单。

use dine_server::db::models::{CartLine, CategoryCreate, MenuItemCreate, OrderCreate};
use dine_server::db::repository::{
    CartRepository, CategoryRepository, MenuRepository, UserRepository,
};
use dine_server::{Config, OrderService, ServerState};
use shared::message::{OrderEvent, order_room};
use shared::order::OrderStatus;

async fn seeded_state() -> (ServerState, String, String) {
    let config = Config::with_overrides("/tmp/dine-it", 0);
    let state = ServerState::initialize_in_memory(&config).await;

    let users = UserRepository::new(state.get_db());
    let guest = users
        .create_guest(
            "Guest-77aa".into(),
            "guest-1722900000000-77aa@guest.local".into(),
            "hash".into(),
        )
        .await
        .unwrap();
    let registered = users
        .create("Ana".into(), "ana@example.com".into(), "hash".into())
        .await
        .unwrap();

    (state, guest.id_string(), registered.id_string())
}

async fn seed_menu(state: &ServerState, name: &str, price: f64) -> String {
    let categories = CategoryRepository::new(state.get_db());
    let category = match categories.find_by_name("Specials").await.unwrap() {
        Some(c) => c,
        None => categories
            .create(CategoryCreate {
                name: "Specials".into(),
                image: "https://img.example/specials.png".into(),
            })
            .await
            .unwrap(),
    };

    MenuRepository::new(state.get_db())
        .create(MenuItemCreate {
            name: name.into(),
            description: format!("{name} of the day"),
            price,
            image: format!("https://img.example/{name}.png"),
            category: category.id.unwrap().to_string(),
        })
        .await
        .unwrap()
        .id_string()
}

#[tokio::test]
async fn guest_orders_then_registered_account_claims() {
    let (state, guest, registered) = seeded_state().await;
    let service = OrderService::from_state(&state);

    let dish = seed_menu(&state, "Ramen", 12.5).await;
    CartRepository::new(state.get_db())
        .save_items(
            &guest,
            vec![CartLine {
                menu_item: dish.parse().unwrap(),
                quantity: 2,
            }],
        )
        .await
        .unwrap();

    // Admin dashboard is connected before checkout
    let mut staff = state.live.subscribe_staff();

    let order = service
        .place_order(
            &guest,
            OrderCreate {
                table_number: 12,
                address: String::new(),
                payment_method: Default::default(),
                payment_status: Default::default(),
                transaction_id: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(order.total_amount, 25.0);

    // Staff broadcast carries the resolved order with the guest owner
    match staff.recv().await.unwrap() {
        OrderEvent::New(payload) => {
            assert!(payload.order.owner.is_guest);
            assert_eq!(payload.order.table_number, 12);
        }
        other => panic!("Expected order:new, got {other:?}"),
    }

    // The guest session joins its order room and sees live updates
    let id = order.id_string();
    let mut room = state.live.subscribe_room(&order_room(&id));

    service.update_estimated_time(&id, 15).await.unwrap();
    match room.recv().await.unwrap() {
        OrderEvent::EstimatedTime(p) => assert_eq!(p.estimated_time, 15),
        other => panic!("Expected order:estimatedTime, got {other:?}"),
    }

    service
        .update_status(&id, OrderStatus::ProcessingInKitchen)
        .await
        .unwrap();
    match room.recv().await.unwrap() {
        OrderEvent::Status(p) => assert_eq!(p.status, OrderStatus::ProcessingInKitchen),
        other => panic!("Expected order:status, got {other:?}"),
    }

    // Guest lookup by table works without auth context
    let visible = service.orders_by_table(12).await.unwrap();
    assert_eq!(visible.len(), 1);

    // The customer signs up afterwards and claims the table's orders
    let claimed = service.claim_orders_by_table(12, &registered).await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].user.to_string(), registered);

    // Idempotent: nothing left to claim
    assert!(service
        .claim_orders_by_table(12, &registered)
        .await
        .unwrap()
        .is_empty());
}
