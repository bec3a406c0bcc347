//! Order service tests — checkout, mutations, claiming, revenue
//!
//! 全部跑在内存数据库上；推送走脚本化 provider。

use std::collections::HashMap;

use shared::message::{OrderEvent, order_room};
use shared::order::{OrderStatus, PaymentStatus};

use crate::core::{Config, ServerState};
use crate::db::models::{
    CartLine, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate, Order, OrderCreate,
};
use crate::db::repository::{
    CartRepository, CategoryRepository, MenuRepository, OrderRepository, UserRepository,
};
use crate::orders::OrderService;
use crate::utils::AppError;

async fn test_state() -> ServerState {
    let config = Config::with_overrides("/tmp/dine-test", 0);
    ServerState::initialize_in_memory(&config).await
}

async fn seed_user(state: &ServerState, name: &str, email: &str, is_guest: bool) -> String {
    let repo = UserRepository::new(state.get_db());
    let user = if is_guest {
        repo.create_guest(name.into(), email.into(), "hash".into())
            .await
            .unwrap()
    } else {
        repo.create(name.into(), email.into(), "hash".into())
            .await
            .unwrap()
    };
    user.id_string()
}

async fn seed_menu_item(state: &ServerState, name: &str, price: f64) -> MenuItem {
    let categories = CategoryRepository::new(state.get_db());
    let category = match categories.find_by_name("Mains").await.unwrap() {
        Some(c) => c,
        None => categories
            .create(CategoryCreate {
                name: "Mains".into(),
                image: "https://img.example/mains.png".into(),
            })
            .await
            .unwrap(),
    };

    MenuRepository::new(state.get_db())
        .create(MenuItemCreate {
            name: name.into(),
            description: format!("{name} description"),
            price,
            image: format!("https://img.example/{name}.png"),
            category: category.id.unwrap().to_string(),
        })
        .await
        .unwrap()
}

async fn fill_cart(state: &ServerState, user_id: &str, lines: &[(&MenuItem, u32)]) {
    let items = lines
        .iter()
        .map(|(item, quantity)| CartLine {
            menu_item: item.id.clone().unwrap(),
            quantity: *quantity,
        })
        .collect();
    CartRepository::new(state.get_db())
        .save_items(user_id, items)
        .await
        .unwrap();
}

fn checkout_for_table(table_number: u32) -> OrderCreate {
    OrderCreate {
        table_number,
        address: String::new(),
        payment_method: Default::default(),
        payment_status: Default::default(),
        transaction_id: String::new(),
    }
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn place_order_freezes_total_against_later_price_changes() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 2)]).await;

    let order = service
        .place_order(&user, checkout_for_table(7))
        .await
        .unwrap();
    assert_eq!(order.total_amount, 20.0);

    // Price hike after placement must not touch the frozen snapshot
    MenuRepository::new(state.get_db())
        .update(
            &pizza.id_string(),
            MenuItemUpdate {
                price: Some(99.0),
                name: None,
                description: None,
                image: None,
                category: None,
                is_available: None,
            },
        )
        .await
        .unwrap();

    let reread = service.get(&order.id_string()).await.unwrap();
    assert_eq!(reread.total_amount, 20.0);
}

#[tokio::test]
async fn place_order_clears_the_cart() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 1)]).await;

    service
        .place_order(&user, checkout_for_table(3))
        .await
        .unwrap();

    let cart = CartRepository::new(state.get_db())
        .find_by_user(&user)
        .await
        .unwrap()
        .unwrap();
    assert!(cart.items.is_empty());

    // Second checkout from the now-empty cart fails
    let again = service.place_order(&user, checkout_for_table(3)).await;
    assert!(matches!(again, Err(AppError::EmptyCart)));
}

#[tokio::test]
async fn empty_cart_checkout_fails_without_persisting() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;

    let result = service.place_order(&user, checkout_for_table(4)).await;
    assert!(matches!(result, Err(AppError::EmptyCart)));

    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn zero_table_number_is_rejected() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 1)]).await;

    let result = service.place_order(&user, checkout_for_table(0)).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn place_order_broadcasts_resolved_order_to_staff() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 2)]).await;

    let mut staff = state.live.subscribe_staff();
    let order = service
        .place_order(&user, checkout_for_table(7))
        .await
        .unwrap();

    match staff.recv().await.unwrap() {
        OrderEvent::New(payload) => {
            assert_eq!(payload.order.id, order.id_string());
            assert_eq!(payload.order.owner.name, "Ana");
            assert_eq!(payload.order.items.len(), 1);
            assert_eq!(payload.order.items[0].name, "Pizza");
            assert_eq!(payload.order.total_amount, 20.0);
        }
        other => panic!("Expected order:new, got {other:?}"),
    }
}

// ============================================================================
// Staff mutations + fan-out
// ============================================================================

#[tokio::test]
async fn discount_rejects_negative_and_above_total() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 2)]).await;
    let order = service
        .place_order(&user, checkout_for_table(7))
        .await
        .unwrap();
    let id = order.id_string();

    assert!(matches!(
        service.update_discount(&id, -1.0).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.update_discount(&id, 20.5).await,
        Err(AppError::Validation(_))
    ));

    let updated = service.update_discount(&id, 5.0).await.unwrap();
    assert_eq!(updated.discount, 5.0);
    assert_eq!(updated.payable(), 15.0);
}

#[tokio::test]
async fn unknown_order_mutations_are_not_found() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let missing = "order:doesnotexist";
    assert!(matches!(
        service.update_status(missing, OrderStatus::Served).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update_payment_status(missing, PaymentStatus::Paid)
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.update_estimated_time(missing, 10).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn backward_status_moves_are_permitted() {
    // Staff correction workflow relies on the permissive state machine
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 1)]).await;
    let order = service
        .place_order(&user, checkout_for_table(2))
        .await
        .unwrap();
    let id = order.id_string();

    service.update_status(&id, OrderStatus::Served).await.unwrap();
    let corrected = service
        .update_status(&id, OrderStatus::ProcessingInKitchen)
        .await
        .unwrap();
    assert_eq!(corrected.status, OrderStatus::ProcessingInKitchen);
}

#[tokio::test]
async fn served_and_unpaid_can_coexist() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    fill_cart(&state, &user, &[(&pizza, 1)]).await;
    let order = service
        .place_order(&user, checkout_for_table(2))
        .await
        .unwrap();

    let served = service
        .update_status(&order.id_string(), OrderStatus::Served)
        .await
        .unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert_eq!(served.payment_status, PaymentStatus::Unpaid);
}

/// End-to-end scenario: table 7, $10×2 + $5×1 → 25; discount 5 → payable 20;
/// Ready to Serve → room toast + status to both audiences.
#[tokio::test]
async fn full_dining_flow_fans_out_to_both_audiences() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;
    let cola = seed_menu_item(&state, "Cola", 5.0).await;
    fill_cart(&state, &user, &[(&pizza, 2), (&cola, 1)]).await;

    let order = service
        .place_order(&user, checkout_for_table(7))
        .await
        .unwrap();
    assert_eq!(order.total_amount, 25.0);
    let id = order.id_string();

    let discounted = service.update_discount(&id, 5.0).await.unwrap();
    assert_eq!(discounted.payable(), 20.0);

    // Customer session joins the order room; an admin dashboard is connected
    let mut room = state.live.subscribe_room(&order_room(&id));
    let mut staff = state.live.subscribe_staff();

    service
        .update_status(&id, OrderStatus::ReadyToServe)
        .await
        .unwrap();

    // Staff broadcast: the status change
    match staff.recv().await.unwrap() {
        OrderEvent::Status(p) => {
            assert_eq!(p.order_id, id);
            assert_eq!(p.status, OrderStatus::ReadyToServe);
        }
        other => panic!("Expected order:status on broadcast, got {other:?}"),
    }

    // Room: status copy, then the ready toast (room only)
    match room.recv().await.unwrap() {
        OrderEvent::Status(p) => assert_eq!(p.order_id, id),
        other => panic!("Expected order:status in room, got {other:?}"),
    }
    match room.recv().await.unwrap() {
        OrderEvent::Notification(p) => {
            assert_eq!(p.order_id, id);
            assert!(p.message.contains("ready to serve"));
        }
        other => panic!("Expected order:notification in room, got {other:?}"),
    }

    // The toast never reaches the staff broadcast
    assert!(staff.try_recv().is_err());
}

// ============================================================================
// Guest claiming
// ============================================================================

#[tokio::test]
async fn claim_reassigns_guest_orders_and_is_idempotent() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let guest = seed_user(&state, "Guest-abc", "guest-1-abc@guest.local", true).await;
    let registered = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;

    fill_cart(&state, &guest, &[(&pizza, 1)]).await;
    let order = service
        .place_order(&guest, checkout_for_table(3))
        .await
        .unwrap();

    let claimed = service.claim_orders_by_table(3, &registered).await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].user.to_string(), registered);

    let reread = service.get(&order.id_string()).await.unwrap();
    assert_eq!(reread.user.to_string(), registered);

    // Second claim finds no guest owners — zero additional orders
    let second = service.claim_orders_by_table(3, &registered).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn claim_never_steals_registered_users_orders() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let ana = seed_user(&state, "Ana", "ana@example.com", false).await;
    let mallory = seed_user(&state, "Mallory", "mallory@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;

    fill_cart(&state, &ana, &[(&pizza, 1)]).await;
    let order = service
        .place_order(&ana, checkout_for_table(5))
        .await
        .unwrap();

    let claimed = service.claim_orders_by_table(5, &mallory).await.unwrap();
    assert!(claimed.is_empty());

    let reread = service.get(&order.id_string()).await.unwrap();
    assert_eq!(reread.user.to_string(), ana);
}

#[tokio::test]
async fn claim_only_touches_the_given_table() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let guest = seed_user(&state, "Guest-a", "guest-1-a@guest.local", true).await;
    let registered = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;

    fill_cart(&state, &guest, &[(&pizza, 1)]).await;
    service.place_order(&guest, checkout_for_table(3)).await.unwrap();
    fill_cart(&state, &guest, &[(&pizza, 1)]).await;
    let other_table = service
        .place_order(&guest, checkout_for_table(9))
        .await
        .unwrap();

    let claimed = service.claim_orders_by_table(3, &registered).await.unwrap();
    assert_eq!(claimed.len(), 1);

    let untouched = service.get(&other_table.id_string()).await.unwrap();
    assert_eq!(untouched.user.to_string(), guest);
}

// ============================================================================
// Table lookup window
// ============================================================================

#[tokio::test]
async fn table_lookup_excludes_orders_older_than_window() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let pizza = seed_menu_item(&state, "Pizza", 10.0).await;

    fill_cart(&state, &user, &[(&pizza, 1)]).await;
    let recent = service
        .place_order(&user, checkout_for_table(6))
        .await
        .unwrap();

    // An order created three days ago, outside the 48h window
    let repo = OrderRepository::new(state.get_db());
    let stale_at = shared::util::now_millis() - 72 * 60 * 60 * 1000;
    repo.create(Order {
        created_at: stale_at,
        updated_at: stale_at,
        id: None,
        ..recent.clone()
    })
    .await
    .unwrap();

    let visible = service.orders_by_table(6).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, recent.id_string());
}

// ============================================================================
// Revenue aggregation
// ============================================================================

#[tokio::test]
async fn revenue_counts_paid_orders_net_of_discount() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let user = seed_user(&state, "Ana", "ana@example.com", false).await;
    let dish = seed_menu_item(&state, "Feast", 50.0).await;

    // Paid order: total 100, discount 10
    fill_cart(&state, &user, &[(&dish, 2)]).await;
    let paid = service
        .place_order(&user, checkout_for_table(1))
        .await
        .unwrap();
    service
        .update_payment_status(&paid.id_string(), PaymentStatus::Paid)
        .await
        .unwrap();
    service.update_discount(&paid.id_string(), 10.0).await.unwrap();

    // Unpaid order: total 50
    fill_cart(&state, &user, &[(&dish, 1)]).await;
    service.place_order(&user, checkout_for_table(1)).await.unwrap();

    let (start, end) = crate::utils::time::today_window();
    let repo = OrderRepository::new(state.get_db());
    let revenue = repo.revenue_between(start, end).await.unwrap();
    assert_eq!(revenue, 90.0);
}

#[tokio::test]
async fn revenue_over_empty_window_is_zero() {
    let state = test_state().await;
    let repo = OrderRepository::new(state.get_db());
    let revenue = repo.revenue_between(0, 1).await.unwrap();
    assert_eq!(revenue, 0.0);
}
