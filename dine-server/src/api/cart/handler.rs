//! Cart API Handlers
//!
//! 购物车读改都以整车为单位写回（cart.user 唯一）。数量 ≤ 0 视为移除。

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartAddItem, CartLine, CartLineView, CartSetQuantity, CartView};
use crate::db::repository::{CartRepository, MenuRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/cart — resolved cart with live menu details
pub async fn get_cart(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let carts = CartRepository::new(state.get_db());
    let lines = carts
        .find_by_user(&user.id)
        .await?
        .map(|c| c.items)
        .unwrap_or_default();

    let menu = MenuRepository::new(state.get_db());
    let ids: Vec<String> = lines.iter().map(|l| l.menu_item.to_string()).collect();
    let catalog = menu.find_by_ids(&ids).await?;

    let mut items = Vec::with_capacity(lines.len());
    let mut total = 0.0;
    for line in &lines {
        let id = line.menu_item.to_string();
        if let Some(item) = catalog.get(&id) {
            total += item.price * f64::from(line.quantity);
            items.push(CartLineView {
                menu_item_id: id,
                name: item.name.clone(),
                price: item.price,
                image: item.image.clone(),
                is_available: item.is_available,
                quantity: line.quantity,
            });
        }
    }

    Ok(ok(CartView { items, total }))
}

/// POST /api/cart/add — add an item, merging quantities
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CartAddItem>,
) -> AppResult<Json<AppResponse<CartView>>> {
    if payload.quantity == 0 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let menu = MenuRepository::new(state.get_db());
    let item = menu
        .find_by_id(&payload.menu_id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;
    if !item.is_available {
        return Err(AppError::validation("Menu item is not available"));
    }
    let menu_item = item.id.clone().expect("persisted menu item has an id");

    let carts = CartRepository::new(state.get_db());
    let mut lines = carts
        .find_by_user(&user.id)
        .await?
        .map(|c| c.items)
        .unwrap_or_default();

    match lines.iter_mut().find(|l| l.menu_item == menu_item) {
        Some(existing) => existing.quantity += payload.quantity,
        None => lines.push(CartLine {
            menu_item,
            quantity: payload.quantity,
        }),
    }

    carts.save_items(&user.id, lines).await?;

    let response = get_cart(State(state), Extension(user)).await?;
    Ok(Json(AppResponse {
        message: "Item added to cart".to_string(),
        ..response.0
    }))
}

/// PUT /api/cart/update/{menuId} — set quantity (≤ 0 removes the line)
pub async fn update_quantity(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(menu_id): Path<String>,
    Json(payload): Json<CartSetQuantity>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let carts = CartRepository::new(state.get_db());
    let mut lines = carts
        .find_by_user(&user.id)
        .await?
        .map(|c| c.items)
        .unwrap_or_default();

    let target = crate::db::repository::parse_record_id("menu_item", &menu_id)?;
    let index = lines
        .iter()
        .position(|l| l.menu_item == target)
        .ok_or_else(|| AppError::not_found("Item not found in cart"))?;

    if payload.quantity <= 0 {
        lines.remove(index);
    } else {
        lines[index].quantity = u32::try_from(payload.quantity)
            .map_err(|_| AppError::validation("Quantity is too large"))?;
    }

    carts.save_items(&user.id, lines).await?;

    let response = get_cart(State(state), Extension(user)).await?;
    Ok(Json(AppResponse {
        message: "Cart updated".to_string(),
        ..response.0
    }))
}

/// DELETE /api/cart/remove/{menuId}
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(menu_id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let carts = CartRepository::new(state.get_db());
    let lines = carts
        .find_by_user(&user.id)
        .await?
        .map(|c| c.items)
        .unwrap_or_default();

    let target = crate::db::repository::parse_record_id("menu_item", &menu_id)?;
    let remaining: Vec<CartLine> = lines
        .into_iter()
        .filter(|l| l.menu_item != target)
        .collect();

    carts.save_items(&user.id, remaining).await?;
    Ok(ok_with_message((), "Item removed from cart"))
}
