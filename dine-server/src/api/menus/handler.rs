//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemView};
use crate::db::repository::MenuRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_amount,
    validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/menu/all — public listing with category names resolved
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<MenuItemView>>>> {
    let repo = MenuRepository::new(state.get_db());
    let items = repo.find_all_resolved().await?;
    Ok(ok(items))
}

/// POST /api/menu/add (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_required_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_amount(payload.price, "price")?;

    let repo = MenuRepository::new(state.get_db());
    let item = repo.create(payload).await?;
    Ok(ok_with_message(item, "Menu item added"))
}

/// PUT /api/menu/update/{id} (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
    }

    let repo = MenuRepository::new(state.get_db());
    let item = repo.update(&id, payload).await?;
    Ok(ok_with_message(item, "Menu item updated"))
}

/// DELETE /api/menu/delete/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = MenuRepository::new(state.get_db());
    if !repo.delete(&id).await? {
        return Err(AppError::not_found(format!("Menu item {id} not found")));
    }
    Ok(ok_with_message(true, "Menu item deleted"))
}
