//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/category/all — public listing
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(ok(categories))
}

/// POST /api/category/add (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(ok_with_message(category, "Category added"))
}

/// PUT /api/category/update/{id} (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(ok_with_message(category, "Category updated"))
}

/// DELETE /api/category/delete/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = CategoryRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    Ok(ok_with_message(deleted, "Category deleted"))
}
