//! Branding API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{Branding, BrandingUpdate};
use crate::db::repository::BrandingRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/config/branding — public
pub async fn get_branding(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Branding>>> {
    let repo = BrandingRepository::new(state.get_db());
    let branding = repo.get().await?;
    Ok(ok(branding))
}

/// PUT /api/config/branding/update (admin)
pub async fn update_branding(
    State(state): State<ServerState>,
    Json(payload): Json<BrandingUpdate>,
) -> AppResult<Json<AppResponse<Branding>>> {
    validate_optional_text(&payload.restaurant_name, "restaurantName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.logo, "logo", MAX_URL_LEN)?;
    validate_optional_text(&payload.tagline, "tagline", MAX_NOTE_LEN)?;

    let repo = BrandingRepository::new(state.get_db());
    let branding = repo.update(payload).await?;
    Ok(ok_with_message(branding, "Branding updated"))
}
