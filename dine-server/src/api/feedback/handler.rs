//! Feedback API Handlers

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Feedback, FeedbackCreate};
use crate::db::repository::{FeedbackRepository, parse_record_id};
use crate::utils::validation::MAX_NOTE_LEN;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// POST /api/feedback/create
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<FeedbackCreate>,
) -> AppResult<Json<AppResponse<Feedback>>> {
    payload.validate()?;
    if payload.comment.len() > MAX_NOTE_LEN {
        return Err(AppError::validation("comment is too long"));
    }

    let repo = FeedbackRepository::new(state.get_db());
    let feedback = repo
        .create(Feedback {
            id: None,
            user: parse_record_id("user", &user.id)?,
            rating: payload.rating,
            comment: payload.comment,
            created_at: shared::util::now_millis(),
        })
        .await?;

    Ok(ok_with_message(feedback, "Feedback submitted"))
}

/// GET /api/feedback/all (admin)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Feedback>>>> {
    let repo = FeedbackRepository::new(state.get_db());
    let feedback = repo.find_all().await?;
    Ok(ok(feedback))
}
