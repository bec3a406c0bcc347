//! Notification API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{TokenRegister, TokenUnregister};
use crate::orders::OrderService;
use crate::services::DispatchOutcome;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppResponse, AppResult, ok_with_message};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/notification/register-token — upsert the caller's device token
pub async fn register_token(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<TokenRegister>,
) -> AppResult<Json<AppResponse<TokenResponse>>> {
    validate_required_text(&payload.token, "token", 4096)?;
    validate_required_text(&payload.platform, "platform", MAX_SHORT_TEXT_LEN)?;

    let registered = state
        .notifications
        .register_token(&user.id, &payload.token, &payload.platform)
        .await?;

    Ok(ok_with_message(
        TokenResponse {
            token: registered.token,
        },
        "Notification token registered",
    ))
}

/// POST /api/notification/unregister-token — only the owner may remove it
pub async fn unregister_token(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<TokenUnregister>,
) -> AppResult<Json<AppResponse<bool>>> {
    validate_required_text(&payload.token, "token", 4096)?;

    let removed = state
        .notifications
        .unregister_token(&user.id, &payload.token)
        .await?;

    Ok(ok_with_message(removed, "Notification token removed"))
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    #[serde(default = "default_title")]
    pub title: String,
    pub message: String,
}

fn default_title() -> String {
    "Restaurant Update".to_string()
}

/// POST /api/notification/send/order/{orderId} (admin)
///
/// 给订单属主的所有注册设备推送自定义通知。投递结果原样返回给
/// 操作者；降级（无令牌、provider 未配置）不是错误。
pub async fn send_to_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<SendNotificationRequest>,
) -> AppResult<Json<AppResponse<DispatchOutcome>>> {
    validate_required_text(&payload.message, "message", MAX_NOTE_LEN)?;
    validate_required_text(&payload.title, "title", MAX_SHORT_TEXT_LEN)?;

    let service = OrderService::from_state(&state);
    let outcome = service
        .notify_order_owner(&order_id, &payload.title, &payload.message)
        .await?;

    Ok(ok_with_message(outcome, "Notification sent"))
}
