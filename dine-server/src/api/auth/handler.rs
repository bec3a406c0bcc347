//! Auth API Handlers
//!
//! 注册 / 登录 / guest 会话 / 管理员登录。凭证用 argon2 哈希；
//! 登录与注册失败使用统一措辞，避免账号枚举。

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{AdminLevel, CurrentUser, Role};
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserPublic};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionResponse {
    pub token: String,
    pub email: String,
    pub admin_level: AdminLevel,
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    payload.validate()?;

    let repo = UserRepository::new(state.get_db());
    let password_hash = hash_password(&payload.password)?;
    let user = repo
        .create(payload.name, payload.email, password_hash)
        .await?;

    Ok(ok_with_message(
        UserPublic::from(&user),
        "User registered successfully",
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    let role = if user.is_guest { Role::Guest } else { Role::User };
    let token = state
        .jwt_service()
        .generate_token(&user.id_string(), &user.name, role, AdminLevel::None)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(ok_with_message(
        SessionResponse {
            token,
            user: UserPublic::from(&user),
        },
        "User logged in successfully",
    ))
}

/// POST /api/auth/guest — start an anonymous table session
///
/// 每次调用创建一条全新的 guest 用户记录（合成唯一邮箱），绝不复用。
/// 12 小时令牌足够一餐。
pub async fn guest_login(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
    let name = format!("Guest-{suffix}");
    let email = format!("guest-{}-{suffix}@guest.local", shared::util::now_millis());
    // Guests never log in by password; hash a random credential to satisfy the model
    let password_hash = hash_password(&email)?;

    let repo = UserRepository::new(state.get_db());
    let guest = repo.create_guest(name, email, password_hash).await?;

    let token = state
        .jwt_service()
        .generate_token(&guest.id_string(), &guest.name, Role::Guest, AdminLevel::None)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(guest = %guest.id_string(), "Guest session started");

    Ok(ok_with_message(
        SessionResponse {
            token,
            user: UserPublic::from(&guest),
        },
        "Guest session started",
    ))
}

/// POST /api/auth/admin/login — env-configured staff accounts
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<AdminSessionResponse>>> {
    let config = &state.config;

    let admin_level = if matches(&payload, &config.super_admin_email, &config.super_admin_password)
    {
        AdminLevel::SuperAdmin
    } else if matches(&payload, &config.admin_email, &config.admin_password) {
        AdminLevel::Admin
    } else {
        return Err(AppError::invalid_credentials());
    };

    let token = state
        .jwt_service()
        .generate_token(&payload.email, &payload.email, Role::Admin, admin_level)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(admin = %payload.email, level = ?admin_level, "Admin logged in");

    Ok(ok_with_message(
        AdminSessionResponse {
            token,
            email: payload.email,
            admin_level,
        },
        "Admin logged in successfully",
    ))
}

fn matches(payload: &LoginRequest, email: &Option<String>, password: &Option<String>) -> bool {
    match (email, password) {
        (Some(e), Some(p)) => &payload.email == e && &payload.password == p,
        _ => false,
    }
}

/// POST /api/auth/logout — stateless tokens, nothing to revoke server-side
pub async fn logout() -> Json<AppResponse<()>> {
    ok_with_message((), "User logged out successfully")
}

/// GET /api/auth/profile — full profile of the calling identity
pub async fn profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    let repo = UserRepository::new(state.get_db());
    let found: User = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserPublic::from(&found)))
}

/// GET /api/auth/is-auth — token check used by the frontend on load
pub async fn is_auth(
    Extension(user): Extension<CurrentUser>,
) -> Json<AppResponse<serde_json::Value>> {
    ok(serde_json::json!({
        "id": user.id,
        "name": user.name,
        "role": user.role,
        "adminLevel": user.admin_level,
    }))
}
