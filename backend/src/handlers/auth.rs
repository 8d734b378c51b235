use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
        User, UserResponse,
    },
    repositories::auth as auth_repo,
    state::AppState,
    utils::jwt::{
        create_access_token, create_refresh_token, decode_refresh_token, hash_refresh_secret,
        verify_refresh_secret,
    },
    utils::password::{hash_password, verify_password},
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    if auth_repo::find_user_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username is already taken".to_string()));
    }
    if auth_repo::find_user_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = auth_repo::create_user(
        &state.pool,
        &payload.username,
        &payload.email,
        &payload.full_name,
        payload.phone.as_deref(),
        &password_hash,
    )
    .await?;

    tracing::info!(username = %user.username, "registered new user");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = auth_repo::find_user_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    issue_tokens(&state, user).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (id, secret) = decode_refresh_token(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let stored = auth_repo::find_refresh_token_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    if !verify_refresh_secret(&secret, &stored.token_hash)? {
        return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
    }

    let user = auth_repo::find_user_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    // Rotation: the presented token is spent either way.
    auth_repo::delete_refresh_token_by_id(&state.pool, &id).await?;

    issue_tokens(&state, user).await.map(Json)
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AppError> {
    auth_repo::delete_refresh_tokens_for_user(&state.pool, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate()?;

    // Always the same answer so the endpoint cannot be used to probe for
    // registered addresses.
    let message = serde_json::json!({
        "message": "If that email is registered, a reset link has been sent"
    });

    let Some(user) = auth_repo::find_user_by_email(&state.pool, &payload.email).await? else {
        return Ok(Json(message));
    };

    let secret = uuid::Uuid::new_v4().to_string();
    let token_hash = hash_refresh_secret(&secret)?;
    let expires_at = Utc::now() + Duration::hours(1);
    let id =
        auth_repo::store_password_reset_token(&state.pool, user.id, &token_hash, expires_at)
            .await?;

    let reset_url = format!(
        "{}/reset-password?token={}.{}",
        state.config.public_base_url, id, secret
    );
    if let Err(err) = state.mailer.send_password_reset_email(&user.email, &reset_url) {
        tracing::error!(error = %err, "failed to send password reset email");
    }

    Ok(Json(message))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate()?;

    let (id, secret) = decode_refresh_token(&payload.token)
        .map_err(|_| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    let stored = auth_repo::find_usable_password_reset_token(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    if !verify_refresh_secret(&secret, &stored.token_hash)? {
        return Err(AppError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.new_password)?;
    auth_repo::update_password(&state.pool, stored.user_id, &password_hash).await?;
    auth_repo::mark_password_reset_token_used(&state.pool, &id).await?;
    // Force every device to log in again with the new password.
    auth_repo::delete_refresh_tokens_for_user(&state.pool, stored.user_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Password has been reset"
    })))
}

async fn issue_tokens(state: &AppState, user: User) -> Result<LoginResponse, AppError> {
    let access_token = create_access_token(
        user.id.to_string(),
        user.username.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    let refresh = create_refresh_token(
        user.id.to_string(),
        state.config.refresh_token_expiration_days,
    )?;
    auth_repo::store_refresh_token(
        &state.pool,
        &refresh.id,
        &refresh.user_id,
        &refresh.token_hash,
        refresh.expires_at,
    )
    .await?;

    Ok(LoginResponse {
        access_token,
        refresh_token: refresh.encoded(),
        user: user.into(),
    })
}
