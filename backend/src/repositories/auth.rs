use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::types::UserId;

const USER_COLUMNS: &str =
    "id, username, email, full_name, phone, password_hash, created_at, updated_at";

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = UserId::new();
    let query = format!(
        "INSERT INTO users (id, username, email, full_name, phone, password_hash) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(pool)
        .await
}

pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &PgPool, user_id: UserId) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_password(
    pool: &PgPool,
    user_id: UserId,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await
        .map(|_| ())
}

#[derive(Debug, sqlx::FromRow)]
pub struct StoredRefreshToken {
    pub id: String,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn store_refresh_token(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn find_refresh_token_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<StoredRefreshToken>, sqlx::Error> {
    sqlx::query_as::<_, StoredRefreshToken>(
        "SELECT id, user_id, token_hash, expires_at FROM refresh_tokens \
         WHERE id = $1 AND expires_at > NOW()",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_refresh_token_by_id(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn delete_refresh_tokens_for_user(
    pool: &PgPool,
    user_id: UserId,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn store_password_reset_token(
    pool: &PgPool,
    user_id: UserId,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(id)
}

#[derive(Debug, sqlx::FromRow)]
pub struct StoredPasswordResetToken {
    pub id: String,
    pub user_id: UserId,
    pub token_hash: String,
}

pub async fn find_usable_password_reset_token(
    pool: &PgPool,
    id: &str,
) -> Result<Option<StoredPasswordResetToken>, sqlx::Error> {
    sqlx::query_as::<_, StoredPasswordResetToken>(
        "SELECT id, user_id, token_hash FROM password_reset_tokens \
         WHERE id = $1 AND used_at IS NULL AND expires_at > NOW()",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn mark_password_reset_token_used(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_reset_tokens SET used_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
}
