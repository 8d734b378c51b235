use sqlx::PgPool;

use crate::models::location_share::LocationShare;
use crate::types::{SessionId, UserId};

const SHARE_COLUMNS: &str =
    "id, live_location_id, sharer_user_id, recipient_contact_id, share_token, created_at";

pub async fn list_shares_for_session(
    pool: &PgPool,
    session_id: SessionId,
) -> Result<Vec<LocationShare>, sqlx::Error> {
    let query = format!(
        "SELECT {SHARE_COLUMNS} FROM location_shares \
         WHERE live_location_id = $1 ORDER BY created_at"
    );
    sqlx::query_as::<_, LocationShare>(&query)
        .bind(session_id)
        .fetch_all(pool)
        .await
}

pub async fn find_share_by_token(
    pool: &PgPool,
    share_token: &str,
) -> Result<Option<LocationShare>, sqlx::Error> {
    let query = format!("SELECT {SHARE_COLUMNS} FROM location_shares WHERE share_token = $1");
    sqlx::query_as::<_, LocationShare>(&query)
        .bind(share_token)
        .fetch_optional(pool)
        .await
}

/// Returns the subset of `tokens` that belong to shares owned by `user_id`.
///
/// This is the dispatcher's authorization filter: a token that resolves to
/// someone else's share simply does not come back.
pub async fn filter_tokens_owned_by(
    pool: &PgPool,
    user_id: UserId,
    tokens: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT share_token FROM location_shares \
         WHERE sharer_user_id = $1 AND share_token = ANY($2)",
    )
    .bind(user_id)
    .bind(tokens)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(token,)| token).collect())
}
