use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::live_session::{LiveLocationSession, TriggerSource};
use crate::models::location_share::LocationShare;
use crate::types::{ContactId, SessionId, ShareId, UserId};
use crate::utils::tokens::generate_share_token;

const SESSION_COLUMNS: &str = "id, user_id, latitude, longitude, accuracy, is_active, \
     triggered_by, expires_at, created_at, updated_at";

const SHARE_COLUMNS: &str =
    "id, live_location_id, sharer_user_id, recipient_contact_id, share_token, created_at";

/// Creates a session and its share rows in one transaction.
///
/// A failed share insert rolls the session back, so no orphan session with
/// zero shares ever becomes visible. Previous active sessions of the same
/// user are deactivated in the same transaction (explicit take-over).
pub async fn create_with_shares(
    pool: &PgPool,
    user_id: UserId,
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
    triggered_by: TriggerSource,
    expires_at: Option<DateTime<Utc>>,
    contact_ids: &[ContactId],
) -> Result<(LiveLocationSession, Vec<LocationShare>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE live_locations SET is_active = FALSE, updated_at = NOW() \
         WHERE user_id = $1 AND is_active = TRUE")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let session_id = SessionId::new();
    let insert_session = format!(
        "INSERT INTO live_locations \
            (id, user_id, latitude, longitude, accuracy, triggered_by, expires_at, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE) \
         RETURNING {SESSION_COLUMNS}"
    );
    let session = sqlx::query_as::<_, LiveLocationSession>(&insert_session)
        .bind(session_id)
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .bind(accuracy)
        .bind(triggered_by)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

    let insert_share = format!(
        "INSERT INTO location_shares \
            (id, live_location_id, sharer_user_id, recipient_contact_id, share_token) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {SHARE_COLUMNS}"
    );
    let mut shares = Vec::with_capacity(contact_ids.len());
    for contact_id in contact_ids {
        let share = sqlx::query_as::<_, LocationShare>(&insert_share)
            .bind(ShareId::new())
            .bind(session.id)
            .bind(user_id)
            .bind(*contact_id)
            .bind(generate_share_token())
            .fetch_one(&mut *tx)
            .await?;
        shares.push(share);
    }

    tx.commit().await?;
    Ok((session, shares))
}

pub async fn find_session_by_id(
    pool: &PgPool,
    session_id: SessionId,
) -> Result<Option<LiveLocationSession>, sqlx::Error> {
    let query = format!("SELECT {SESSION_COLUMNS} FROM live_locations WHERE id = $1");
    sqlx::query_as::<_, LiveLocationSession>(&query)
        .bind(session_id)
        .fetch_optional(pool)
        .await
}

/// Most recent active session for the user, if any (resume check).
pub async fn find_active_session_for_user(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<LiveLocationSession>, sqlx::Error> {
    let query = format!(
        "SELECT {SESSION_COLUMNS} FROM live_locations \
         WHERE user_id = $1 AND is_active = TRUE \
         ORDER BY created_at DESC LIMIT 1"
    );
    sqlx::query_as::<_, LiveLocationSession>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Writes a position fix. Only touches sessions that are still active, so a
/// late flush cannot revive a stopped session. Returns the updated row, or
/// None when the session was already inactive.
pub async fn update_position(
    pool: &PgPool,
    session_id: SessionId,
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
) -> Result<Option<LiveLocationSession>, sqlx::Error> {
    let query = format!(
        "UPDATE live_locations \
         SET latitude = $1, longitude = $2, accuracy = $3, updated_at = NOW() \
         WHERE id = $4 AND is_active = TRUE \
         RETURNING {SESSION_COLUMNS}"
    );
    sqlx::query_as::<_, LiveLocationSession>(&query)
        .bind(latitude)
        .bind(longitude)
        .bind(accuracy)
        .bind(session_id)
        .fetch_optional(pool)
        .await
}

pub async fn deactivate_session(
    pool: &PgPool,
    session_id: SessionId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE live_locations SET is_active = FALSE, updated_at = NOW() \
         WHERE id = $1 AND is_active = TRUE",
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
