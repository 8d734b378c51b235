use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::live_session::{
        ActiveSessionResponse, LiveLocationSession, LocationUpdateRequest, StartSharingRequest,
        StartSharingResponse,
    },
    models::location_share::LocationShare,
    models::user::User,
    repositories::{contact as contact_repo, live_session as session_repo, location_share as share_repo},
    services::events::SessionEvent,
    state::AppState,
};

pub async fn start_sharing(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<StartSharingRequest>,
) -> Result<(StatusCode, Json<StartSharingResponse>), AppError> {
    payload.validate()?;
    if payload.contact_ids.is_empty() {
        return Err(AppError::BadRequest("No contacts selected".to_string()));
    }

    // Only the caller's own contacts can become recipients.
    let owned = contact_repo::list_contacts_by_ids(&state.pool, user.id, &payload.contact_ids)
        .await?;
    if owned.len() != payload.contact_ids.len() {
        return Err(AppError::BadRequest(
            "One or more contacts were not found".to_string(),
        ));
    }

    let expires_at = payload.expires_at(Utc::now());
    let (session, shares) = session_repo::create_with_shares(
        &state.pool,
        user.id,
        payload.latitude,
        payload.longitude,
        payload.accuracy,
        payload.triggered_by,
        expires_at,
        &payload.contact_ids,
    )
    .await?;

    tracing::info!(
        session_id = %session.id,
        recipients = shares.len(),
        triggered_by = session.triggered_by.as_str(),
        "started live location session"
    );

    Ok((
        StatusCode::CREATED,
        Json(StartSharingResponse {
            session_id: session.id,
            contact_ids: shares.iter().map(|s| s.recipient_contact_id).collect(),
            share_tokens: shares.into_iter().map(|s| s.share_token).collect(),
            triggered_by: session.triggered_by,
            expires_at: session.expires_at,
        }),
    ))
}

pub async fn active_session(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Option<ActiveSessionResponse>>, AppError> {
    let Some(session) = session_repo::find_active_session_for_user(&state.pool, user.id).await?
    else {
        return Ok(Json(None));
    };
    // Expiry is a property of the clock, not of a stored flag.
    if session.is_expired(Utc::now()) {
        session_repo::deactivate_session(&state.pool, session.id).await?;
        state.events.publish(session.id, SessionEvent::Ended).await;
        return Ok(Json(None));
    }

    let shares = share_repo::list_shares_for_session(&state.pool, session.id).await?;
    Ok(Json(Some(active_response(session, shares))))
}

pub async fn stop_sharing(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AppError> {
    let session = session_repo::find_active_session_for_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active sharing session".to_string()))?;

    session_repo::deactivate_session(&state.pool, session.id).await?;
    state.events.publish(session.id, SessionEvent::Ended).await;
    tracing::info!(session_id = %session.id, "stopped live location session");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_location(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<LocationUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate()?;

    let session = session_repo::find_active_session_for_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active sharing session".to_string()))?;

    if session.is_expired(Utc::now()) {
        // A flush that arrives after the deadline ends the session instead of
        // extending it.
        session_repo::deactivate_session(&state.pool, session.id).await?;
        state.events.publish(session.id, SessionEvent::Ended).await;
        return Err(AppError::Gone("Sharing has expired".to_string()));
    }

    let updated = session_repo::update_position(
        &state.pool,
        session.id,
        payload.latitude,
        payload.longitude,
        payload.accuracy,
    )
    .await?
    .ok_or_else(|| AppError::Gone("Sharing has ended".to_string()))?;

    state
        .events
        .publish(
            updated.id,
            SessionEvent::Position {
                latitude: updated.latitude,
                longitude: updated.longitude,
                accuracy: updated.accuracy,
                updated_at: updated.updated_at,
            },
        )
        .await;

    Ok(Json(serde_json::json!({
        "updated": true,
        "updated_at": updated.updated_at,
    })))
}

fn active_response(
    session: LiveLocationSession,
    shares: Vec<LocationShare>,
) -> ActiveSessionResponse {
    ActiveSessionResponse {
        session_id: session.id,
        contact_ids: shares.iter().map(|s| s.recipient_contact_id).collect(),
        share_tokens: shares.into_iter().map(|s| s.share_token).collect(),
        triggered_by: session.triggered_by,
        expires_at: session.expires_at,
        updated_at: session.updated_at,
    }
}
