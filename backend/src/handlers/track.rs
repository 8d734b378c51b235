use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::{
    error::AppError,
    models::live_session::LiveLocationSession,
    repositories::{auth as auth_repo, live_session as session_repo, location_share as share_repo},
    services::events::SessionEvent,
    state::AppState,
};

/// What a presented token resolves to. Unknown tokens are handled separately
/// as 404 so they stay indistinguishable from tokens that never existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerOutcome {
    Live,
    Ended,
    Expired,
}

pub fn resolve_outcome(session: &LiveLocationSession, now: DateTime<Utc>) -> TrackerOutcome {
    if !session.is_active {
        return TrackerOutcome::Ended;
    }
    if session.is_expired(now) {
        return TrackerOutcome::Expired;
    }
    TrackerOutcome::Live
}

#[derive(Debug, Serialize)]
pub struct TrackerView {
    pub sharer_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Public snapshot endpoint. The token is the only credential.
pub async fn tracker_snapshot(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<TrackerView>, AppError> {
    let session = resolve_live_session(&state, &token).await?;

    let sharer_name = auth_repo::find_user_by_id(&state.pool, session.user_id)
        .await?
        .map(|user| user.display_name())
        .unwrap_or_else(|| "Someone".to_string());

    Ok(Json(TrackerView {
        sharer_name,
        latitude: session.latitude,
        longitude: session.longitude,
        accuracy: session.accuracy,
        updated_at: session.updated_at,
        expires_at: session.expires_at,
    }))
}

/// Server-sent events for a live session: position updates and the terminal
/// `ended` event. Trackers fall back to polling the snapshot if the stream
/// drops.
pub async fn tracker_events(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let session = resolve_live_session(&state, &token).await?;

    let rx = state.events.subscribe(session.id).await;
    let stream = BroadcastStream::new(rx)
        .filter_map(|message| message.ok())
        .map(|event| Event::default().json_data(&event).map_err(axum::Error::new));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn resolve_live_session(
    state: &AppState,
    token: &str,
) -> Result<LiveLocationSession, AppError> {
    let share = share_repo::find_share_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Tracking link not found".to_string()))?;

    let session = session_repo::find_session_by_id(&state.pool, share.live_location_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tracking link not found".to_string()))?;

    match resolve_outcome(&session, Utc::now()) {
        TrackerOutcome::Live => Ok(session),
        TrackerOutcome::Ended => Err(AppError::Gone("Sharing has ended".to_string())),
        TrackerOutcome::Expired => {
            // First observer of the passed deadline retires the session.
            session_repo::deactivate_session(&state.pool, session.id).await?;
            state.events.publish(session.id, SessionEvent::Ended).await;
            Err(AppError::Gone("Sharing has expired".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::live_session::TriggerSource;
    use crate::types::{SessionId, UserId};
    use chrono::Duration;

    fn session(is_active: bool, expires_in: Option<i64>) -> LiveLocationSession {
        let now = Utc::now();
        LiveLocationSession {
            id: SessionId::new(),
            user_id: UserId::new(),
            latitude: -33.92,
            longitude: 18.42,
            accuracy: Some(10.0),
            is_active,
            triggered_by: TriggerSource::Manual,
            expires_at: expires_in.map(|minutes| now + Duration::minutes(minutes)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_unexpired_session_is_live() {
        assert_eq!(
            resolve_outcome(&session(true, Some(30)), Utc::now()),
            TrackerOutcome::Live
        );
        assert_eq!(
            resolve_outcome(&session(true, None), Utc::now()),
            TrackerOutcome::Live
        );
    }

    #[test]
    fn stopped_session_is_ended_even_before_its_deadline() {
        assert_eq!(
            resolve_outcome(&session(false, Some(30)), Utc::now()),
            TrackerOutcome::Ended
        );
    }

    #[test]
    fn past_deadline_session_is_expired_without_any_flag_change() {
        assert_eq!(
            resolve_outcome(&session(true, Some(-1)), Utc::now()),
            TrackerOutcome::Expired
        );
    }

    #[test]
    fn ended_wins_over_expired() {
        assert_eq!(
            resolve_outcome(&session(false, Some(-1)), Utc::now()),
            TrackerOutcome::Ended
        );
    }
}
