use chrono::{DateTime, Utc};
use leptos::*;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::api::{ApiClient, ApiError, TrackerView};
use crate::config;
use crate::pages::track::repository;
use crate::state::sharing::is_past_deadline;

/// Fallback poll cadence when the event stream is unavailable.
pub const POLL_INTERVAL_MS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerState {
    Loading,
    Live(TrackerView),
    NotFound,
    Ended,
    Expired,
    Failed(String),
}

/// Wire format of the tracker event stream.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    Position {
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        updated_at: DateTime<Utc>,
    },
    Ended,
}

/// The two terminal 410 reasons share a status code; the message tells them
/// apart. 404 means the token never resolved.
pub fn classify_error(error: &ApiError) -> TrackerState {
    match error.code.as_deref() {
        Some("NOT_FOUND") => TrackerState::NotFound,
        Some("GONE") if error.error.contains("expired") => TrackerState::Expired,
        Some("GONE") => TrackerState::Ended,
        _ => TrackerState::Failed(error.to_string()),
    }
}

pub fn state_after_event(state: &TrackerState, event: TrackerEvent) -> TrackerState {
    match (state, event) {
        (_, TrackerEvent::Ended) => TrackerState::Ended,
        (
            TrackerState::Live(view),
            TrackerEvent::Position {
                latitude,
                longitude,
                accuracy,
                updated_at,
            },
        ) => {
            let mut updated = view.clone();
            updated.latitude = latitude;
            updated.longitude = longitude;
            updated.accuracy = accuracy;
            updated.updated_at = updated_at;
            TrackerState::Live(updated)
        }
        // A position for a tracker that is not live yet arrives out of order;
        // the next snapshot poll reconciles it.
        (other, TrackerEvent::Position { .. }) => other.clone(),
    }
}

#[derive(Clone)]
pub struct TrackerViewModel {
    pub state: RwSignal<TrackerState>,
    /// False once the page has fallen back to snapshot polling.
    pub live_stream: RwSignal<bool>,
}

pub fn use_tracker_view_model(token: String) -> TrackerViewModel {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let state = create_rw_signal(TrackerState::Loading);
    let live_stream = create_rw_signal(false);

    // Everything below talks to the browser; client-side only.
    create_effect(move |started: Option<()>| {
        if started.is_some() {
            return;
        }
        let api = api.clone();
        let token = token.clone();
        spawn_local(async move {
            match repository::fetch_snapshot(&api, &token).await {
                Ok(view) => state.set(TrackerState::Live(view)),
                Err(err) => {
                    state.set(classify_error(&err));
                    return;
                }
            }

            if !subscribe_events(&token, state, live_stream).await {
                live_stream.set(false);
            }

            // Poll loop doubles as the expiry check and as the data path
            // whenever the stream is down.
            let api = api.clone();
            spawn_local(async move {
                loop {
                    gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;
                    let Some(current) = state.try_get_untracked() else {
                        break;
                    };
                    let TrackerState::Live(view) = current else {
                        break;
                    };
                    if is_past_deadline(view.expires_at, Utc::now()) {
                        state.set(TrackerState::Expired);
                        break;
                    }
                    if live_stream.get_untracked() {
                        continue;
                    }
                    match repository::fetch_snapshot(&api, &token).await {
                        Ok(fresh) => state.set(TrackerState::Live(fresh)),
                        Err(err) => {
                            state.set(classify_error(&err));
                            break;
                        }
                    }
                }
            });
        });
    });

    TrackerViewModel { state, live_stream }
}

/// Hooks the tracker up to the server-sent event stream. Returns false when
/// `EventSource` is unavailable so the caller stays on polling.
async fn subscribe_events(
    token: &str,
    state: RwSignal<TrackerState>,
    live_stream: RwSignal<bool>,
) -> bool {
    let base_url = config::await_api_base_url().await;
    let url = format!("{}/track/{}/events", base_url, token);
    let Ok(source) = EventSource::new(&url) else {
        return false;
    };

    let on_message = Closure::<dyn Fn(MessageEvent)>::new(move |message: MessageEvent| {
        let Some(payload) = message.data().as_string() else {
            return;
        };
        match serde_json::from_str::<TrackerEvent>(&payload) {
            Ok(event) => {
                if let Some(current) = state.try_get_untracked() {
                    state.set(state_after_event(&current, event));
                }
            }
            Err(err) => log::warn!("unreadable tracker event: {}", err),
        }
    });
    source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let on_open = Closure::<dyn Fn(web_sys::Event)>::new(move |_| live_stream.set(true));
    source.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let on_error = Closure::<dyn Fn(web_sys::Event)>::new(move |_| live_stream.set(false));
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_view() -> TrackerView {
        TrackerView {
            sharer_name: "Ada".to_string(),
            latitude: 52.52,
            longitude: 13.405,
            accuracy: Some(12.0),
            updated_at: Utc::now(),
            expires_at: None,
        }
    }

    fn api_error(code: &str, message: &str) -> ApiError {
        ApiError {
            error: message.to_string(),
            code: Some(code.to_string()),
        }
    }

    #[test]
    fn unknown_tokens_and_terminal_sessions_classify_apart() {
        assert_eq!(
            classify_error(&api_error("NOT_FOUND", "Tracking link not found")),
            TrackerState::NotFound
        );
        assert_eq!(
            classify_error(&api_error("GONE", "Sharing has ended")),
            TrackerState::Ended
        );
        assert_eq!(
            classify_error(&api_error("GONE", "Sharing has expired")),
            TrackerState::Expired
        );
        assert!(matches!(
            classify_error(&api_error("INTERNAL_SERVER_ERROR", "Internal server error")),
            TrackerState::Failed(_)
        ));
    }

    #[test]
    fn position_events_move_the_live_view() {
        let state = TrackerState::Live(live_view());
        let moved = state_after_event(
            &state,
            TrackerEvent::Position {
                latitude: 48.137,
                longitude: 11.575,
                accuracy: None,
                updated_at: Utc::now(),
            },
        );
        let TrackerState::Live(view) = moved else {
            panic!("expected a live tracker");
        };
        assert_eq!(view.latitude, 48.137);
        assert_eq!(view.longitude, 11.575);
        assert_eq!(view.accuracy, None);
        assert_eq!(view.sharer_name, "Ada");
    }

    #[test]
    fn ended_event_wins_from_any_state() {
        assert_eq!(
            state_after_event(&TrackerState::Live(live_view()), TrackerEvent::Ended),
            TrackerState::Ended
        );
        assert_eq!(
            state_after_event(&TrackerState::Loading, TrackerEvent::Ended),
            TrackerState::Ended
        );
    }

    #[test]
    fn stray_position_leaves_terminal_states_alone() {
        let event = TrackerEvent::Position {
            latitude: 0.0,
            longitude: 0.0,
            accuracy: None,
            updated_at: Utc::now(),
        };
        assert_eq!(
            state_after_event(&TrackerState::Ended, event),
            TrackerState::Ended
        );
    }

    #[test]
    fn event_stream_payloads_parse() {
        let position: TrackerEvent = serde_json::from_str(
            r#"{"type":"position","latitude":52.5,"longitude":13.4,"accuracy":8.0,"updated_at":"2026-08-30T12:00:00Z"}"#,
        )
        .expect("position event");
        assert!(matches!(position, TrackerEvent::Position { .. }));

        let ended: TrackerEvent =
            serde_json::from_str(r#"{"type":"ended"}"#).expect("ended event");
        assert_eq!(ended, TrackerEvent::Ended);
    }
}
