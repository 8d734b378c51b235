//! In-process fan-out of session updates to subscribed trackers.
//!
//! Each active session gets a broadcast channel on first subscribe/publish.
//! Publishing `Ended` tears the channel down; late subscribers for a dead
//! session simply get a fresh, silent channel and rely on the snapshot
//! endpoint to see the terminal state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::types::SessionId;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Position {
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        updated_at: DateTime<Utc>,
    },
    Ended,
}

#[derive(Clone, Default)]
pub struct SessionEvents {
    channels: Arc<RwLock<HashMap<SessionId, broadcast::Sender<SessionEvent>>>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, session_id: SessionId) -> broadcast::Receiver<SessionEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub async fn publish(&self, session_id: SessionId, event: SessionEvent) {
        let ended = matches!(event, SessionEvent::Ended);
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&session_id) {
                // An Err here only means no tracker is currently listening.
                let _ = sender.send(event);
            }
        }
        if ended {
            self.channels.write().await.remove(&session_id);
        }
    }

    #[cfg(test)]
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_position() {
        let events = SessionEvents::new();
        let session_id = SessionId::new();
        let mut rx = events.subscribe(session_id).await;

        events
            .publish(
                session_id,
                SessionEvent::Position {
                    latitude: -33.9,
                    longitude: 18.4,
                    accuracy: Some(8.0),
                    updated_at: Utc::now(),
                },
            )
            .await;

        match rx.recv().await.expect("event") {
            SessionEvent::Position { latitude, .. } => assert_eq!(latitude, -33.9),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn ended_event_tears_down_the_channel() {
        let events = SessionEvents::new();
        let session_id = SessionId::new();
        let mut rx = events.subscribe(session_id).await;
        assert_eq!(events.channel_count().await, 1);

        events.publish(session_id, SessionEvent::Ended).await;
        assert!(matches!(rx.recv().await, Ok(SessionEvent::Ended)));
        assert_eq!(events.channel_count().await, 0);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let events = SessionEvents::new();
        events.publish(SessionId::new(), SessionEvent::Ended).await;
        assert_eq!(events.channel_count().await, 0);
    }

    #[tokio::test]
    async fn events_are_isolated_per_session() {
        let events = SessionEvents::new();
        let watched = SessionId::new();
        let other = SessionId::new();
        let mut rx = events.subscribe(watched).await;

        events.publish(other, SessionEvent::Ended).await;
        assert!(rx.try_recv().is_err());
    }
}
