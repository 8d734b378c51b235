use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{ContactId, SessionId, UserId};

/// Why a sharing session was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    #[default]
    Manual,
    Sos,
    Voice,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Manual => "manual",
            TriggerSource::Sos => "sos",
            TriggerSource::Voice => "voice",
        }
    }
}

/// Database representation of one continuous location-sharing episode.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LiveLocationSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub is_active: bool,
    pub triggered_by: TriggerSource,
    /// NULL means "until explicitly stopped".
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LiveLocationSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartSharingRequest {
    pub contact_ids: Vec<ContactId>,
    #[serde(default)]
    pub triggered_by: TriggerSource,
    /// Minutes until automatic expiry; None shares until stopped.
    #[validate(range(min = 1, max = 10080))]
    pub duration_minutes: Option<i64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

impl StartSharingRequest {
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration_minutes.map(|m| now + Duration::minutes(m))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartSharingResponse {
    pub session_id: SessionId,
    pub contact_ids: Vec<ContactId>,
    pub share_tokens: Vec<String>,
    pub triggered_by: TriggerSource,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationUpdateRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

/// Sharer-side view of an active session, used by the resume check.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionResponse {
    pub session_id: SessionId,
    pub contact_ids: Vec<ContactId>,
    pub share_tokens: Vec<String>,
    pub triggered_by: TriggerSource,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<DateTime<Utc>>) -> LiveLocationSession {
        let now = Utc::now();
        LiveLocationSession {
            id: SessionId::new(),
            user_id: UserId::new(),
            latitude: -33.918,
            longitude: 18.423,
            accuracy: Some(12.0),
            is_active: true,
            triggered_by: TriggerSource::Manual,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn indefinite_session_never_expires() {
        let s = session(None);
        assert!(!s.is_expired(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn expiry_boundary_is_strictly_after() {
        let now = Utc::now();
        let s = session(Some(now + Duration::minutes(15)));
        assert!(!s.is_expired(now + Duration::minutes(15) - Duration::seconds(1)));
        assert!(s.is_expired(now + Duration::minutes(15) + Duration::seconds(1)));
    }

    #[test]
    fn expires_at_computed_from_duration() {
        let now = Utc::now();
        let req = StartSharingRequest {
            contact_ids: vec![ContactId::new()],
            triggered_by: TriggerSource::Sos,
            duration_minutes: Some(15),
            latitude: 0.0,
            longitude: 0.0,
            accuracy: None,
        };
        assert_eq!(req.expires_at(now), Some(now + Duration::minutes(15)));

        let indefinite = StartSharingRequest {
            duration_minutes: None,
            ..req
        };
        assert_eq!(indefinite.expires_at(now), None);
    }

    #[test]
    fn trigger_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TriggerSource::Sos).unwrap(),
            "\"sos\""
        );
        let back: TriggerSource = serde_json::from_str("\"voice\"").unwrap();
        assert_eq!(back, TriggerSource::Voice);
    }
}
