use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error envelope the backend returns: `{ error, code, details? }`.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: Some("NETWORK".into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: Some("VALIDATION_ERROR".into()),
        }
    }

    pub fn is_gone(&self) -> bool {
        self.code.as_deref() == Some("GONE")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    #[default]
    Manual,
    Sos,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_emergency: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CreateContactRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_emergency: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateContactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_emergency: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartSharingRequest {
    pub contact_ids: Vec<String>,
    pub triggered_by: TriggerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartSharingResponse {
    pub session_id: String,
    pub contact_ids: Vec<String>,
    pub share_tokens: Vec<String>,
    pub triggered_by: TriggerSource,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSessionResponse {
    pub session_id: String,
    pub contact_ids: Vec<String>,
    pub share_tokens: Vec<String>,
    pub triggered_by: TriggerSource,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotifyContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The dispatch endpoint takes camelCase keys.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SosNotificationRequest {
    pub contacts: Vec<NotifyContact>,
    pub share_tokens: Vec<String>,
    pub sharer_name: String,
    pub triggered_by: TriggerSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactDispatchResult {
    pub contact: String,
    #[serde(default)]
    pub email: Option<ChannelResult>,
    #[serde(default)]
    pub whatsapp: Option<ChannelResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentCounts {
    pub email: usize,
    pub whatsapp: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SosNotificationResponse {
    pub success: bool,
    pub sent: SentCounts,
    pub total: usize,
    pub results: Vec<ContactDispatchResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackerView {
    pub sharer_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sos_request_serializes_to_camel_case() {
        let request = SosNotificationRequest {
            contacts: vec![NotifyContact {
                name: "Gran".into(),
                email: Some("gran@example.com".into()),
                phone: None,
            }],
            share_tokens: vec!["tok-1".into()],
            sharer_name: "Thandi".into(),
            triggered_by: TriggerSource::Sos,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("shareTokens").is_some());
        assert!(json.get("sharerName").is_some());
        assert_eq!(json["triggeredBy"], "sos");
    }

    #[test]
    fn update_request_omits_unchanged_fields() {
        let request = UpdateContactRequest {
            is_emergency: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn tracker_view_parses_snapshot_payload() {
        let view: TrackerView = serde_json::from_value(serde_json::json!({
            "sharer_name": "Thandi",
            "latitude": -33.92,
            "longitude": 18.42,
            "accuracy": 12.5,
            "updated_at": "2026-08-30T10:00:00Z",
            "expires_at": null
        }))
        .unwrap();
        assert_eq!(view.sharer_name, "Thandi");
        assert!(view.expires_at.is_none());
    }
}
