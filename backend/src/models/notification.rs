use serde::{Deserialize, Serialize};

use super::live_session::TriggerSource;

/// Wire format for the dispatch endpoint. Field names are camelCase because
/// the mobile/web clients send the payload in that shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosNotificationRequest {
    pub contacts: Vec<NotifyContact>,
    pub share_tokens: Vec<String>,
    pub sharer_name: String,
    pub triggered_by: TriggerSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Outcome of one send attempt on one channel.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Per-contact outcome across channels. A missing channel means the contact
/// had no address for it (or the channel is not configured).
#[derive(Debug, Clone, Serialize)]
pub struct ContactDispatchResult {
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<ChannelResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<ChannelResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentCounts {
    pub email: usize,
    pub whatsapp: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SosNotificationResponse {
    pub success: bool,
    pub sent: SentCounts,
    pub total: usize,
    pub results: Vec<ContactDispatchResult>,
}

impl SosNotificationResponse {
    /// Partial failure still reports overall success; counts tell the story.
    pub fn from_results(results: Vec<ContactDispatchResult>) -> Self {
        let email = results
            .iter()
            .filter(|r| r.email.as_ref().is_some_and(|c| c.success))
            .count();
        let whatsapp = results
            .iter()
            .filter(|r| r.whatsapp.as_ref().is_some_and(|c| c.success))
            .count();
        Self {
            success: true,
            sent: SentCounts { email, whatsapp },
            total: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_successful_channel_sends() {
        let results = vec![
            ContactDispatchResult {
                contact: "A".into(),
                email: Some(ChannelResult::ok()),
                whatsapp: Some(ChannelResult::failed("timeout")),
            },
            ContactDispatchResult {
                contact: "B".into(),
                email: Some(ChannelResult::failed("bounce")),
                whatsapp: None,
            },
            ContactDispatchResult {
                contact: "C".into(),
                email: None,
                whatsapp: Some(ChannelResult::ok()),
            },
        ];
        let response = SosNotificationResponse::from_results(results);
        assert!(response.success);
        assert_eq!(response.total, 3);
        assert_eq!(response.sent.email, 1);
        assert_eq!(response.sent.whatsapp, 1);
    }

    #[test]
    fn request_accepts_camel_case_payload() {
        let json = serde_json::json!({
            "contacts": [{"name": "Gran", "email": "gran@example.com", "phone": null}],
            "shareTokens": ["tok-1"],
            "sharerName": "Thandi",
            "triggeredBy": "sos"
        });
        let req: SosNotificationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.share_tokens, vec!["tok-1"]);
        assert_eq!(req.sharer_name, "Thandi");
    }
}
