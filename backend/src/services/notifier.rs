use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::models::live_session::TriggerSource;
use crate::models::notification::{ChannelResult, ContactDispatchResult, NotifyContact};
use crate::utils::sanitize::sanitize_text;

/// One alert, addressed to one contact, with their personal tracking link.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub sharer_name: String,
    pub recipient_name: String,
    pub tracking_link: String,
    pub triggered_by: TriggerSource,
}

impl AlertMessage {
    pub fn subject(&self) -> String {
        match self.triggered_by {
            TriggerSource::Sos | TriggerSource::Voice => {
                format!("SOS alert from {}", self.sharer_name)
            }
            TriggerSource::Manual => format!("{} is sharing their live location", self.sharer_name),
        }
    }

    pub fn body(&self) -> String {
        let lead = match self.triggered_by {
            TriggerSource::Sos | TriggerSource::Voice => format!(
                "{} triggered an SOS and needs help.",
                self.sharer_name
            ),
            TriggerSource::Manual => format!(
                "{} is sharing their live location with you.",
                self.sharer_name
            ),
        };
        format!(
            "Hi {},\n\n{}\n\nFollow their location here:\n{}\n\nThe link stops working when the session ends.\n",
            self.recipient_name, lead, self.tracking_link
        )
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, contact: &NotifyContact, message: &AlertMessage) -> Result<()>;
}

/// SMTP delivery. `SMTP_SKIP_SEND=true` turns every send into a no-op, which
/// is how local development and the test environment run.
#[derive(Clone)]
pub struct EmailChannel {
    mailer: SmtpTransport,
    from_address: String,
}

impl EmailChannel {
    pub fn from_env() -> Result<Self> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .unwrap_or(587);
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address =
            env::var("SMTP_FROM_ADDRESS").unwrap_or_else(|_| "alerts@haven.local".to_string());

        let mailer = if smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&smtp_host)
                .port(smtp_port)
                .build()
        } else {
            let creds = Credentials::new(smtp_username, smtp_password);
            SmtpTransport::relay(&smtp_host)?
                .port(smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from_address,
        })
    }

    fn skip_send() -> bool {
        env::var("SMTP_SKIP_SEND").unwrap_or_default() == "true"
    }

    pub fn send_password_reset_email(&self, to_email: &str, reset_url: &str) -> Result<()> {
        if Self::skip_send() {
            return Ok(());
        }
        let body = format!(
            "We received a request to reset your password.\n\n\
             Set a new one here:\n\n{}\n\n\
             The link is valid for one hour. If you did not request this, ignore this email.\n",
            reset_url
        );

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to_email.parse()?)
            .subject("Password reset request")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(&email)?;
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, contact: &NotifyContact, message: &AlertMessage) -> Result<()> {
        let to_email = contact
            .email
            .as_deref()
            .ok_or_else(|| anyhow!("contact has no email address"))?;
        if Self::skip_send() {
            return Ok(());
        }

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(message.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body())?;

        self.mailer.send(&email)?;
        Ok(())
    }
}

/// WhatsApp delivery through the Meta Cloud API. Only constructed when the
/// access token and phone number id are present in the environment.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    access_token: String,
    phone_number_id: String,
    api_base: String,
}

impl WhatsAppChannel {
    pub fn from_env() -> Option<Self> {
        let access_token = env::var("WHATSAPP_ACCESS_TOKEN").ok()?;
        let phone_number_id = env::var("WHATSAPP_PHONE_NUMBER_ID").ok()?;
        Some(Self {
            client: reqwest::Client::new(),
            access_token,
            phone_number_id,
            api_base: "https://graph.facebook.com/v21.0".to_string(),
        })
    }
}

/// The Cloud API wants bare digits in international form.
pub fn normalize_whatsapp_number(phone: &str) -> Result<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix("00").unwrap_or(&digits).to_string();
    if digits.len() < 7 {
        return Err(anyhow!("phone number too short: {}", phone));
    }
    Ok(digits)
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    async fn send(&self, contact: &NotifyContact, message: &AlertMessage) -> Result<()> {
        let phone = contact
            .phone
            .as_deref()
            .ok_or_else(|| anyhow!("contact has no phone number"))?;
        let to = normalize_whatsapp_number(phone)?;

        let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": message.body() },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("whatsapp api returned {}: {}", status, detail));
        }
        Ok(())
    }
}

/// Pairs contact `index` with its tracking token. When fewer tokens than
/// contacts were issued the tokens wrap around, so every contact still gets a
/// working link.
pub fn paired_token(tokens: &[String], index: usize) -> &str {
    &tokens[index % tokens.len()]
}

pub fn tracking_link(base_url: &str, token: &str) -> String {
    format!("{}/track/{}", base_url.trim_end_matches('/'), token)
}

pub struct Notifier {
    email: Arc<dyn NotificationChannel>,
    whatsapp: Option<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn NotificationChannel>,
        whatsapp: Option<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self { email, whatsapp }
    }

    /// Fans one alert out to every contact. Addresses are assumed valid by
    /// this point. Attempts are independent: a failure on one channel or one
    /// contact never short-circuits the rest.
    pub async fn dispatch(
        &self,
        contacts: &[NotifyContact],
        tokens: &[String],
        sharer_name: &str,
        triggered_by: TriggerSource,
        base_url: &str,
    ) -> Vec<ContactDispatchResult> {
        let mut results = Vec::with_capacity(contacts.len());
        for (index, contact) in contacts.iter().enumerate() {
            // Names come straight from the client; nothing unsanitized may
            // reach a message template or the result echo.
            let recipient_name = sanitize_text(&contact.name);
            let token = paired_token(tokens, index);
            let message = AlertMessage {
                sharer_name: sharer_name.to_string(),
                recipient_name: recipient_name.clone(),
                tracking_link: tracking_link(base_url, token),
                triggered_by,
            };

            let email = match contact.email.as_deref() {
                None => None,
                Some(_) => Some(match self.email.send(contact, &message).await {
                    Ok(()) => ChannelResult::ok(),
                    Err(err) => {
                        tracing::warn!(contact = %recipient_name, error = %err, "email send failed");
                        ChannelResult::failed(err.to_string())
                    }
                }),
            };

            let whatsapp = match (&self.whatsapp, &contact.phone) {
                (Some(channel), Some(_)) => Some(match channel.send(contact, &message).await {
                    Ok(()) => ChannelResult::ok(),
                    Err(err) => {
                        tracing::warn!(contact = %recipient_name, error = %err, "whatsapp send failed");
                        ChannelResult::failed(err.to_string())
                    }
                }),
                _ => None,
            };

            results.push(ContactDispatchResult {
                contact: recipient_name,
                email,
                whatsapp,
            });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tok-{}", i)).collect()
    }

    #[test]
    fn tokens_wrap_when_fewer_than_contacts() {
        let tokens = tokens(2);
        assert_eq!(paired_token(&tokens, 0), "tok-0");
        assert_eq!(paired_token(&tokens, 1), "tok-1");
        assert_eq!(paired_token(&tokens, 2), "tok-0");
        assert_eq!(paired_token(&tokens, 5), "tok-1");
    }

    #[test]
    fn tracking_link_handles_trailing_slash() {
        assert_eq!(
            tracking_link("https://haven.example/", "abc"),
            "https://haven.example/track/abc"
        );
        assert_eq!(
            tracking_link("https://haven.example", "abc"),
            "https://haven.example/track/abc"
        );
    }

    #[test]
    fn sos_subject_differs_from_manual_share() {
        let base = AlertMessage {
            sharer_name: "Thandi".into(),
            recipient_name: "Gran".into(),
            tracking_link: "https://haven.example/track/t".into(),
            triggered_by: TriggerSource::Sos,
        };
        assert_eq!(base.subject(), "SOS alert from Thandi");

        let manual = AlertMessage {
            triggered_by: TriggerSource::Manual,
            ..base
        };
        assert_eq!(manual.subject(), "Thandi is sharing their live location");
    }

    #[test]
    fn body_contains_recipient_and_link() {
        let message = AlertMessage {
            sharer_name: "Thandi".into(),
            recipient_name: "Gran".into(),
            tracking_link: "https://haven.example/track/t".into(),
            triggered_by: TriggerSource::Sos,
        };
        let body = message.body();
        assert!(body.contains("Hi Gran"));
        assert!(body.contains("https://haven.example/track/t"));
    }

    #[test]
    fn normalizes_phone_numbers_to_digits() {
        assert_eq!(
            normalize_whatsapp_number("+27 82 123-4567").unwrap(),
            "27821234567"
        );
        assert_eq!(
            normalize_whatsapp_number("0027821234567").unwrap(),
            "27821234567"
        );
        assert!(normalize_whatsapp_number("12345").is_err());
    }
}
