use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{ContactId, UserId};
use crate::validation::rules::{validate_person_name, validate_phone};

/// Database representation of an emergency contact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_emergency: bool,
    pub is_verified: bool,
    pub last_lat: Option<f64>,
    pub last_lng: Option<f64>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_emergency: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_emergency: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            is_emergency: contact.is_emergency,
            is_verified: contact.is_verified,
            created_at: contact.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_contact_rejects_bad_phone() {
        let req = CreateContactRequest {
            name: "Gran".into(),
            phone: Some("not-a-phone!".into()),
            email: None,
            is_emergency: true,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_contact_accepts_email_only() {
        let req = CreateContactRequest {
            name: "Gran".into(),
            phone: None,
            email: Some("gran@example.com".into()),
            is_emergency: false,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_contact_allows_empty_patch() {
        assert!(UpdateContactRequest::default().validate().is_ok());
    }
}
