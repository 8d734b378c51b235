use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::UserId;
use crate::validation::rules::{validate_person_name, validate_phone};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown to notified contacts; falls back to the mailbox local part.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        self.email
            .split('@')
            .next()
            .filter(|part| !part.is_empty())
            .unwrap_or("Someone")
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_person_name"))]
    pub full_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "thandi".into(),
            email: "thandi@example.com".into(),
            full_name: "Thandi M".into(),
            phone: Some("+27 82 555 0101".into()),
            password: "correct-horse-battery".into(),
        }
    }

    #[test]
    fn register_request_accepts_valid_input() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let mut req = request();
        req.password = "short".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let user = User {
            id: UserId::new(),
            username: "thandi".into(),
            email: "thandi@example.com".into(),
            full_name: "  ".into(),
            phone: None,
            password_hash: "x".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(user.display_name(), "thandi");
    }
}
