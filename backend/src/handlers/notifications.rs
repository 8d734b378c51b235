use axum::{extract::State, Extension, Json};

use crate::{
    error::AppError,
    models::notification::{NotifyContact, SosNotificationRequest, SosNotificationResponse},
    models::user::User,
    repositories::location_share as share_repo,
    state::AppState,
    utils::sanitize::sanitize_text,
    validation::rules,
};

/// Fans an SOS (or manual share) alert out to the listed contacts. The whole
/// batch is validated up front; one malformed address rejects the request
/// before any delivery is attempted. Share tokens not issued to the caller
/// are discarded, and the request is forbidden only when none remain.
pub async fn send_sos(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<SosNotificationRequest>,
) -> Result<Json<SosNotificationResponse>, AppError> {
    if payload.contacts.is_empty() {
        return Err(AppError::BadRequest("No contacts selected".to_string()));
    }
    if payload.share_tokens.is_empty() {
        return Err(AppError::BadRequest("No share tokens provided".to_string()));
    }

    let owned =
        share_repo::filter_tokens_owned_by(&state.pool, user.id, &payload.share_tokens).await?;
    if owned.is_empty() {
        tracing::warn!(user_id = %user.id, "sos dispatch rejected: no caller-owned share token");
        return Err(AppError::Forbidden(
            "Share tokens do not belong to the authenticated user".to_string(),
        ));
    }
    if owned.len() != payload.share_tokens.len() {
        tracing::warn!(
            user_id = %user.id,
            discarded = payload.share_tokens.len() - owned.len(),
            "discarding share tokens not issued to the caller"
        );
    }

    let errors = contact_field_errors(&payload.contacts);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let sharer_name = {
        let name = sanitize_text(&payload.sharer_name);
        if name.is_empty() {
            user.display_name()
        } else {
            name
        }
    };

    let results = state
        .notifier
        .dispatch(
            &payload.contacts,
            &owned,
            &sharer_name,
            payload.triggered_by,
            &state.config.public_base_url,
        )
        .await;

    let response = SosNotificationResponse::from_results(results);
    tracing::info!(
        total = response.total,
        email_sent = response.sent.email,
        whatsapp_sent = response.sent.whatsapp,
        "dispatched alert notifications"
    );
    Ok(Json(response))
}

/// Syntax check across the whole contact list. Every problem is collected so
/// the caller sees the full picture in one response.
pub fn contact_field_errors(contacts: &[NotifyContact]) -> Vec<String> {
    let mut errors = Vec::new();
    for contact in contacts {
        let name = sanitize_text(&contact.name);
        if let Some(email) = contact.email.as_deref() {
            if !rules::is_valid_email(email) {
                errors.push(format!("{}: invalid email address", name));
            }
        }
        if let Some(phone) = contact.phone.as_deref() {
            if rules::validate_phone(phone).is_err() {
                errors.push(format!("{}: invalid phone number", name));
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: Option<&str>, phone: Option<&str>) -> NotifyContact {
        NotifyContact {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn clean_batch_produces_no_errors() {
        let contacts = vec![
            contact("Gran", Some("gran@example.com"), Some("+27821234567")),
            contact("Sipho", None, Some("021 555 0100")),
        ];
        assert!(contact_field_errors(&contacts).is_empty());
    }

    #[test]
    fn one_malformed_field_surfaces_in_the_error_list() {
        let contacts = vec![
            contact("Gran", Some("gran@example.com"), None),
            contact("Sipho", Some("not-an-address"), None),
        ];
        let errors = contact_field_errors(&contacts);
        assert_eq!(errors, vec!["Sipho: invalid email address".to_string()]);
    }

    #[test]
    fn phone_syntax_is_checked_alongside_email() {
        let contacts = vec![contact("Gran", Some("bad"), Some("call me"))];
        let errors = contact_field_errors(&contacts);
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("invalid phone number"));
    }

    #[test]
    fn error_messages_carry_sanitized_names_only() {
        let contacts = vec![contact("<b>Gran</b>", Some("bad"), None)];
        let errors = contact_field_errors(&contacts);
        assert_eq!(errors, vec!["bGran/b: invalid email address".to_string()]);
    }
}
