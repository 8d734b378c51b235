use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::contact::{Contact, ContactResponse, CreateContactRequest, UpdateContactRequest},
    models::user::User,
    repositories::contact as contact_repo,
    state::AppState,
    types::ContactId,
    utils::sanitize::sanitize_text,
};

pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let contacts = contact_repo::list_contacts_for_user(&state.pool, user.id).await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

pub async fn create_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(mut payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.name = sanitize_text(&payload.name);
    payload.validate()?;

    let contact = contact_repo::create_contact(&state.pool, user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(contact_id): Path<ContactId>,
    Json(mut payload): Json<UpdateContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    payload.name = payload.name.as_deref().map(sanitize_text);
    payload.validate()?;

    owned_contact(&state, user.id, contact_id).await?;
    let contact = contact_repo::update_contact(&state.pool, contact_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;
    Ok(Json(contact.into()))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(contact_id): Path<ContactId>,
) -> Result<StatusCode, AppError> {
    owned_contact(&state, user.id, contact_id).await?;
    if !contact_repo::delete_contact(&state.pool, contact_id).await? {
        return Err(AppError::NotFound("Contact not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(contact_id): Path<ContactId>,
) -> Result<Json<ContactResponse>, AppError> {
    owned_contact(&state, user.id, contact_id).await?;
    let contact = contact_repo::mark_contact_verified(&state.pool, contact_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;
    Ok(Json(contact.into()))
}

/// Another user's contact and a missing contact are indistinguishable.
async fn owned_contact(
    state: &AppState,
    user_id: crate::types::UserId,
    contact_id: ContactId,
) -> Result<Contact, AppError> {
    contact_repo::find_contact_by_id(&state.pool, contact_id)
        .await?
        .filter(|contact| contact.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))
}
