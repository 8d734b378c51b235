use sqlx::PgPool;

use crate::models::contact::{Contact, CreateContactRequest, UpdateContactRequest};
use crate::types::{ContactId, UserId};

const CONTACT_COLUMNS: &str = "id, user_id, name, phone, email, is_emergency, is_verified, \
     last_lat, last_lng, last_seen_at, created_at, updated_at";

pub async fn list_contacts_for_user(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Vec<Contact>, sqlx::Error> {
    let query =
        format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 ORDER BY created_at");
    sqlx::query_as::<_, Contact>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_contact_by_id(
    pool: &PgPool,
    contact_id: ContactId,
) -> Result<Option<Contact>, sqlx::Error> {
    let query = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
    sqlx::query_as::<_, Contact>(&query)
        .bind(contact_id)
        .fetch_optional(pool)
        .await
}

/// Fetches the given contacts, keeping only those owned by `user_id`.
pub async fn list_contacts_by_ids(
    pool: &PgPool,
    user_id: UserId,
    contact_ids: &[ContactId],
) -> Result<Vec<Contact>, sqlx::Error> {
    let ids: Vec<String> = contact_ids.iter().map(|id| id.to_string()).collect();
    let query = format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts \
         WHERE user_id = $1 AND id = ANY($2) ORDER BY created_at"
    );
    sqlx::query_as::<_, Contact>(&query)
        .bind(user_id)
        .bind(&ids)
        .fetch_all(pool)
        .await
}

pub async fn create_contact(
    pool: &PgPool,
    user_id: UserId,
    request: &CreateContactRequest,
) -> Result<Contact, sqlx::Error> {
    let id = ContactId::new();
    let query = format!(
        "INSERT INTO contacts (id, user_id, name, phone, email, is_emergency) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {CONTACT_COLUMNS}"
    );
    sqlx::query_as::<_, Contact>(&query)
        .bind(id)
        .bind(user_id)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(request.is_emergency)
        .fetch_one(pool)
        .await
}

pub async fn update_contact(
    pool: &PgPool,
    contact_id: ContactId,
    request: &UpdateContactRequest,
) -> Result<Option<Contact>, sqlx::Error> {
    let query = format!(
        "UPDATE contacts SET \
            name = COALESCE($1, name), \
            phone = COALESCE($2, phone), \
            email = COALESCE($3, email), \
            is_emergency = COALESCE($4, is_emergency), \
            updated_at = NOW() \
         WHERE id = $5 \
         RETURNING {CONTACT_COLUMNS}"
    );
    sqlx::query_as::<_, Contact>(&query)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(request.is_emergency)
        .bind(contact_id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_contact(pool: &PgPool, contact_id: ContactId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(contact_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Verification transitions false -> true only; there is no unverify.
pub async fn mark_contact_verified(
    pool: &PgPool,
    contact_id: ContactId,
) -> Result<Option<Contact>, sqlx::Error> {
    let query = format!(
        "UPDATE contacts SET is_verified = TRUE, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {CONTACT_COLUMNS}"
    );
    sqlx::query_as::<_, Contact>(&query)
        .bind(contact_id)
        .fetch_optional(pool)
        .await
}
