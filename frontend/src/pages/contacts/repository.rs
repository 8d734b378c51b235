use crate::api::{ApiClient, ApiError, ContactResponse, CreateContactRequest, UpdateContactRequest};

pub async fn fetch_contacts(api: &ApiClient) -> Result<Vec<ContactResponse>, ApiError> {
    api.list_contacts().await
}

pub async fn create_contact(
    api: &ApiClient,
    request: CreateContactRequest,
) -> Result<ContactResponse, ApiError> {
    api.create_contact(request).await
}

pub async fn update_contact(
    api: &ApiClient,
    id: &str,
    request: UpdateContactRequest,
) -> Result<ContactResponse, ApiError> {
    api.update_contact(id, request).await
}

pub async fn delete_contact(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete_contact(id).await
}

pub async fn verify_contact(api: &ApiClient, id: &str) -> Result<ContactResponse, ApiError> {
    api.verify_contact(id).await
}
