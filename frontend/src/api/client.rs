#![allow(dead_code)]
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::{api::types::*, config, utils::storage as storage_utils};

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const CURRENT_USER_KEY: &str = "current_user";

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    fn bearer_token(&self) -> Result<String, ApiError> {
        let storage = storage_utils::local_storage().map_err(ApiError::network)?;
        storage
            .get_item(ACCESS_TOKEN_KEY)
            .map_err(|_| ApiError::network("Failed to read token"))?
            .ok_or_else(|| ApiError::network("Not logged in"))
    }

    fn handle_unauthorized_status(status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            clear_session();
            redirect_to_login_if_needed();
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request failed: {}", e)))?;
        Self::handle_unauthorized_status(response.status());
        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::network(format!("Failed to parse response: {}", e)))
        } else {
            Err(Self::parse_error(response).await)
        }
    }

    async fn parse_unit(response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(response).await)
        }
    }

    async fn parse_error(response: Response) -> ApiError {
        response
            .json::<ApiError>()
            .await
            .unwrap_or_else(|_| ApiError::network("Request failed"))
    }

    // ---- auth ----

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(self.client.post(format!("{}/auth/register", base_url)).json(&request))
            .await?;
        Self::parse(response).await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(self.client.post(format!("{}/auth/login", base_url)).json(&request))
            .await?;
        let login: LoginResponse = Self::parse(response).await?;
        persist_session(&login)?;
        Ok(login)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/auth/logout", base_url))
                    .bearer_auth(token),
            )
            .await;
        clear_session();
        Self::parse_unit(response?).await
    }

    pub async fn get_me(&self) -> Result<UserResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .get(format!("{}/auth/me", base_url))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn request_password_reset(&self, email: String) -> Result<MessageResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/auth/forgot-password", base_url))
                    .json(&serde_json::json!({ "email": email })),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn reset_password(
        &self,
        token: String,
        new_password: String,
    ) -> Result<MessageResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/auth/reset-password", base_url))
                    .json(&serde_json::json!({ "token": token, "new_password": new_password })),
            )
            .await?;
        Self::parse(response).await
    }

    // ---- contacts ----

    pub async fn list_contacts(&self) -> Result<Vec<ContactResponse>, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .get(format!("{}/contacts", base_url))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn create_contact(
        &self,
        request: CreateContactRequest,
    ) -> Result<ContactResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/contacts", base_url))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn update_contact(
        &self,
        id: &str,
        request: UpdateContactRequest,
    ) -> Result<ContactResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .put(format!("{}/contacts/{}", base_url, id))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .delete(format!("{}/contacts/{}", base_url, id))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse_unit(response).await
    }

    pub async fn verify_contact(&self, id: &str) -> Result<ContactResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/contacts/{}/verify", base_url, id))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse(response).await
    }

    // ---- sharing ----

    pub async fn start_sharing(
        &self,
        request: StartSharingRequest,
    ) -> Result<StartSharingResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/sharing/start", base_url))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn active_session(&self) -> Result<Option<ActiveSessionResponse>, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .get(format!("{}/sharing/active", base_url))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse(response).await
    }

    pub async fn stop_sharing(&self) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/sharing/stop", base_url))
                    .bearer_auth(token),
            )
            .await?;
        Self::parse_unit(response).await
    }

    pub async fn update_location(
        &self,
        request: LocationUpdateRequest,
    ) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/sharing/location", base_url))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Self::parse_unit(response).await
    }

    // ---- notifications ----

    pub async fn send_sos(
        &self,
        request: SosNotificationRequest,
    ) -> Result<SosNotificationResponse, ApiError> {
        let token = self.bearer_token()?;
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(
                self.client
                    .post(format!("{}/notifications/sos", base_url))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Self::parse(response).await
    }

    // ---- public tracker ----

    pub async fn tracker_snapshot(&self, token: &str) -> Result<TrackerView, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .send(self.client.get(format!("{}/track/{}", base_url, token)))
            .await?;
        Self::parse(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn persist_session(response: &LoginResponse) -> Result<(), ApiError> {
    let storage = storage_utils::local_storage().map_err(ApiError::network)?;
    storage
        .set_item(ACCESS_TOKEN_KEY, &response.access_token)
        .map_err(|_| ApiError::network("Failed to store token"))?;
    storage
        .set_item(REFRESH_TOKEN_KEY, &response.refresh_token)
        .map_err(|_| ApiError::network("Failed to store refresh token"))?;
    let user_json = serde_json::to_string(&response.user)
        .map_err(|_| ApiError::network("Failed to serialize user profile"))?;
    storage
        .set_item(CURRENT_USER_KEY, &user_json)
        .map_err(|_| ApiError::network("Failed to store user profile"))?;
    Ok(())
}

pub fn clear_session() {
    if let Ok(storage) = storage_utils::local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
        let _ = storage.remove_item(CURRENT_USER_KEY);
    }
}

fn redirect_to_login_if_needed() {
    if let Some(window) = web_sys::window() {
        let location = window.location();
        if let Ok(pathname) = location.pathname() {
            if pathname == "/login" || pathname.starts_with("/track/") {
                return;
            }
        }
        let _ = location.set_href("/login");
    }
}
