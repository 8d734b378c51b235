use std::rc::Rc;

use crate::api::{ApiClient, ApiError, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

#[derive(Clone)]
pub struct LoginRepository {
    client: Rc<ApiClient>,
}

impl LoginRepository {
    pub fn new() -> Self {
        Self::new_with_client(Rc::new(ApiClient::new()))
    }

    pub fn new_with_client(client: Rc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.login(request).await
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, ApiError> {
        self.client.register(request).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.logout().await
    }
}

impl Default for LoginRepository {
    fn default() -> Self {
        Self::new()
    }
}
