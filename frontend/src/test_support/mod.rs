#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::{ContactResponse, UserResponse};
    use crate::state::auth::AuthState;
    use chrono::Utc;
    use leptos::*;

    pub fn sample_user() -> UserResponse {
        UserResponse {
            id: "u-sample".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            full_name: "Ada Lovelace".into(),
            phone: Some("+4915112345678".into()),
        }
    }

    pub fn sample_contact(name: &str, is_emergency: bool) -> ContactResponse {
        ContactResponse {
            id: format!("c-{}", name.to_lowercase()),
            name: name.into(),
            phone: Some("+4915112345678".into()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            is_emergency,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    pub fn provide_auth(
        user: Option<UserResponse>,
    ) -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
        let (auth, set_auth) = create_signal(AuthState {
            is_authenticated: user.is_some(),
            user,
            loading: false,
        });
        provide_context((auth, set_auth));
        (auth, set_auth)
    }
}
