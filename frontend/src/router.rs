use leptos::*;
use leptos_router::*;

use crate::{
    components::guard::RequireAuth,
    pages::{
        contacts::ContactsPage, forgot_password::ForgotPasswordPage, home::HomePage,
        login::LoginPage, reset_password::ResetPasswordPage, track::TrackerPage,
    },
    state::auth::AuthProvider,
};

pub const ROUTE_PATHS: &[&str] = &[
    "/",
    "/login",
    "/forgot-password",
    "/reset-password",
    "/contacts",
    "/track/:token",
];

pub const PROTECTED_ROUTE_PATHS: &[&str] = &["/", "/contacts"];

pub const PUBLIC_ROUTE_PATHS: &[&str] = &[
    "/login",
    "/forgot-password",
    "/reset-password",
    "/track/:token",
];

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_context(crate::api::ApiClient::new());
    view! {
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/" view=ProtectedHome/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/forgot-password" view=ForgotPasswordPage/>
                    <Route path="/reset-password" view=ResetPasswordPage/>
                    <Route path="/contacts" view=ProtectedContacts/>
                    <Route path="/track/:token" view=TrackerPage/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn ProtectedHome() -> impl IntoView {
    view! { <RequireAuth><HomePage/></RequireAuth> }
}

#[component]
fn ProtectedContacts() -> impl IntoView {
    view! { <RequireAuth><ContactsPage/></RequireAuth> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn route_paths_include_the_public_tracker() {
        assert!(ROUTE_PATHS.contains(&"/track/:token"));
        assert!(PUBLIC_ROUTE_PATHS.contains(&"/track/:token"));
    }

    #[test]
    fn every_route_is_either_public_or_protected() {
        let all: HashSet<&str> = ROUTE_PATHS.iter().copied().collect();
        let split: HashSet<&str> = PROTECTED_ROUTE_PATHS
            .iter()
            .chain(PUBLIC_ROUTE_PATHS)
            .copied()
            .collect();
        assert_eq!(all, split);
        assert_eq!(
            PROTECTED_ROUTE_PATHS.len() + PUBLIC_ROUTE_PATHS.len(),
            ROUTE_PATHS.len()
        );
    }

    #[test]
    fn no_duplicate_routes() {
        let unique: HashSet<&str> = ROUTE_PATHS.iter().copied().collect();
        assert_eq!(unique.len(), ROUTE_PATHS.len());
    }
}
