use std::rc::Rc;

use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiClient, ApiError, LoginRequest, RegisterRequest, UserResponse},
    components::layout::ErrorBanner,
    pages::login::{repository::LoginRepository, utils},
    state::auth,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

#[component]
pub fn LoginPanel() -> impl IntoView {
    let mode = create_rw_signal(Mode::Login);
    let (username, set_username) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (full_name, set_full_name) = create_signal(String::new());
    let (phone, set_phone) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (password_confirm, set_password_confirm) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (notice, set_notice) = create_signal(None::<String>);

    let login_action = auth::use_login_action();
    let login_pending = login_action.pending();

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(_) => {
                    set_error.set(None);
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/");
                    }
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
        }
    });

    let register_action = {
        let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
        let repo = LoginRepository::new_with_client(Rc::new(api));
        create_action(move |request: &RegisterRequest| {
            let repo = repo.clone();
            let request = request.clone();
            async move { repo.register(request).await }
        })
    };
    let register_pending = register_action.pending();

    create_effect(move |_| {
        if let Some(result) = register_action.value().get() {
            match result {
                Ok(user) => {
                    set_error.set(None);
                    set_notice.set(Some(account_created_notice(&user)));
                    set_password.set(String::new());
                    set_password_confirm.set(String::new());
                    mode.set(Mode::Login);
                }
                Err(err) => set_error.set(Some(describe_register_error(&err))),
            }
        }
    });

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if login_pending.get_untracked() || register_pending.get_untracked() {
            return;
        }
        set_notice.set(None);
        let uname = username.get_untracked();
        let pword = password.get_untracked();

        match mode.get_untracked() {
            Mode::Login => {
                if let Err(message) = utils::validate_credentials(&uname, &pword) {
                    set_error.set(Some(message));
                    return;
                }
                set_error.set(None);
                login_action.dispatch(LoginRequest {
                    username: uname,
                    password: pword,
                });
            }
            Mode::Register => {
                let mail = email.get_untracked();
                let confirm = password_confirm.get_untracked();
                if let Err(message) = utils::validate_registration(&uname, &mail, &pword, &confirm)
                {
                    set_error.set(Some(message));
                    return;
                }
                set_error.set(None);
                register_action.dispatch(RegisterRequest {
                    username: uname,
                    email: mail,
                    full_name: full_name.get_untracked().trim().to_string(),
                    phone: utils::normalize_optional(&phone.get_untracked()),
                    password: pword,
                });
            }
        }
    };

    let registering = move || mode.get() == Mode::Register;

    view! {
        <div class="min-h-screen flex items-center justify-center bg-page">
            <div class="w-full max-w-sm bg-surface rounded-lg p-8 space-y-4">
                <h1 class="text-2xl font-bold text-fg text-center">"Haven"</h1>
                <p class="text-sm text-fg-muted text-center">
                    {move || if registering() { "Create your account" } else { "Sign in to continue" }}
                </p>
                {move || notice.get().map(|message| view! {
                    <p class="text-sm text-status-ok-text bg-status-ok-bg rounded p-2">{message}</p>
                })}
                {move || error.get().map(|message| view! { <ErrorBanner message=message /> })}
                <form class="space-y-3" on:submit=handle_submit>
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="text"
                        placeholder="Username"
                        prop:value=username
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                    <Show when=registering fallback=|| ()>
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="email"
                            placeholder="Email"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="text"
                            placeholder="Full name"
                            prop:value=full_name
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                        />
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="tel"
                            placeholder="Phone (optional)"
                            prop:value=phone
                            on:input=move |ev| set_phone.set(event_target_value(&ev))
                        />
                    </Show>
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="password"
                        placeholder="Password"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    <Show when=registering fallback=|| ()>
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="password"
                            placeholder="Confirm password"
                            prop:value=password_confirm
                            on:input=move |ev| set_password_confirm.set(event_target_value(&ev))
                        />
                    </Show>
                    <button
                        class="w-full rounded-md bg-action-primary-bg text-action-primary-text py-2 disabled:opacity-50"
                        type="submit"
                        disabled=move || login_pending.get() || register_pending.get()
                    >
                        {move || if registering() { "Create account" } else { "Sign in" }}
                    </button>
                </form>
                <div class="flex justify-between text-sm">
                    <button
                        class="text-action-link"
                        on:click=move |_| {
                            set_error.set(None);
                            mode.update(|m| {
                                *m = match m {
                                    Mode::Login => Mode::Register,
                                    Mode::Register => Mode::Login,
                                }
                            });
                        }
                    >
                        {move || if registering() { "Have an account? Sign in" } else { "Create an account" }}
                    </button>
                    <a class="text-action-link" href="/forgot-password">"Forgot password?"</a>
                </div>
            </div>
        </div>
    }
}

fn account_created_notice(user: &UserResponse) -> String {
    format!("Account {} created. Sign in to continue.", user.username)
}

fn describe_register_error(error: &ApiError) -> String {
    error.to_string()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers, ssr};

    #[test]
    fn account_notice_names_the_new_user() {
        let user = helpers::sample_user();
        assert_eq!(
            account_created_notice(&user),
            "Account ada created. Sign in to continue."
        );
    }

    #[test]
    fn login_panel_renders_sign_in_form() {
        let html = ssr::render_to_string(|| view! { <LoginPanel /> });
        assert!(html.contains("Sign in"));
        assert!(html.contains("Forgot password?"));
    }
}
