use leptos::{ev::SubmitEvent, *};

use crate::{api::ApiClient, components::layout::ErrorBanner};

#[component]
pub fn ForgotPasswordPanel() -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (notice, set_notice) = create_signal(None::<String>);

    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let request_action = create_action(move |address: &String| {
        let api = api.clone();
        let address = address.clone();
        async move { api.request_password_reset(address).await }
    });
    let pending = request_action.pending();

    create_effect(move |_| {
        if let Some(result) = request_action.value().get() {
            match result {
                Ok(response) => {
                    set_error.set(None);
                    set_notice.set(Some(response.message));
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
        }
    });

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let address = email.get_untracked().trim().to_string();
        if !address.contains('@') {
            set_error.set(Some("Enter a valid email address".to_string()));
            return;
        }
        set_error.set(None);
        request_action.dispatch(address);
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-page">
            <div class="w-full max-w-sm bg-surface rounded-lg p-8 space-y-4">
                <h1 class="text-xl font-bold text-fg">"Reset your password"</h1>
                <p class="text-sm text-fg-muted">
                    "Enter the email address on your account and we will send a reset link."
                </p>
                {move || notice.get().map(|message| view! {
                    <p class="text-sm text-status-ok-text bg-status-ok-bg rounded p-2">{message}</p>
                })}
                {move || error.get().map(|message| view! { <ErrorBanner message=message /> })}
                <form class="space-y-3" on:submit=handle_submit>
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="email"
                        placeholder="Email"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <button
                        class="w-full rounded-md bg-action-primary-bg text-action-primary-text py-2 disabled:opacity-50"
                        type="submit"
                        disabled=move || pending.get()
                    >
                        "Send reset link"
                    </button>
                </form>
                <a class="text-sm text-action-link" href="/login">"Back to sign in"</a>
            </div>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr;

    #[test]
    fn forgot_password_panel_renders_the_form() {
        let html = ssr::render_to_string(|| view! { <ForgotPasswordPanel /> });
        assert!(html.contains("Send reset link"));
        assert!(html.contains("Back to sign in"));
    }
}
