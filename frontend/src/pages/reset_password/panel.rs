use leptos::{ev::SubmitEvent, *};
use leptos_router::use_query_map;

use crate::{
    api::ApiClient,
    components::layout::ErrorBanner,
    pages::reset_password::utils,
};

#[component]
pub fn ResetPasswordPanel() -> impl IntoView {
    let query = use_query_map();
    let token = create_memo(move |_| query.with(|q| q.get("token").cloned()).unwrap_or_default());

    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (done, set_done) = create_signal(false);

    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let reset_action = create_action(move |(token, password): &(String, String)| {
        let api = api.clone();
        let token = token.clone();
        let password = password.clone();
        async move { api.reset_password(token, password).await }
    });
    let pending = reset_action.pending();

    create_effect(move |_| {
        if let Some(result) = reset_action.value().get() {
            match result {
                Ok(_) => {
                    set_error.set(None);
                    set_done.set(true);
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
        let token_value = token.get_untracked();
        if !utils::looks_like_reset_token(&token_value) {
            set_error.set(Some("This reset link is invalid or incomplete".to_string()));
            return;
        }
        let new_password = password.get_untracked();
        if let Err(message) = utils::validate_new_password(&new_password, &confirm.get_untracked())
        {
            set_error.set(Some(message));
            return;
        }
        set_error.set(None);
        reset_action.dispatch((token_value, new_password));
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-page">
            <div class="w-full max-w-sm bg-surface rounded-lg p-8 space-y-4">
                <h1 class="text-xl font-bold text-fg">"Choose a new password"</h1>
                {move || error.get().map(|message| view! { <ErrorBanner message=message /> })}
                <Show
                    when=move || !done.get()
                    fallback=|| view! {
                        <div class="space-y-3">
                            <p class="text-sm text-status-ok-text bg-status-ok-bg rounded p-2">
                                "Your password has been updated. All other sessions were signed out."
                            </p>
                            <a class="text-sm text-action-link" href="/login">"Go to sign in"</a>
                        </div>
                    }
                >
                    <form class="space-y-3" on:submit=handle_submit>
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="password"
                            placeholder="New password"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        <input
                            class="w-full rounded-md border border-form-control-border px-3 py-2"
                            type="password"
                            placeholder="Confirm new password"
                            prop:value=confirm
                            on:input=move |ev| set_confirm.set(event_target_value(&ev))
                        />
                        <button
                            class="w-full rounded-md bg-action-primary-bg text-action-primary-text py-2 disabled:opacity-50"
                            type="submit"
                            disabled=move || pending.get()
                        >
                            "Set new password"
                        </button>
                    </form>
                </Show>
            </div>
        </div>
    }
}
