use leptos::*;
use leptos_router::A;

use crate::state::auth::{use_auth, use_logout_action};

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin rounded-full h-10 w-10 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[component]
pub fn ErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class="rounded-md bg-status-error-bg p-4 text-status-error-text text-sm">
            {message}
        </div>
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let (auth, _) = use_auth();
    let logout_action = use_logout_action();

    create_effect(move |_| {
        if let Some(Ok(())) = logout_action.value().get() {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        }
    });

    view! {
        <nav class="bg-surface border-b border-form-control-border px-4 py-3 flex items-center justify-between">
            <A href="/" class="text-lg font-bold text-fg">"Haven"</A>
            <div class="flex items-center gap-4 text-sm">
                <A href="/contacts" class="text-link hover:text-link-hover">"Contacts"</A>
                {move || {
                    let state = auth.get();
                    if state.is_authenticated {
                        view! {
                            <button
                                class="text-fg-muted hover:text-fg"
                                on:click=move |_| logout_action.dispatch(())
                            >
                                "Log out"
                            </button>
                        }
                            .into_view()
                    } else {
                        view! { <A href="/login" class="text-link hover:text-link-hover">"Log in"</A> }
                            .into_view()
                    }
                }}
            </div>
        </nav>
    }
}
