use chrono::Utc;
use leptos::*;

use crate::{
    components::{
        alert_modal::AlertCountdownModal,
        layout::{ErrorBanner, Navbar},
        sharing_dialog::{DialogStep, SharingDialog},
        sos_button::SosButton,
    },
    pages::home::view_model::use_home_view_model,
    state::sharing,
};

#[component]
pub fn HomePanel() -> impl IntoView {
    let vm = use_home_view_model();
    let active = vm.sharing.active;
    let error = vm.sharing.error;
    let notice = vm.notice;
    let phase = vm.phase;
    let dialog_step = vm.dialog_step;
    let stop_action = vm.sharing.stop_action;

    // Drives the remaining-time label while a bounded session runs.
    let now = create_rw_signal(Utc::now());
    create_effect(move |started: Option<()>| {
        if started.is_none() {
            spawn_local(async move {
                loop {
                    gloo_timers::future::TimeoutFuture::new(1_000).await;
                    if now.try_set(Utc::now()).is_some() {
                        break;
                    }
                }
            });
        }
    });

    let sos_vm = vm.clone();
    let on_sos = Callback::new(move |_| sos_vm.trigger_sos());

    let dialog_vm = vm.clone();
    let on_dialog_start = Callback::new(move |(ids, duration): (Vec<String>, Option<i64>)| {
        dialog_vm.start_manual(ids, duration);
    });

    let dispatch_vm = vm.clone();
    let on_dispatch = Callback::new(move |_| dispatch_vm.dispatch_alerts());

    view! {
        <div class="min-h-screen bg-page">
            <Navbar />
            <main class="max-w-md mx-auto p-4 space-y-6">
                {move || error.get().map(|message| view! { <ErrorBanner message=message /> })}
                {move || notice.get().map(|message| view! {
                    <p class="text-sm text-status-warn-text bg-status-warn-bg rounded p-2">{message}</p>
                })}

                <section class="flex flex-col items-center gap-4 py-8">
                    <SosButton on_triggered=on_sos />
                    <p class="text-sm text-fg-muted text-center">
                        "Hold for 1.5 seconds to alert your emergency contacts"
                    </p>
                </section>

                <section class="bg-surface rounded-lg p-4 space-y-3">
                    <Show
                        when=move || active.get().is_some()
                        fallback=move || view! {
                            <button
                                class="w-full rounded-md bg-action-primary-bg text-action-primary-text py-2"
                                on:click=move |_| dialog_step.set(DialogStep::Selecting)
                            >
                                "Share my live location"
                            </button>
                        }
                    >
                        <p class="font-semibold text-fg">"Sharing your live location"</p>
                        <p class="text-sm text-fg-muted">
                            {move || match active.get().and_then(|session| {
                                sharing::remaining_label(session.expires_at, now.get())
                            }) {
                                Some(remaining) => format!("Ends in {}", remaining),
                                None => "Sharing until you stop".to_string(),
                            }}
                        </p>
                        <button
                            class="w-full rounded-md bg-status-error-bg text-status-error-text py-2"
                            disabled=move || stop_action.pending().get()
                            on:click=move |_| stop_action.dispatch(())
                        >
                            "Stop sharing"
                        </button>
                    </Show>
                </section>
            </main>

            <SharingDialog step=dialog_step on_start=on_dialog_start />
            <AlertCountdownModal phase=phase on_dispatch=on_dispatch />
        </div>
    }
}
