use leptos::*;

use crate::state::sos::SosPhase;

/// Countdown overlay shown after the hold gauge completes. Dispatch happens
/// when the counter reaches zero unless the user aborts first.
#[component]
pub fn AlertCountdownModal(
    phase: RwSignal<SosPhase>,
    #[prop(into)] on_dispatch: Callback<()>,
) -> impl IntoView {
    // One ticker per countdown; it stops itself when the phase moves on.
    create_effect(move |previous: Option<bool>| {
        let counting = matches!(phase.get(), SosPhase::Countdown(_));
        if counting && previous != Some(true) {
            spawn_local(async move {
                loop {
                    gloo_timers::future::TimeoutFuture::new(1_000).await;
                    let Some(current) = phase.try_get_untracked() else {
                        break;
                    };
                    if !matches!(current, SosPhase::Countdown(_)) {
                        break;
                    }
                    let next = current.tick();
                    phase.set(next);
                    if next == SosPhase::Dispatching {
                        on_dispatch.call(());
                        break;
                    }
                }
            });
        }
        counting
    });

    view! {
        <Show when=move || phase.get() != SosPhase::Idle fallback=|| ()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/60">
                <div class="bg-surface rounded-lg p-6 max-w-sm w-full text-center space-y-4">
                    {move || match phase.get() {
                        SosPhase::Countdown(seconds) => view! {
                            <h2 class="text-xl font-bold text-status-error-text">"SOS alert in"</h2>
                            <p class="text-5xl font-extrabold text-status-error-text">{seconds}</p>
                            <button
                                class="w-full py-2 rounded-md bg-form-control-bg border border-form-control-border text-fg font-medium"
                                on:click=move |_| phase.set(phase.get_untracked().cancel())
                            >
                                "Cancel"
                            </button>
                        }
                            .into_view(),
                        SosPhase::Dispatching => view! {
                            <h2 class="text-xl font-bold text-fg">"Sending alert..."</h2>
                        }
                            .into_view(),
                        SosPhase::Sent => view! {
                            <h2 class="text-xl font-bold text-status-success-text">"Alert sent"</h2>
                            <p class="text-sm text-fg-muted">
                                "Your emergency contacts received your live location."
                            </p>
                            <button
                                class="w-full py-2 rounded-md bg-action-primary-bg text-action-primary-text font-medium"
                                on:click=move |_| phase.set(SosPhase::Idle)
                            >
                                "Close"
                            </button>
                        }
                            .into_view(),
                        _ => ().into_view(),
                    }}
                </div>
            </div>
        </Show>
    }
}
