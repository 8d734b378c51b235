use leptos::*;

use crate::state::sos::HoldGauge;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Press-and-hold trigger. The gauge fills while the pointer stays down and
/// resets the moment it lifts or leaves; only a full gauge fires.
#[component]
pub fn SosButton(#[prop(into)] on_triggered: Callback<()>) -> impl IntoView {
    let gauge = create_rw_signal(None::<HoldGauge>);
    let progress = create_rw_signal(0u8);

    let begin = move |_| {
        if gauge.get_untracked().is_some() {
            return;
        }
        gauge.set(Some(HoldGauge::begin(now_ms())));
        spawn_local(async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(50).await;
                let Some(active) = gauge.try_get_untracked().flatten() else {
                    if let Some(p) = progress.try_get_untracked() {
                        if p != 0 {
                            progress.set(0);
                        }
                    }
                    break;
                };
                let now = now_ms();
                progress.set(active.progress(now));
                if active.is_complete(now) {
                    gauge.set(None);
                    progress.set(0);
                    on_triggered.call(());
                    break;
                }
            }
        });
    };

    let release = move |_| {
        gauge.set(None);
        progress.set(0);
    };

    view! {
        <button
            class="relative overflow-hidden select-none rounded-full w-40 h-40 bg-status-error-bg text-status-error-text text-2xl font-extrabold shadow-lg active:scale-95"
            on:pointerdown=begin
            on:pointerup=release
            on:pointerleave=release
        >
            <div
                class="absolute inset-x-0 bottom-0 bg-status-error-border/60 transition-none"
                style:height=move || format!("{}%", progress.get())
            ></div>
            <span class="relative z-10">"SOS"</span>
        </button>
        <p class="mt-3 text-sm text-fg-muted text-center">"Hold to trigger an SOS"</p>
    }
}
