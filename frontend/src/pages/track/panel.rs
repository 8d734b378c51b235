use chrono::Utc;
use leptos::*;

use crate::{
    api::TrackerView,
    components::layout::LoadingSpinner,
    pages::track::view_model::{use_tracker_view_model, TrackerState},
    state::sharing,
};

pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={}&mlon={}#map=16/{}/{}",
        latitude, longitude, latitude, longitude
    )
}

#[component]
pub fn TrackerPanel(token: String) -> impl IntoView {
    let vm = use_tracker_view_model(token);
    let state = vm.state;
    let live_stream = vm.live_stream;

    view! {
        <div class="min-h-screen bg-page flex items-center justify-center p-4">
            <div class="w-full max-w-md bg-surface rounded-lg p-6 space-y-4">
                {move || match state.get() {
                    TrackerState::Loading => view! { <LoadingSpinner /> }.into_view(),
                    TrackerState::Live(snapshot) => {
                        live_card(snapshot, live_stream.get()).into_view()
                    }
                    TrackerState::NotFound => terminal_card(
                        "Tracking link not found",
                        "This link does not point to a location share. Check that it was copied completely.",
                    )
                    .into_view(),
                    TrackerState::Ended => terminal_card(
                        "Sharing has ended",
                        "The person sharing their location stopped the session.",
                    )
                    .into_view(),
                    TrackerState::Expired => terminal_card(
                        "Sharing has expired",
                        "The time window for this location share has run out.",
                    )
                    .into_view(),
                    TrackerState::Failed(message) => terminal_card(
                        "Something went wrong",
                        &message,
                    )
                    .into_view(),
                }}
            </div>
        </div>
    }
}

fn live_card(snapshot: TrackerView, live: bool) -> impl IntoView {
    let remaining = sharing::remaining_label(snapshot.expires_at, Utc::now());
    view! {
        <div class="space-y-3">
            <div class="flex items-center justify-between">
                <h1 class="text-lg font-bold text-fg">
                    {format!("{} is sharing their location", snapshot.sharer_name)}
                </h1>
                {if live {
                    view! {
                        <span class="text-xs rounded bg-status-ok-bg text-status-ok-text px-1.5 py-0.5">
                            "live"
                        </span>
                    }
                    .into_view()
                } else {
                    view! {
                        <span class="text-xs rounded bg-status-warn-bg text-status-warn-text px-1.5 py-0.5">
                            "snapshot"
                        </span>
                    }
                    .into_view()
                }}
            </div>
            <p class="text-sm text-fg-muted">
                {format!(
                    "Last position: {:.5}, {:.5}",
                    snapshot.latitude, snapshot.longitude
                )}
                {snapshot
                    .accuracy
                    .map(|meters| format!(" (within {:.0} m)", meters))
                    .unwrap_or_default()}
            </p>
            <p class="text-sm text-fg-muted">
                {format!("Updated {}", snapshot.updated_at.format("%H:%M:%S UTC"))}
            </p>
            {remaining.map(|label| view! {
                <p class="text-sm text-fg-muted">{format!("Sharing ends in {}", label)}</p>
            })}
            <a
                class="block w-full text-center rounded-md bg-action-primary-bg text-action-primary-text py-2"
                href=map_link(snapshot.latitude, snapshot.longitude)
                target="_blank"
                rel="noopener"
            >
                "Open on map"
            </a>
        </div>
    }
}

fn terminal_card(title: &str, body: &str) -> impl IntoView {
    view! {
        <div class="space-y-2 text-center">
            <h1 class="text-lg font-bold text-fg">{title.to_string()}</h1>
            <p class="text-sm text-fg-muted">{body.to_string()}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_link_carries_both_coordinates() {
        let link = map_link(52.52, 13.405);
        assert!(link.contains("mlat=52.52"));
        assert!(link.contains("mlon=13.405"));
    }
}
