use leptos::*;
use leptos_router::use_params_map;

pub mod repository;
pub mod view_model;

mod panel;

pub use panel::TrackerPanel;

#[component]
pub fn TrackerPage() -> impl IntoView {
    let params = use_params_map();
    let token = move || params.with(|p| p.get("token").cloned()).unwrap_or_default();

    view! {
        {move || {
            let token = token();
            // An empty segment cannot resolve; let the panel render not-found.
            let token = if token.is_empty() { "missing".to_string() } else { token };
            view! { <TrackerPanel token=token /> }
        }}
    }
}
