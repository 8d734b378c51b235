use leptos::*;

pub mod view_model;

mod panel;

pub use panel::HomePanel;

#[component]
pub fn HomePage() -> impl IntoView {
    view! { <HomePanel /> }
}
